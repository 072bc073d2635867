//! Command-line interface for cafe-relay

use clap::{Parser, Subcommand};

/// HTTP relay for a coffee-expert chatbot and text translation
#[derive(Parser)]
#[command(name = "cafe-relay")]
#[command(version)]
#[command(about = "HTTP relay for a coffee-expert chatbot and text translation")]
#[command(
    long_about = "cafe-relay forwards chat messages to a hosted LLM inference endpoint and \
    text to a translation provider, reshaping requests and replies into a stable JSON contract."
)]
pub struct Cli {
    /// Path to a TOML configuration file (defaults are used when omitted)
    #[arg(short, long, global = true)]
    pub config: Option<String>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Generate a template configuration file
    Config {
        /// Output file path (prints to stdout if not specified)
        #[arg(short, long)]
        output: Option<String>,
    },
}

/// Generate template configuration content
pub fn generate_config_template() -> &'static str {
    r#"# cafe-relay Configuration
# ========================
#
# Every setting below shows its default. Environment variables override the
# file (a .env file in the working directory is loaded first):
#
#   HUGGINGFACE_API_KEY  -> inference.api_key
#   TRANSLATION_API_KEY  -> translation.api_key
#   PORT                 -> server.port
#   HOST                 -> server.host

# ─────────────────────────────────────────────────────────────────────────────
# SERVER
# ─────────────────────────────────────────────────────────────────────────────

[server]
# IP address to bind to (0.0.0.0 for all interfaces, 127.0.0.1 for localhost only)
host = "0.0.0.0"

# Port to listen on
port = 8080

# Timeout for each backend call, in seconds (1-300)
request_timeout_seconds = 30

# ─────────────────────────────────────────────────────────────────────────────
# CHAT INFERENCE BACKEND (OpenAI-compatible /chat/completions)
# ─────────────────────────────────────────────────────────────────────────────

[inference]
base_url = "https://router.huggingface.co/v1"
model = "meta-llama/Llama-3.2-1B-Instruct"
max_tokens = 500
temperature = 0.7
# api_key = "hf_..."   # prefer HUGGINGFACE_API_KEY

# ─────────────────────────────────────────────────────────────────────────────
# TRANSLATION BACKEND
# ─────────────────────────────────────────────────────────────────────────────

[translation]
# "google": free Google Translate web client, no key
# "libre":  LibreTranslate-compatible API, optional key
provider = "google"
# base_url = "https://translate.googleapis.com"
# api_key = "..."      # prefer TRANSLATION_API_KEY

# ─────────────────────────────────────────────────────────────────────────────
# OBSERVABILITY
# ─────────────────────────────────────────────────────────────────────────────

[observability]
# Log level: "trace", "debug", "info", "warn", "error" (RUST_LOG takes precedence)
log_level = "info"

# Prometheus metrics are always available at /metrics on the server port
"#
}
