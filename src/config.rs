//! Configuration management for cafe-relay
//!
//! Settings come from an optional TOML file, then environment overrides
//! (`HUGGINGFACE_API_KEY`, `TRANSLATION_API_KEY`, `PORT`, `HOST`). Every
//! section has defaults, so the relay runs with no file at all.

use crate::error::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Upper bound for any outbound request timeout
pub const MAX_REQUEST_TIMEOUT_SECONDS: u64 = 300;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub inference: InferenceConfig,
    #[serde(default)]
    pub translation: TranslationConfig,
    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Timeout applied to every backend call
    #[serde(default = "default_request_timeout")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            request_timeout_seconds: default_request_timeout(),
        }
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_request_timeout() -> u64 {
    30
}

/// Secret credential for an upstream provider
///
/// `Debug` output is redacted so keys never reach the logs.
#[derive(Clone, PartialEq, Eq, Deserialize)]
#[serde(transparent)]
pub struct ApiKey(String);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn expose(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("ApiKey(***)")
    }
}

/// OpenAI-compatible chat-completion endpoint used by the chat relay
///
/// Generation parameters are fixed here; callers cannot override them.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct InferenceConfig {
    #[serde(default = "default_inference_base_url")]
    pub base_url: String,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default, skip_serializing)]
    pub api_key: Option<ApiKey>,
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            base_url: default_inference_base_url(),
            model: default_model(),
            max_tokens: default_max_tokens(),
            temperature: default_temperature(),
            api_key: None,
        }
    }
}

fn default_inference_base_url() -> String {
    "https://router.huggingface.co/v1".to_string()
}

fn default_model() -> String {
    "meta-llama/Llama-3.2-1B-Instruct".to_string()
}

fn default_max_tokens() -> u32 {
    500
}

fn default_temperature() -> f64 {
    0.7
}

/// Which translation service backs `/api/translate`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    /// Free Google Translate web client (no key)
    #[default]
    Google,
    /// LibreTranslate-compatible API (optional key)
    Libre,
}

impl TranslationProvider {
    pub fn default_base_url(&self) -> &'static str {
        match self {
            TranslationProvider::Google => "https://translate.googleapis.com",
            TranslationProvider::Libre => "https://libretranslate.com",
        }
    }
}

/// Translation backend configuration
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct TranslationConfig {
    #[serde(default)]
    pub provider: TranslationProvider,
    /// Overrides the provider's default base URL
    #[serde(default)]
    base_url: Option<String>,
    #[serde(default, skip_serializing)]
    pub api_key: Option<ApiKey>,
}

impl TranslationConfig {
    pub fn new(
        provider: TranslationProvider,
        base_url: Option<String>,
        api_key: Option<ApiKey>,
    ) -> Self {
        Self {
            provider,
            base_url,
            api_key,
        }
    }

    /// Configured base URL, or the provider default
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or_else(|| self.provider.default_base_url())
    }
}

/// Observability configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Config {
    /// Load configuration for the server binary
    ///
    /// Reads `path` when given (defaults otherwise), applies process
    /// environment overrides, then validates.
    pub fn load(path: Option<&str>) -> AppResult<Self> {
        let mut config = match path {
            Some(path) => Self::read_file(path)?,
            None => Self::default(),
        };
        config.apply_env_overrides(|name| std::env::var(name).ok())?;

        let origin = path.unwrap_or("<defaults>").to_string();
        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: origin,
                reason: e.to_string(),
            })?;
        Ok(config)
    }

    /// Load configuration from a TOML file (no environment overrides)
    pub fn from_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();
        let config = Self::read_file(path)?;

        config
            .validate()
            .map_err(|e| AppError::ConfigValidationFailed {
                path: path_display,
                reason: e.to_string(),
            })?;

        Ok(config)
    }

    fn read_file<P: AsRef<Path>>(path: P) -> AppResult<Self> {
        let path_display = path.as_ref().display().to_string();

        let content =
            std::fs::read_to_string(path.as_ref()).map_err(|source| AppError::ConfigFileRead {
                path: path_display.clone(),
                source,
            })?;

        toml::from_str(&content).map_err(|source| AppError::ConfigParseFailed {
            path: path_display,
            source,
        })
    }

    /// Apply overrides from environment-style variables
    ///
    /// `lookup` returns the value of a variable, if set. Empty values are
    /// treated as unset.
    pub fn apply_env_overrides<F>(&mut self, lookup: F) -> AppResult<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        if let Some(key) = get("HUGGINGFACE_API_KEY") {
            self.inference.api_key = Some(ApiKey::new(key));
        }
        if let Some(key) = get("TRANSLATION_API_KEY") {
            self.translation.api_key = Some(ApiKey::new(key));
        }
        if let Some(host) = get("HOST") {
            self.server.host = host;
        }
        if let Some(port) = get("PORT") {
            self.server.port = port.trim().parse().map_err(|_| {
                AppError::Config(format!("PORT must be a valid port number, got '{}'", port))
            })?;
        }
        Ok(())
    }

    /// Validate configuration after parsing
    ///
    /// Called by `load()` and `from_file()`; call it explicitly when building
    /// a `Config` by hand.
    pub fn validate(&self) -> AppResult<()> {
        let timeout = self.server.request_timeout_seconds;
        if timeout == 0 || timeout > MAX_REQUEST_TIMEOUT_SECONDS {
            return Err(AppError::Config(format!(
                "server.request_timeout_seconds must be between 1 and {}, got {}",
                MAX_REQUEST_TIMEOUT_SECONDS, timeout
            )));
        }

        validate_base_url("inference.base_url", &self.inference.base_url)?;
        validate_base_url("translation.base_url", self.translation.base_url())?;

        if self.inference.model.trim().is_empty() {
            return Err(AppError::Config(
                "inference.model cannot be empty".to_string(),
            ));
        }

        if self.inference.max_tokens == 0 {
            return Err(AppError::Config(
                "inference.max_tokens must be greater than 0".to_string(),
            ));
        }

        let temperature = self.inference.temperature;
        if !temperature.is_finite() || !(0.0..=2.0).contains(&temperature) {
            return Err(AppError::Config(format!(
                "inference.temperature must be a finite number between 0.0 and 2.0, got {}",
                temperature
            )));
        }

        Ok(())
    }
}

fn validate_base_url(field: &str, url: &str) -> AppResult<()> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(AppError::Config(format!(
            "{} must start with 'http://' or 'https://', got '{}'",
            field, url
        )));
    }
    Ok(())
}

impl FromStr for Config {
    type Err = AppError;

    fn from_str(toml_str: &str) -> Result<Self, Self::Err> {
        let config: Config =
            toml::from_str(toml_str).map_err(|source| AppError::ConfigParseFailed {
                path: "<string>".to_string(),
                source,
            })?;

        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const TEST_CONFIG: &str = r#"
[server]
host = "127.0.0.1"
port = 9000
request_timeout_seconds = 10

[inference]
base_url = "http://localhost:1234/v1"
model = "qwen/qwen3-8b"
max_tokens = 256
temperature = 0.2
api_key = "hf_from_file"

[translation]
provider = "libre"
base_url = "http://localhost:5000"

[observability]
log_level = "debug"
"#;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_config_from_str_parses_successfully() {
        let config = Config::from_str(TEST_CONFIG).expect("should parse config");
        assert_eq!(config.server.host, "127.0.0.1");
        assert_eq!(config.server.port, 9000);
        assert_eq!(config.server.request_timeout_seconds, 10);
        assert_eq!(config.inference.model, "qwen/qwen3-8b");
        assert_eq!(config.inference.max_tokens, 256);
        assert_eq!(
            config.inference.api_key.as_ref().map(ApiKey::expose),
            Some("hf_from_file")
        );
        assert_eq!(config.translation.provider, TranslationProvider::Libre);
        assert_eq!(config.translation.base_url(), "http://localhost:5000");
        assert_eq!(config.observability.log_level, "debug");
    }

    #[test]
    fn test_empty_config_uses_defaults() {
        let config = Config::from_str("").expect("empty config should be valid");
        assert_eq!(config.server.host, "0.0.0.0");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout_seconds, 30);
        assert_eq!(config.inference.base_url, "https://router.huggingface.co/v1");
        assert_eq!(config.inference.model, "meta-llama/Llama-3.2-1B-Instruct");
        assert_eq!(config.inference.max_tokens, 500);
        assert_eq!(config.inference.temperature, 0.7);
        assert!(config.inference.api_key.is_none());
        assert_eq!(config.translation.provider, TranslationProvider::Google);
        assert_eq!(
            config.translation.base_url(),
            "https://translate.googleapis.com"
        );
        assert_eq!(config.observability.log_level, "info");
    }

    #[test]
    fn test_libre_provider_default_base_url() {
        let config = Config::from_str("[translation]\nprovider = \"libre\"\n").unwrap();
        assert_eq!(config.translation.base_url(), "https://libretranslate.com");
    }

    #[test]
    fn test_unknown_provider_rejected() {
        let result = Config::from_str("[translation]\nprovider = \"deepl\"\n");
        assert!(matches!(result, Err(AppError::ConfigParseFailed { .. })));
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let result = Config::from_str("[server]\nrequest_timeout_seconds = 0\n");
        let err = result.expect_err("zero timeout should fail validation");
        assert!(err.to_string().contains("request_timeout_seconds"));
    }

    #[test]
    fn test_timeout_above_limit_rejected() {
        let result = Config::from_str("[server]\nrequest_timeout_seconds = 301\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_invalid_base_url_rejected() {
        let result = Config::from_str("[inference]\nbase_url = \"router.huggingface.co/v1\"\n");
        let err = result.expect_err("scheme-less base_url should fail");
        assert!(err.to_string().contains("inference.base_url"));
    }

    #[test]
    fn test_temperature_out_of_range_rejected() {
        let result = Config::from_str("[inference]\ntemperature = 2.5\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_zero_max_tokens_rejected() {
        let result = Config::from_str("[inference]\nmax_tokens = 0\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_blank_model_rejected() {
        let result = Config::from_str("[inference]\nmodel = \"  \"\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_env_overrides_apply() {
        let mut config = Config::default();
        let vars = env(&[
            ("HUGGINGFACE_API_KEY", "hf_env"),
            ("TRANSLATION_API_KEY", "lt_env"),
            ("PORT", "3001"),
            ("HOST", "127.0.0.1"),
        ]);
        config
            .apply_env_overrides(|name| vars.get(name).cloned())
            .expect("overrides should apply");

        assert_eq!(
            config.inference.api_key.as_ref().map(ApiKey::expose),
            Some("hf_env")
        );
        assert_eq!(
            config.translation.api_key.as_ref().map(ApiKey::expose),
            Some("lt_env")
        );
        assert_eq!(config.server.port, 3001);
        assert_eq!(config.server.host, "127.0.0.1");
    }

    #[test]
    fn test_empty_env_values_are_ignored() {
        let mut config = Config::from_str(TEST_CONFIG).unwrap();
        let vars = env(&[("HUGGINGFACE_API_KEY", ""), ("PORT", " ")]);
        config
            .apply_env_overrides(|name| vars.get(name).cloned())
            .unwrap();

        assert_eq!(
            config.inference.api_key.as_ref().map(ApiKey::expose),
            Some("hf_from_file")
        );
        assert_eq!(config.server.port, 9000);
    }

    #[test]
    fn test_invalid_port_env_rejected() {
        let mut config = Config::default();
        let vars = env(&[("PORT", "eighty")]);
        let err = config
            .apply_env_overrides(|name| vars.get(name).cloned())
            .expect_err("non-numeric PORT should fail");
        assert!(err.to_string().contains("eighty"));
    }

    #[test]
    fn test_api_key_debug_is_redacted() {
        let key = ApiKey::new("hf_secret");
        assert_eq!(format!("{:?}", key), "ApiKey(***)");

        let mut config = Config::default();
        config.inference.api_key = Some(key);
        assert!(!format!("{:?}", config).contains("hf_secret"));
    }

    #[test]
    fn test_api_key_not_serialized() {
        let config = Config::from_str(TEST_CONFIG).unwrap();
        let rendered = toml::to_string(&config).expect("config should serialize");
        assert!(!rendered.contains("hf_from_file"));
    }
}
