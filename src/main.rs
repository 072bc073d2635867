//! cafe-relay HTTP server
//!
//! Loads configuration, builds the backends and serves the relay API.

use cafe_relay::{
    cli::{Cli, Command, generate_config_template},
    config::Config,
    handlers::{self, AppState},
    telemetry,
};
use clap::Parser;
use std::net::{IpAddr, SocketAddr};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if let Some(Command::Config { output }) = cli.command {
        let template = generate_config_template();
        match output {
            Some(path) => {
                std::fs::write(&path, template)?;
                eprintln!("Wrote configuration template to {}", path);
            }
            None => print!("{}", template),
        }
        return Ok(());
    }

    // Must run before Config::load so .env keys act as overrides
    let dotenv = dotenvy::dotenv();

    let config = Config::load(cli.config.as_deref())?;
    telemetry::init(&config.observability.log_level);

    match dotenv {
        Ok(path) => tracing::info!(path = %path.display(), "Loaded environment from file"),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!(error = %e, "Failed to load .env file"),
    }

    let ip = config.server.host.parse::<IpAddr>().unwrap_or_else(|_| {
        tracing::warn!(
            host = %config.server.host,
            "Invalid host address, binding to 0.0.0.0"
        );
        IpAddr::from([0, 0, 0, 0])
    });
    let addr = SocketAddr::from((ip, config.server.port));

    let state = AppState::new(config)?;
    let app = handlers::router(state);

    tracing::info!("Listening on {}", addr);
    tracing::info!("Chat relay available at http://{}/api/chatbot", addr);
    tracing::info!("Translation relay available at http://{}/api/translate", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
