//! HTTP request handlers for the cafe-relay API

use crate::backend::{self, ChatBackend, InferenceClient, Translator};
use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::metrics::{Backend, Endpoint, Metrics, Outcome};
use crate::middleware::{RequestId, request_id_middleware};
use axum::{
    Router, middleware,
    routing::{get, post},
};
use std::sync::Arc;
use std::time::Instant;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub mod chat;
pub mod extractor;
pub mod health;
pub mod metrics;
pub mod status;
pub mod translate;

/// Application state shared across all handlers
///
/// Holds read-only configuration, the injected backends and the metrics
/// registry. All fields are Arc'd for cheap cloning across Axum handlers.
#[derive(Clone)]
pub struct AppState {
    config: Arc<Config>,
    chat_backend: Arc<dyn ChatBackend>,
    translator: Arc<dyn Translator>,
    metrics: Arc<Metrics>,
}

impl AppState {
    /// Build state with the HTTP backends described by `config`
    pub fn new(config: Config) -> AppResult<Self> {
        let http = backend::http_client(&config)?;
        let timeout_seconds = config.server.request_timeout_seconds;

        let chat_backend: Arc<dyn ChatBackend> = Arc::new(InferenceClient::new(
            http.clone(),
            &config.inference,
            timeout_seconds,
        ));
        let translator = backend::translator_from_config(&config, http);

        tracing::info!(
            inference_url = %config.inference.base_url,
            model = %config.inference.model,
            translation_provider = ?config.translation.provider,
            translation_url = %config.translation.base_url(),
            "Backends configured"
        );

        Self::with_backends(config, chat_backend, translator)
    }

    /// Build state around caller-supplied backends
    pub fn with_backends(
        config: Config,
        chat_backend: Arc<dyn ChatBackend>,
        translator: Arc<dyn Translator>,
    ) -> AppResult<Self> {
        let metrics = Metrics::new()
            .map_err(|e| AppError::Internal(format!("Failed to initialize metrics: {}", e)))?;

        Ok(Self {
            config: Arc::new(config),
            chat_backend,
            translator,
            metrics: Arc::new(metrics),
        })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn chat_backend(&self) -> &dyn ChatBackend {
        self.chat_backend.as_ref()
    }

    pub fn translator(&self) -> &dyn Translator {
        self.translator.as_ref()
    }

    pub fn metrics(&self) -> &Metrics {
        &self.metrics
    }

    /// Count a finished relay request
    ///
    /// Metrics failures are logged and never fail the request.
    pub(crate) fn record_outcome(
        &self,
        request_id: RequestId,
        endpoint: Endpoint,
        outcome: Outcome,
    ) {
        if let Err(e) = self.metrics.record_request(endpoint, outcome) {
            tracing::error!(
                request_id = %request_id,
                endpoint = endpoint.as_str(),
                outcome = outcome.as_str(),
                error = %e,
                "Metrics recording failed (non-fatal)"
            );
        }
    }

    /// Record backend latency measured from `started`
    pub(crate) fn record_backend_latency(
        &self,
        request_id: RequestId,
        backend: Backend,
        started: Instant,
    ) -> f64 {
        let duration_ms = started.elapsed().as_secs_f64() * 1000.0;
        if let Err(e) = self.metrics.record_backend_duration(backend, duration_ms) {
            tracing::error!(
                request_id = %request_id,
                backend = backend.as_str(),
                error = %e,
                "Metrics recording failed (non-fatal)"
            );
        }
        duration_ms
    }
}

/// Build the application router with all routes and middleware
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status::handler))
        .route("/health", get(health::handler))
        .route("/metrics", get(metrics::handler))
        .route("/api/chatbot", post(chat::handler))
        .route("/api/translate", post(translate::handler))
        .with_state(state)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
}
