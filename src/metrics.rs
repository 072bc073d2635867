//! Prometheus metrics collection for cafe-relay
//!
//! Tracks:
//! - Relay requests by endpoint and outcome
//! - Backend call latency by backend kind
//!
//! Metrics are exposed via the `/metrics` endpoint in Prometheus text format.

use prometheus::{
    Encoder, HistogramOpts, HistogramVec, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Relay endpoint label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Chat,
    Translate,
}

impl Endpoint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Endpoint::Chat => "chat",
            Endpoint::Translate => "translate",
        }
    }
}

/// How a relay request ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Success,
    ClientError,
    BackendError,
}

impl Outcome {
    pub fn as_str(&self) -> &'static str {
        match self {
            Outcome::Success => "success",
            Outcome::ClientError => "client_error",
            Outcome::BackendError => "backend_error",
        }
    }
}

/// Upstream provider label
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Inference,
    Translation,
}

impl Backend {
    pub fn as_str(&self) -> &'static str {
        match self {
            Backend::Inference => "inference",
            Backend::Translation => "translation",
        }
    }
}

/// Metrics collector for cafe-relay
///
/// Label values come from the enums above, so cardinality is fixed:
/// 2 endpoints x 3 outcomes for requests, 2 backends for latency.
#[derive(Clone)]
pub struct Metrics {
    pub registry: Arc<Registry>,
    requests_total: IntCounterVec,
    backend_duration: HistogramVec,
}

impl Metrics {
    /// Create a new Metrics instance with its own registry
    ///
    /// # Errors
    ///
    /// Returns an error if metric registration fails (e.g., duplicate names).
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();

        let requests_total = IntCounterVec::new(
            Opts::new(
                "cafe_relay_requests_total",
                "Total number of relay requests by endpoint and outcome",
            ),
            &["endpoint", "outcome"],
        )?;

        // Hosted inference is slow; buckets reach 60s
        let backend_duration = HistogramVec::new(
            HistogramOpts::new(
                "cafe_relay_backend_duration_ms",
                "Backend call latency in milliseconds",
            )
            .buckets(vec![
                10.0, 50.0, 100.0, 250.0, 500.0, 1000.0, 2500.0, 5000.0, 10000.0, 30000.0,
                60000.0,
            ]),
            &["backend"],
        )?;

        registry.register(Box::new(requests_total.clone()))?;
        registry.register(Box::new(backend_duration.clone()))?;

        Ok(Self {
            registry: Arc::new(registry),
            requests_total,
            backend_duration,
        })
    }

    /// Record the outcome of one relay request
    pub fn record_request(
        &self,
        endpoint: Endpoint,
        outcome: Outcome,
    ) -> Result<(), prometheus::Error> {
        self.requests_total
            .get_metric_with_label_values(&[endpoint.as_str(), outcome.as_str()])?
            .inc();
        Ok(())
    }

    /// Record how long a backend call took
    ///
    /// # Errors
    ///
    /// Rejects NaN, infinite and negative durations; they would corrupt the
    /// histogram percentiles.
    pub fn record_backend_duration(
        &self,
        backend: Backend,
        duration_ms: f64,
    ) -> Result<(), prometheus::Error> {
        if !duration_ms.is_finite() || duration_ms < 0.0 {
            return Err(prometheus::Error::Msg(format!(
                "Histogram value must be finite and non-negative, got: {}",
                duration_ms
            )));
        }

        self.backend_duration
            .get_metric_with_label_values(&[backend.as_str()])?
            .observe(duration_ms);
        Ok(())
    }

    /// Current request count for one label pair
    pub fn request_count(&self, endpoint: Endpoint, outcome: Outcome) -> u64 {
        self.requests_total
            .get_metric_with_label_values(&[endpoint.as_str(), outcome.as_str()])
            .map(|counter| counter.get())
            .unwrap_or(0)
    }

    /// Encode all metrics in Prometheus text format
    pub fn gather(&self) -> Result<String, prometheus::Error> {
        let metric_families = self.registry.gather();

        tracing::debug!(
            metric_family_count = metric_families.len(),
            "Encoding metrics to Prometheus text format"
        );

        let mut buffer = Vec::new();
        TextEncoder::new().encode(&metric_families, &mut buffer)?;

        String::from_utf8(buffer).map_err(|e| {
            prometheus::Error::Msg(format!("Metrics output is not valid UTF-8: {}", e))
        })
    }
}
