//! Prometheus metrics endpoint

use axum::{extract::State, http::StatusCode};

use crate::handlers::AppState;

/// Metrics handler for Prometheus scraping
///
/// # Response
///
/// - `200 OK` with metrics in Prometheus text format
/// - `500 Internal Server Error` if encoding fails
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/metrics
/// # HELP cafe_relay_requests_total Total number of relay requests by endpoint and outcome
/// # TYPE cafe_relay_requests_total counter
/// cafe_relay_requests_total{endpoint="chat",outcome="success"} 42
/// ```
pub async fn handler(State(state): State<AppState>) -> (StatusCode, String) {
    match state.metrics().gather() {
        Ok(output) => (StatusCode::OK, output),
        Err(e) => {
            tracing::error!(error = %e, "Failed to gather metrics for Prometheus scraping");
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                format!("Failed to gather metrics: {}", e),
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::metrics::{Endpoint, Outcome};

    #[tokio::test]
    async fn test_metrics_handler_returns_prometheus_format() {
        let state = AppState::new(Config::default()).expect("state should build");
        state
            .metrics()
            .record_request(Endpoint::Translate, Outcome::Success)
            .unwrap();

        let (status, body) = handler(State(state)).await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("cafe_relay_requests_total"));
        assert!(body.contains(r#"endpoint="translate""#));
    }
}
