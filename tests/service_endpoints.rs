//! Integration tests for the status, health and metrics endpoints and the
//! router-wide middleware

mod common;

use axum::{
    body::Body,
    http::{Request, StatusCode},
};
use cafe_relay::middleware::REQUEST_ID_HEADER;
use common::{StubChat, StubTranslator, app_with, body_json, get, post_json, send};

fn app() -> axum::Router {
    app_with(StubChat::replying("ok"), StubTranslator::replying("ok")).0
}

#[tokio::test]
async fn test_root_describes_service() {
    let response = send(app(), get("/")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["message"], "Coffee Expert Chatbot API is running!");
    assert_eq!(
        body["endpoints"]["chatbot"],
        "POST /api/chatbot - Coffee expert chatbot"
    );
    assert_eq!(
        body["endpoints"]["translate"],
        "POST /api/translate - Translation service"
    );
}

#[tokio::test]
async fn test_health_endpoint_returns_ok() {
    let response = send(app(), get("/health")).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_json(response).await["status"], "OK");
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let response = send(app(), get("/api/unknown")).await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_get_on_relay_is_method_not_allowed() {
    let response = send(app(), get("/api/chatbot")).await;
    assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
}

#[tokio::test]
async fn test_every_response_carries_request_id() {
    for request in [
        get("/"),
        post_json("/api/chatbot", "{}"),
        post_json("/api/translate", r#"{"text": "Hi"}"#),
    ] {
        let response = send(app(), request).await;
        assert!(
            response.headers().contains_key(REQUEST_ID_HEADER),
            "missing request id on {}",
            response.status()
        );
    }
}

#[tokio::test]
async fn test_cors_preflight_is_allowed() {
    let request = Request::builder()
        .method("OPTIONS")
        .uri("/api/translate")
        .header("origin", "http://localhost:5173")
        .header("access-control-request-method", "POST")
        .header("access-control-request-headers", "content-type")
        .body(Body::empty())
        .unwrap();

    let response = send(app(), request).await;
    assert!(response.status().is_success());
    assert!(
        response
            .headers()
            .contains_key("access-control-allow-origin")
    );
}

#[tokio::test]
async fn test_metrics_reflect_relay_traffic() {
    let (app, _) = app_with(StubChat::replying("ok"), StubTranslator::replying("ok"));

    let response = send(app.clone(), post_json("/api/chatbot", r#"{"message": "hi"}"#)).await;
    assert_eq!(response.status(), StatusCode::OK);
    let response = send(app.clone(), post_json("/api/translate", "{}")).await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = send(app, get("/metrics")).await;
    assert_eq!(response.status(), StatusCode::OK);
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8_lossy(&bytes);

    assert!(text.contains(r#"cafe_relay_requests_total{endpoint="chat",outcome="success"} 1"#));
    assert!(
        text.contains(r#"cafe_relay_requests_total{endpoint="translate",outcome="client_error"} 1"#)
    );
    assert!(text.contains(r#"cafe_relay_backend_duration_ms_count{backend="inference"} 1"#));
}
