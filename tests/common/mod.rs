//! Stub backends and request helpers shared by the integration tests

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{
    Router,
    body::Body,
    http::{Request, Response},
};
use cafe_relay::{
    backend::{ChatBackend, Translator},
    config::Config,
    error::BackendError,
    handlers::{self, AppState},
    models::ChatTurn,
};
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

/// Chat backend returning a fixed reply (or failure) and recording every call
pub struct StubChat {
    reply: Result<String, String>,
    calls: Mutex<Vec<Vec<ChatTurn>>>,
}

impl StubChat {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(detail.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<Vec<ChatTurn>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl ChatBackend for StubChat {
    async fn complete(&self, turns: &[ChatTurn]) -> Result<String, BackendError> {
        self.calls.lock().unwrap().push(turns.to_vec());
        self.reply.clone().map_err(|detail| BackendError::Status {
            backend: "stub-inference",
            status: 503,
            detail,
        })
    }
}

/// One recorded translate call: (text, source, target)
pub type TranslateCall = (String, String, String);

/// Translator returning a fixed translation (or failure) and recording every call
pub struct StubTranslator {
    reply: Result<String, String>,
    calls: Mutex<Vec<TranslateCall>>,
}

impl StubTranslator {
    pub fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Ok(reply.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(detail: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: Err(detail.to_string()),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn calls(&self) -> Vec<TranslateCall> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Translator for StubTranslator {
    async fn translate(
        &self,
        text: &str,
        source: &str,
        target: &str,
    ) -> Result<String, BackendError> {
        self.calls
            .lock()
            .unwrap()
            .push((text.to_string(), source.to_string(), target.to_string()));
        self.reply.clone().map_err(|detail| BackendError::Status {
            backend: "stub-translate",
            status: 502,
            detail,
        })
    }
}

/// Router wired to the given stubs
pub fn app_with(chat: Arc<StubChat>, translator: Arc<StubTranslator>) -> (Router, AppState) {
    let state = AppState::with_backends(Config::default(), chat, translator)
        .expect("state should build");
    (handlers::router(state.clone()), state)
}

pub fn post_json(uri: &str, body: &str) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

pub fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).expect("response body should be JSON")
}
