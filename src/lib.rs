//! cafe-relay - HTTP relay for a coffee-expert chatbot and text translation
//!
//! Two stateless relays share one server: `/api/chatbot` forwards a message
//! and optional history to an OpenAI-compatible inference endpoint, and
//! `/api/translate` forwards text to a translation provider. Backends sit
//! behind traits and are injected through [`handlers::AppState`].

pub mod backend;
pub mod cli;
pub mod config;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod models;
pub mod telemetry;
