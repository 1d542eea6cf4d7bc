//! HTTP transport for the inference router.
//!
//! This crate exposes the router's chat pipeline over an OpenAI-compatible
//! `/v1/chat/completions` endpoint, with both whole-response and
//! Server-Sent-Events streaming modes (§6).

pub mod api;
pub mod config;
pub mod formatter;
pub mod handler;
pub mod server;
pub mod state;
pub mod streaming;
pub mod wire;

pub use config::AppConfig;
pub use server::WebServer;
pub use state::AppState;
