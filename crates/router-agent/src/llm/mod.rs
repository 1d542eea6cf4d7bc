//! LLM integration layer: wire types and the OpenAI-compatible client.

pub mod client;
pub mod types;

pub use client::{LlmClient, LlmClientConfig};
pub use types::{ChatRequest, LlmResponse, Message, Role, ToolCall, ToolDefinition, Usage};
