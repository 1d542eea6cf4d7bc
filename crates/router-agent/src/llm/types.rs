//! Core types for LLM interaction.
//!
//! The conversational [`Message`]/[`Role`] types are shared with the rest of
//! the router via `router_kernel`; this module adds the pieces specific to
//! talking to a chat-completion endpoint: tool declarations, tool calls, and
//! the aggregate response shape.

use serde::{Deserialize, Serialize};
use serde_json::Value;

pub use router_kernel::{Message, Role};

/// A tool invocation requested by the model (native tool-calling mode).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Identifier assigned by the endpoint for correlating results.
    pub id: String,
    /// The name of the tool to invoke.
    pub name: String,
    /// Arguments as a JSON value; structure depends on the tool's schema.
    pub arguments: Value,
}

/// A tool definition exposed to the model so it knows what's available.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A full request to send to the chat-completion endpoint.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// Model identifier; empty means "use the client's configured default".
    pub model: String,
    /// Full conversation history including the newest user turn.
    pub messages: Vec<Message>,
    /// Tool definitions the model may invoke. Only sent in "tools" mode.
    pub tools: Vec<ToolDefinition>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub max_tokens: Option<u32>,
    pub stop: Vec<String>,
}

/// The high-level response from the endpoint after processing a turn.
#[derive(Debug, Clone)]
pub enum LlmResponse {
    /// The model produced a final text answer.
    Text(String),
    /// The model wants to invoke one or more tools before continuing.
    ToolCalls(Vec<ToolCall>),
}

/// Token usage, best-effort -- see `router-web`'s wire types for the
/// whitespace-based estimate this crate reports when a provider omits it.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
}
