//! Agent runtime for the inference router.
//!
//! - [`llm`] -- OpenAI-compatible chat-completion client and wire types.
//! - [`analyzer`] -- the hybrid (LLM-primary, rule-fallback) Intent Analyzer.
//! - [`agent`] -- the per-session `Agent`.
//! - [`session`] -- the `SessionManager`.
//! - [`executor`] -- the `ToolExecutor`.
//! - [`error`] -- agent error types.

pub mod agent;
pub mod analyzer;
pub mod error;
pub mod executor;
pub mod llm;
pub mod session;

pub use agent::{Agent, ToolCallingMode};
pub use analyzer::IntentAnalyzer;
pub use error::{AgentError, Result};
pub use executor::{RegistryInit, ToolExecutor};
pub use session::{SessionManager, SharedAgent};

/// Model-name substrings known to support native function calling on the
/// reference (Ollama) deployment. File-overridable via `LlmConfig`.
pub const TOOL_CALLING_MODELS: &[&str] = &[
    "llama3.1",
    "mistral-nemo",
    "firefunction-v2",
    "hermes3",
];
