//! Agent error types.
//!
//! All agent subsystems surface errors through [`AgentError`]. Each variant
//! carries enough context for callers to decide how to handle the failure.

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// An HTTP request to the LLM endpoint failed.
    #[error("llm request failed: {reason}")]
    LlmRequestFailed { reason: String },

    /// The LLM's structured-output reply could not be parsed into the
    /// expected schema.
    #[error("llm response parse error: {reason}")]
    LlmParseFailed { reason: String },

    /// The API key is missing for an endpoint that requires one.
    #[error("missing api key for llm endpoint")]
    MissingApiKey,

    /// A tool call referenced by the caller does not exist in the registry.
    #[error("unknown tool: {tool_name}")]
    UnknownTool { tool_name: String },

    /// A tool invocation failed even after being caught in-band.
    #[error("tool execution failed for `{tool_name}`: {reason}")]
    ToolExecutionFailed { tool_name: String, reason: String },

    /// Configuration validation or loading failed.
    #[error("config error: {reason}")]
    ConfigError { reason: String },

    /// JSON serialization or deserialization failed.
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),

    /// An error propagated from the kernel crate.
    #[error("kernel error: {0}")]
    Kernel(#[from] router_kernel::KernelError),

    /// Catch-all for unexpected internal errors. Prefer a typed variant
    /// whenever possible.
    #[error("internal agent error: {0}")]
    Internal(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;

impl From<reqwest::Error> for AgentError {
    fn from(err: reqwest::Error) -> Self {
        Self::LlmRequestFailed {
            reason: err.to_string(),
        }
    }
}
