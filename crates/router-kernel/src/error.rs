//! Kernel error types.
//!
//! All kernel subsystems surface errors through [`KernelError`], which is the
//! single error type returned by every public API in this crate.  Each variant
//! carries enough context for callers to decide how to handle the failure
//! without inspecting opaque strings.

/// Unified error type for the inference router's core.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    /// The requested tool is not registered.
    #[error("tool not found: {name}")]
    ToolNotFound { name: String },

    /// The tool is registered but reported itself unhealthy.
    #[error("tool unavailable: {name} ({reason})")]
    ToolUnavailable { name: String, reason: String },

    /// Registering the built-in tools failed and the registry is empty.
    #[error("tool registry initialization failed: {reason}")]
    RegistryInitFailed { reason: String },

    /// A tool invocation raised instead of returning an in-band failure.
    #[error("tool '{name}' invocation failed: {reason}")]
    ToolInvocationFailed { name: String, reason: String },

    /// Catch-all for unexpected internal errors that don't fit a specific
    /// variant. Prefer a typed variant whenever possible.
    #[error("internal error: {0}")]
    Internal(String),
}

/// Convenience alias used throughout the kernel crate.
pub type Result<T> = std::result::Result<T, KernelError>;
