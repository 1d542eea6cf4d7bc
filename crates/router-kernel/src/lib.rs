//! Core of the inference router: shared data model, the Tool Registry, the
//! rule-based Intent Analyzer strategy, and the Response Validator.
//!
//! - **[`types`]** -- the data model every other component speaks (`Message`,
//!   `IntentAnalysis`, `ToolInput`/`ToolOutput`/`ToolResult`, ...).
//! - **[`tool`]** -- the `Tool` trait every registry entry implements.
//! - **[`registry`]** -- the concurrent, lazy-once-initialized Tool Registry.
//! - **[`analysis`]** -- immutable configuration data for rules and validation.
//! - **[`defaults`]** -- built-in fallback values for that configuration.
//! - **[`rule_analyzer`]** -- the deterministic rule-based analyzer strategy.
//! - **[`validator`]** -- the Response Validator.
//! - **[`error`]** -- unified error type via [`thiserror`].
//!
//! All public types are `Send + Sync` and designed for use within a
//! multi-threaded tokio runtime.

pub mod analysis;
pub mod defaults;
pub mod error;
pub mod registry;
pub mod rule_analyzer;
pub mod tool;
pub mod types;
pub mod validator;

// Re-export the most commonly used types at the crate root for convenience.
pub use analysis::{AnalysisConfig, AnalysisRule, ValidationConfig};
pub use error::{KernelError, Result};
pub use registry::ToolRegistry;
pub use rule_analyzer::RuleBasedAnalyzer;
pub use tool::{Tool, ToolSchema};
pub use types::{
    Action, AgentReply, IntentAnalysis, IntegrationMode, Message, RequestOverrides, Role,
    ToolInput, ToolOutput, ToolResult,
};
pub use validator::ResponseValidator;
