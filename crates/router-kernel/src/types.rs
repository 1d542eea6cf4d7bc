//! Core data model shared by every component of the inference router.
//!
//! These types are the vocabulary the Intent Analyzer, Response Validator,
//! Tool Registry, and Tool Executor all speak. They carry no behavior beyond
//! small constructors and are safe to pass across task boundaries.

use serde::{Deserialize, Serialize};

/// A single turn in a conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
}

impl Message {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// The two structured overrides a caller may supply alongside a chat request.
/// Either field, when present, wins over whatever the Intent Analyzer infers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestOverrides {
    pub namespace: Option<String>,
    pub project_id: Option<String>,
}

impl RequestOverrides {
    pub fn is_empty(&self) -> bool {
        self.namespace.is_none() && self.project_id.is_none()
    }
}

/// The action vocabulary the analyzer recognizes. Kept closed (not an open
/// string) because every downstream consumer switches on it exhaustively.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Action {
    Create,
    List,
}

impl Action {
    pub fn as_str(self) -> &'static str {
        match self {
            Action::Create => "create",
            Action::List => "list",
        }
    }
}

/// Structured extraction result produced by the Intent Analyzer for a single
/// message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentAnalysis {
    pub action: Action,
    pub namespace: String,
    pub project_id: Option<String>,
    pub confidence: f64,
    pub reasoning: String,
}

impl IntentAnalysis {
    /// The analyzer's total-function fallback for empty input (§4.2).
    pub fn empty_message(default_namespace: &str) -> Self {
        Self {
            action: Action::List,
            namespace: default_namespace.to_string(),
            project_id: None,
            confidence: 0.0,
            reasoning: "empty message".to_string(),
        }
    }

    /// Apply request-supplied overrides, annotating `reasoning` when either
    /// field is actually changed. Override dominance (§8) lives here.
    pub fn apply_overrides(&mut self, overrides: &RequestOverrides, default_namespace: &str) {
        let mut notes = Vec::new();

        if let Some(ns) = &overrides.namespace {
            if ns != &self.namespace {
                notes.push(format!("namespace overridden to '{ns}' by request"));
            }
            self.namespace = ns.clone();
        }
        if self.namespace.is_empty() {
            self.namespace = default_namespace.to_string();
        }

        if let Some(pid) = &overrides.project_id {
            if self.project_id.as_deref() != Some(pid.as_str()) {
                notes.push(format!("project_id overridden to '{pid}' by request"));
            }
            self.project_id = Some(pid.clone());
        }

        if !notes.is_empty() {
            self.reasoning = format!("{}; {}", self.reasoning, notes.join("; "));
        }
    }
}

/// Typed input to the reference "projects" tool. Other tools in a larger
/// deployment would declare their own input shape; the registry does not
/// introspect this one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolInput {
    pub action: Action,
    pub namespace: String,
    pub project_id: Option<String>,
}

/// What a tool itself returns. Tools never throw across the `run` boundary;
/// failure is represented in-band via `success=false`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolOutput {
    pub success: bool,
    pub message: String,
    pub payload: serde_json::Value,
}

impl ToolOutput {
    pub fn ok(message: impl Into<String>, payload: serde_json::Value) -> Self {
        Self {
            success: true,
            message: message.into(),
            payload,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            payload: serde_json::Value::Null,
        }
    }
}

/// How a tool result came to be: the Agent handled it through native
/// function-calling, the core re-ran it manually, or manual execution itself
/// failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IntegrationMode {
    Native,
    Manual,
    ManualFailed,
}

/// The core-level wrapper around a tool invocation, carrying enough to both
/// render a user-facing reply and keep an audit trail.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    pub success: bool,
    pub action: Action,
    pub namespace: String,
    pub message: String,
    pub payload: serde_json::Value,
    pub integration_mode: IntegrationMode,
}

/// The reply from an `Agent` after one `run()` call. Native tool calls (if
/// any) are surfaced but not interpreted here -- the request handler decides
/// what, if anything, to do with them.
#[derive(Debug, Clone, Default)]
pub struct AgentReply {
    pub text: String,
    pub native_tool_calls: Vec<serde_json::Value>,
}
