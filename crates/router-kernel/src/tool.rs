//! The `Tool` trait: the contract every registry entry must satisfy.
//!
//! A tool is a total function from [`ToolInput`] to [`ToolOutput`] -- it never
//! raises across this boundary, only returns `success=false` in-band. Input
//! and output schemas travel with the tool as plain JSON Schema values rather
//! than being inferred from the implementing type; this is what lets the
//! registry stay a dumb name -> tool map instead of doing reflection.

use async_trait::async_trait;
use serde_json::Value;

use crate::types::{ToolInput, ToolOutput};

/// Declarative metadata a tool reports about itself.
#[derive(Debug, Clone)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
    pub output_schema: Value,
}

#[async_trait]
pub trait Tool: Send + Sync {
    /// Stable name this tool is registered under.
    fn name(&self) -> &str;

    /// Declared input/output schema and descriptive metadata.
    fn schema(&self) -> ToolSchema;

    /// Execute the tool. Must be total: any internal failure is reported as
    /// `ToolOutput { success: false, .. }`, never a panic or propagated error.
    async fn run(&self, input: ToolInput) -> ToolOutput;

    /// Self-check used by `ToolRegistry::health_check_all`.
    async fn health_check(&self) -> bool;
}
