//! Tool Executor (§4.4): re-does the work the Agent failed to do, by name,
//! through the typed tool registry.

use std::sync::Arc;

use futures::future::BoxFuture;
use router_kernel::{Action, IntegrationMode, RequestOverrides, ToolInput, ToolRegistry, ToolResult};

use crate::analyzer::IntentAnalyzer;

/// Initializer invoked (at most once, guarded by the registry itself) to
/// seed the built-in tools on first use.
pub type RegistryInit =
    Arc<dyn Fn(ToolRegistry) -> BoxFuture<'static, router_kernel::Result<()>> + Send + Sync>;

pub struct ToolExecutor {
    registry: Arc<ToolRegistry>,
    analyzer: Arc<IntentAnalyzer>,
    init: RegistryInit,
    /// Only one tool per request (§4.4); this crate ships exactly one.
    tool_name: String,
}

impl ToolExecutor {
    pub fn new(
        registry: Arc<ToolRegistry>,
        analyzer: Arc<IntentAnalyzer>,
        tool_name: impl Into<String>,
        init: RegistryInit,
    ) -> Self {
        Self {
            registry,
            analyzer,
            init,
            tool_name: tool_name.into(),
        }
    }

    pub async fn execute(&self, message: &str, overrides: &RequestOverrides) -> ToolResult {
        if let Err(err) = self.registry.ensure_initialized(|reg| (self.init)(reg)).await {
            tracing::error!(error = %err, "failed to initialize tool registry for manual execution");
            return unavailable_result(format!("tool system not available: {err}"));
        }

        let tool = match self.registry.get(&self.tool_name) {
            Ok(tool) => tool,
            Err(err) => {
                tracing::error!(error = %err, tool = %self.tool_name, "tool not registered");
                return unavailable_result(err.to_string());
            }
        };

        let analysis = self.analyzer.analyze(message, overrides).await;

        tracing::info!(
            action = analysis.action.as_str(),
            namespace = %analysis.namespace,
            project_id = ?analysis.project_id,
            confidence = analysis.confidence,
            reasoning = %analysis.reasoning,
            "executing manual tool action"
        );

        if matches!(analysis.action, Action::Create) && analysis.project_id.is_none() {
            return ToolResult {
                success: false,
                action: analysis.action,
                namespace: analysis.namespace,
                message: "Please specify a project name to create. For example: 'Create project my_app'".to_string(),
                payload: serde_json::Value::Null,
                integration_mode: IntegrationMode::Manual,
            };
        }

        let input = ToolInput {
            action: analysis.action,
            namespace: analysis.namespace.clone(),
            project_id: analysis.project_id.clone(),
        };

        let output = tool.run(input).await;

        ToolResult {
            success: output.success,
            action: analysis.action,
            namespace: analysis.namespace,
            message: output.message,
            payload: output.payload,
            integration_mode: if output.success {
                IntegrationMode::Manual
            } else {
                IntegrationMode::ManualFailed
            },
        }
    }
}

fn unavailable_result(message: impl Into<String>) -> ToolResult {
    ToolResult {
        success: false,
        // The original service models this case with an untyped "unknown"
        // action string; our closed `Action` enum has no such variant, so
        // this path arbitrarily reports `List` -- it's never read as a real
        // action since `success` is false (see DESIGN.md).
        action: Action::List,
        namespace: "unknown".to_string(),
        message: message.into(),
        payload: serde_json::Value::Null,
        integration_mode: IntegrationMode::ManualFailed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use router_kernel::defaults::default_analysis_config;
    use router_kernel::{Tool, ToolOutput, ToolSchema};
    use serde_json::json;

    use crate::llm::{LlmClient, LlmClientConfig};

    struct StubProjects;

    #[async_trait]
    impl Tool for StubProjects {
        fn name(&self) -> &str {
            "projects"
        }
        fn schema(&self) -> ToolSchema {
            ToolSchema {
                name: "projects".into(),
                description: "stub".into(),
                input_schema: json!({}),
                output_schema: json!({}),
            }
        }
        async fn run(&self, input: ToolInput) -> ToolOutput {
            match input.action {
                Action::List => ToolOutput::ok("listed", json!({"total": 0, "projects": []})),
                Action::Create => ToolOutput::ok(
                    "created",
                    json!({"project_id": input.project_id, "path": input.namespace}),
                ),
            }
        }
        async fn health_check(&self) -> bool {
            true
        }
    }

    fn executor() -> ToolExecutor {
        let llm = LlmClient::new(LlmClientConfig::new("http://127.0.0.1:1", "llama3.1")).unwrap();
        let analyzer = Arc::new(IntentAnalyzer::new(llm, &default_analysis_config()));
        let registry = Arc::new(ToolRegistry::new());
        let init: RegistryInit = Arc::new(|reg: ToolRegistry| {
            Box::pin(async move {
                reg.register(Arc::new(StubProjects));
                Ok(())
            })
        });
        ToolExecutor::new(registry, analyzer, "projects", init)
    }

    #[tokio::test]
    async fn create_without_project_id_short_circuits_with_guidance() {
        let executor = executor();
        let result = executor
            .execute("create a project", &RequestOverrides::default())
            .await;
        assert!(!result.success);
        assert_eq!(result.integration_mode, IntegrationMode::Manual);
        assert!(result.message.contains("specify a project name"));
    }

    #[tokio::test]
    async fn create_with_project_id_invokes_tool() {
        let executor = executor();
        let result = executor
            .execute(
                "create a new project called demo in dev namespace",
                &RequestOverrides::default(),
            )
            .await;
        assert!(result.success);
        assert_eq!(result.namespace, "dev");
        assert_eq!(result.integration_mode, IntegrationMode::Manual);
    }

    #[tokio::test]
    async fn list_invokes_tool() {
        let executor = executor();
        let result = executor
            .execute("list projects", &RequestOverrides::default())
            .await;
        assert!(result.success);
        assert_eq!(result.action, Action::List);
    }

    #[tokio::test]
    async fn unknown_tool_name_is_manual_failed() {
        let llm = LlmClient::new(LlmClientConfig::new("http://127.0.0.1:1", "llama3.1")).unwrap();
        let analyzer = Arc::new(IntentAnalyzer::new(llm, &default_analysis_config()));
        let registry = Arc::new(ToolRegistry::new());
        let init: RegistryInit = Arc::new(|_reg: ToolRegistry| Box::pin(async move { Ok(()) }));
        let executor = ToolExecutor::new(registry, analyzer, "does-not-exist", init);

        let result = executor
            .execute("list projects", &RequestOverrides::default())
            .await;
        assert!(!result.success);
        assert_eq!(result.integration_mode, IntegrationMode::ManualFailed);
    }
}
