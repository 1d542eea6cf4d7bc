//! Integration tests for the router-kernel crate: the rule-based analyzer,
//! the response validator, and the tool registry exercised together as a
//! caller outside the crate would use them.

use std::sync::Arc;

use async_trait::async_trait;
use router_kernel::{
    defaults::{default_analysis_config, default_validation_config},
    Action, KernelError, ResponseValidator, RuleBasedAnalyzer, Tool, ToolInput, ToolOutput,
    ToolRegistry, ToolSchema,
};
use serde_json::json;

struct ProjectsStub;

#[async_trait]
impl Tool for ProjectsStub {
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
            Action::List => ToolOutput::ok(
                "listed",
                json!({ "total": 2, "projects": ["alpha", "beta"] }),
            ),
            Action::Create => ToolOutput::ok(
                "created",
                json!({ "project_id": input.project_id, "path": input.namespace }),
            ),
        }
    }

    async fn health_check(&self) -> bool {
        true
    }
}

#[test]
fn override_dominance_holds_for_any_message() {
    let analyzer = RuleBasedAnalyzer::new(&default_analysis_config());
    let messages = [
        "list projects",
        "create a project called demo",
        "show me my stuff in prod namespace",
    ];

    for message in messages {
        let mut analysis = analyzer.analyze(message);
        let overrides = router_kernel::RequestOverrides {
            namespace: Some("forced-namespace".to_string()),
            project_id: None,
        };
        analysis.apply_overrides(&overrides, "test");
        assert_eq!(analysis.namespace, "forced-namespace");
    }
}

#[test]
fn validator_pre_gate_ignores_reply_content_for_unrelated_messages() {
    let validator = ResponseValidator::new(default_validation_config());
    let replies = ["ok", "", "[number of projects]", "i don't have access to that"];

    for reply in replies {
        assert!(!validator.needs_manual_execution(reply, "what's the weather like today"));
    }
}

#[tokio::test]
async fn registry_tool_not_found_is_tagged() {
    let registry = ToolRegistry::new();
    let err = registry.get("projects").unwrap_err();
    assert!(matches!(err, KernelError::ToolNotFound { name } if name == "projects"));
}

#[tokio::test]
async fn registry_lazy_init_then_analyzer_and_tool_round_trip() {
    let registry = ToolRegistry::new();
    registry
        .ensure_initialized(|reg| async move {
            reg.register(Arc::new(ProjectsStub));
            Ok(())
        })
        .await
        .unwrap();

    let analyzer = RuleBasedAnalyzer::new(&default_analysis_config());
    let analysis = analyzer.analyze("create a new project called demo in dev namespace");
    assert_eq!(analysis.action, Action::Create);
    assert_eq!(analysis.namespace, "dev");
    assert_eq!(analysis.project_id.as_deref(), Some("demo"));

    let tool = registry.get("projects").unwrap();
    let output = tool
        .run(ToolInput {
            action: analysis.action,
            namespace: analysis.namespace,
            project_id: analysis.project_id,
        })
        .await;
    assert!(output.success);
}
