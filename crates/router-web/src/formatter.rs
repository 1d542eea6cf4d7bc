//! Response formatting (§4.6, §7): turns a core-level `ToolResult` into the
//! user-facing reply text and an accompanying tool-info marker, exactly the
//! shape and wording of the original service's `ResponseFormatter`.

use serde_json::{Value, json};

use router_kernel::{Action, IntegrationMode, ToolResult};

/// Render a `ToolResult` as the final reply text shown to the user.
pub fn format_tool_response(result: &ToolResult) -> String {
    if !result.success {
        return format!("I encountered an issue: {}", result.message);
    }

    match result.action {
        Action::List => format_list(result),
        Action::Create => format_create(result),
    }
}

fn format_list(result: &ToolResult) -> String {
    let total = result.payload["total"].as_u64().unwrap_or(0);
    if total == 0 {
        return format!("I found no projects in the '{}' namespace.", result.namespace);
    }

    let mut response = format!(
        "I found {total} project(s) in the '{}' namespace:\n\n",
        result.namespace
    );
    if let Some(projects) = result.payload["projects"].as_array() {
        for project in projects {
            if let Some(name) = project.as_str() {
                response.push_str(&format!("• **{name}**\n\n"));
            }
        }
    }
    response.trim_end().to_string()
}

fn format_create(result: &ToolResult) -> String {
    let project_id = result.payload["project_id"].as_str().unwrap_or_default();
    format!(
        "✅ Successfully created project '{project_id}' in namespace '{}'",
        result.namespace
    )
}

/// Tool-info metadata attached to a manually-executed reply, matching
/// `ResponseFormatter.create_tool_info`.
pub fn tool_info(result: &ToolResult) -> Value {
    let mode_str = integration_mode_str(result.integration_mode);
    json!([{
        "tool_used": "projects",
        "integration_type": mode_str,
        "action": result.action.as_str(),
        "namespace": result.namespace,
        "message": format!(
            "{} {}",
            title_case(mode_str),
            if result.success { "successful" } else { "failed" }
        ),
    }])
}

/// Tool-info metadata attached optimistically when no manual execution ran
/// but the message was tool-related (§9 open question: the marker doesn't
/// inspect whether a native tool call actually happened).
pub fn native_tool_info() -> Value {
    json!([{
        "tool_used": "projects",
        "integration_type": "native",
        "message": "Native tool integration used",
    }])
}

fn integration_mode_str(mode: IntegrationMode) -> &'static str {
    match mode {
        IntegrationMode::Native => "native",
        IntegrationMode::Manual => "manual",
        IntegrationMode::ManualFailed => "manual_failed",
    }
}

fn title_case(s: &str) -> String {
    s.split('_')
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => first.to_uppercase().collect::<String>() + chars.as_str(),
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ok_list(total: u64, names: &[&str]) -> ToolResult {
        ToolResult {
            success: true,
            action: Action::List,
            namespace: "dev".to_string(),
            message: String::new(),
            payload: json!({ "total": total, "projects": names }),
            integration_mode: IntegrationMode::Manual,
        }
    }

    #[test]
    fn list_zero_projects() {
        let result = ok_list(0, &[]);
        assert_eq!(
            format_tool_response(&result),
            "I found no projects in the 'dev' namespace."
        );
    }

    #[test]
    fn list_with_projects_includes_bullets() {
        let result = ok_list(2, &["alpha", "beta"]);
        let text = format_tool_response(&result);
        assert!(text.starts_with("I found 2 project(s) in the 'dev' namespace:"));
        assert!(text.contains("• **alpha**"));
        assert!(text.contains("• **beta**"));
    }

    #[test]
    fn create_success_message() {
        let result = ToolResult {
            success: true,
            action: Action::Create,
            namespace: "dev".to_string(),
            message: String::new(),
            payload: json!({ "project_id": "demo", "path": "/root/dev/demo" }),
            integration_mode: IntegrationMode::Manual,
        };
        assert_eq!(
            format_tool_response(&result),
            "✅ Successfully created project 'demo' in namespace 'dev'"
        );
    }

    #[test]
    fn failure_includes_message_verbatim() {
        let result = ToolResult {
            success: false,
            action: Action::List,
            namespace: "unknown".to_string(),
            message: "tool system not available: boom".to_string(),
            payload: Value::Null,
            integration_mode: IntegrationMode::ManualFailed,
        };
        assert_eq!(
            format_tool_response(&result),
            "I encountered an issue: tool system not available: boom"
        );
    }

    #[test]
    fn tool_info_title_cases_integration_type() {
        let result = ok_list(1, &["alpha"]);
        let info = tool_info(&result);
        assert_eq!(info[0]["message"], "Manual successful");
    }
}
