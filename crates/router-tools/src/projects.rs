//! The reference "projects" tool (§4.7): `list` and `create` over a
//! `namespace` directory under a configured root.
//!
//! A namespace is a directory name under `root_dir`; a project is a
//! subdirectory within it. Namespace and project-id segments are validated
//! against a conservative charset before touching the filesystem --
//! rejecting path-traversal segments is a hard invariant here, not a nicety.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use router_kernel::{Action, Tool, ToolInput, ToolOutput, ToolSchema};
use serde_json::json;
use tracing::{debug, info, warn};

pub struct ProjectsTool {
    root_dir: PathBuf,
}

impl ProjectsTool {
    pub fn new(root_dir: impl Into<PathBuf>) -> Self {
        Self {
            root_dir: root_dir.into(),
        }
    }

    /// Reject path-traversal and otherwise unsafe segments before they ever
    /// reach the filesystem. Conservative on purpose: alphanumeric, `-`, `_`
    /// only.
    fn validate_segment(segment: &str) -> Result<(), String> {
        if segment.is_empty() {
            return Err("must not be empty".to_string());
        }
        if segment == "." || segment == ".." {
            return Err("must not be a path-traversal segment".to_string());
        }
        if segment.contains('/') || segment.contains('\\') {
            return Err("must not contain path separators".to_string());
        }
        if !segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
        {
            return Err("must be alphanumeric, '-', or '_' only".to_string());
        }
        Ok(())
    }

    fn namespace_dir(&self, namespace: &str) -> PathBuf {
        self.root_dir.join(namespace)
    }

    async fn list(&self, namespace: &str) -> ToolOutput {
        if let Err(reason) = Self::validate_segment(namespace) {
            return ToolOutput::failed(format!("invalid namespace '{namespace}': {reason}"));
        }

        let dir = self.namespace_dir(namespace);
        debug!(namespace, path = %dir.display(), "listing projects");

        let mut entries = match tokio::fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                // An unused namespace has zero projects, not an error (§4.7).
                return ToolOutput::ok(
                    format!("no projects in namespace '{namespace}'"),
                    json!({ "total": 0, "projects": [] }),
                );
            }
            Err(err) => {
                return ToolOutput::failed(format!("failed to read namespace directory: {err}"));
            }
        };

        let mut projects = Vec::new();
        loop {
            let next = match entries.next_entry().await {
                Ok(next) => next,
                Err(err) => {
                    return ToolOutput::failed(format!("failed to enumerate projects: {err}"));
                }
            };
            let Some(entry) = next else { break };
            let is_dir = match entry.file_type().await {
                Ok(ft) => ft.is_dir(),
                Err(_) => false,
            };
            if is_dir {
                if let Ok(name) = entry.file_name().into_string() {
                    projects.push(name);
                }
            }
        }
        projects.sort();

        ToolOutput::ok(
            format!("found {} project(s) in namespace '{namespace}'", projects.len()),
            json!({ "total": projects.len(), "projects": projects }),
        )
    }

    async fn create(&self, namespace: &str, project_id: &str) -> ToolOutput {
        if let Err(reason) = Self::validate_segment(namespace) {
            return ToolOutput::failed(format!("invalid namespace '{namespace}': {reason}"));
        }
        if let Err(reason) = Self::validate_segment(project_id) {
            return ToolOutput::failed(format!("invalid project id '{project_id}': {reason}"));
        }

        let project_dir = self.namespace_dir(namespace).join(project_id);
        debug!(namespace, project_id, path = %project_dir.display(), "creating project");

        if project_dir.exists() {
            // Idempotent create: an existing directory is not an error.
            return ToolOutput::ok(
                format!("project '{project_id}' already existed in namespace '{namespace}'"),
                json!({ "project_id": project_id, "path": project_dir.display().to_string() }),
            );
        }

        match tokio::fs::create_dir_all(&project_dir).await {
            Ok(()) => ToolOutput::ok(
                format!("created project '{project_id}' in namespace '{namespace}'"),
                json!({ "project_id": project_id, "path": project_dir.display().to_string() }),
            ),
            Err(err) => ToolOutput::failed(format!("failed to create project directory: {err}")),
        }
    }
}

#[async_trait]
impl Tool for ProjectsTool {
    fn name(&self) -> &str {
        "projects"
    }

    fn schema(&self) -> ToolSchema {
        ToolSchema {
            name: "projects".to_string(),
            description: "List or create projects within a namespace".to_string(),
            input_schema: json!({
                "type": "object",
                "properties": {
                    "action": { "type": "string", "enum": ["list", "create"] },
                    "namespace": { "type": "string" },
                    "project_id": { "type": "string" }
                },
                "required": ["action", "namespace"]
            }),
            output_schema: json!({
                "type": "object",
                "properties": {
                    "success": { "type": "boolean" },
                    "total": { "type": "integer" },
                    "projects": { "type": "array", "items": { "type": "string" } },
                    "project_id": { "type": "string" },
                    "path": { "type": "string" }
                }
            }),
        }
    }

    async fn run(&self, input: ToolInput) -> ToolOutput {
        match input.action {
            Action::List => self.list(&input.namespace).await,
            Action::Create => match &input.project_id {
                Some(project_id) => self.create(&input.namespace, project_id).await,
                None => ToolOutput::failed("project_id is required for create"),
            },
        }
    }

    async fn health_check(&self) -> bool {
        if self.root_dir.exists() {
            return true;
        }
        match tokio::fs::create_dir_all(&self.root_dir).await {
            Ok(()) => true,
            Err(err) => {
                warn!(root = %self.root_dir.display(), error = %err, "projects tool root unavailable");
                false
            }
        }
    }
}

/// Convenience accessor used by callers that need to display where projects
/// physically live (e.g. the CLI `status` command).
pub fn describe_root(root_dir: &Path) -> String {
    info!(root = %root_dir.display(), "projects tool root");
    root_dir.display().to_string()
}
