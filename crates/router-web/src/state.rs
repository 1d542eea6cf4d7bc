//! Shared application state (§2): one instance per process, built once at
//! startup and handed to every request handler behind an `Arc`.

use std::sync::Arc;

use router_agent::llm::{LlmClient, LlmClientConfig, ToolDefinition};
use router_agent::{Agent, IntentAnalyzer, RegistryInit, SessionManager, ToolExecutor};
use router_kernel::{ResponseValidator, Tool, ToolRegistry};
use router_tools::ProjectsTool;

use crate::config::AppConfig;

pub struct AppState {
    pub config: AppConfig,
    pub sessions: SessionManager,
    pub registry: Arc<ToolRegistry>,
    pub analyzer: Arc<IntentAnalyzer>,
    pub validator: ResponseValidator,
    pub executor: ToolExecutor,
    llm: LlmClient,
    tools: Vec<ToolDefinition>,
}

impl AppState {
    pub fn new(config: AppConfig) -> Self {
        let mut llm_config =
            LlmClientConfig::new(config.llm.base_url.clone(), config.llm.model.clone());
        llm_config.api_key = config.llm.api_key.clone();
        llm_config.tool_calling_models = config.llm.tool_calling_models.clone();
        llm_config.request_timeout = std::time::Duration::from_secs(config.llm.request_timeout_secs);
        let llm = LlmClient::new(llm_config).expect("failed to build LLM HTTP client");

        let projects_schema = ProjectsTool::new(&config.projects_root).schema();
        let tools = vec![ToolDefinition {
            name: projects_schema.name,
            description: projects_schema.description,
            input_schema: projects_schema.input_schema,
        }];

        let analyzer = Arc::new(IntentAnalyzer::new(llm.clone(), &config.analysis));
        let validator = ResponseValidator::new(config.validation.clone());
        let registry = Arc::new(ToolRegistry::new());

        let projects_root = config.projects_root.clone();
        let init: RegistryInit = Arc::new(move |reg: ToolRegistry| {
            let root = projects_root.clone();
            Box::pin(async move {
                reg.register(Arc::new(ProjectsTool::new(root)) as Arc<dyn Tool>);
                Ok(())
            })
        });
        let executor = ToolExecutor::new(Arc::clone(&registry), Arc::clone(&analyzer), "projects", init);

        Self {
            config,
            sessions: SessionManager::new(),
            registry,
            analyzer,
            validator,
            executor,
            llm,
            tools,
        }
    }

    /// Construct a fresh `Agent` for a newly created session (§4.5: "a fresh
    /// model client and a fresh history are constructed").
    pub fn new_agent(&self) -> Agent {
        Agent::new(self.llm.clone(), self.config.llm.model.clone(), self.tools.clone())
    }
}
