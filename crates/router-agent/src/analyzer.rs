//! Hybrid Intent Analyzer (§4.2): LLM-backed structured extraction with a
//! deterministic rule-based fallback. No runtime type tests -- the two
//! strategies are tried in a fixed order behind one `analyze` entry point,
//! per the "strategy polymorphism without inheritance" design note.

use serde::Deserialize;

use router_kernel::{Action, AnalysisConfig, IntentAnalysis, RequestOverrides, RuleBasedAnalyzer};

use crate::llm::LlmClient;

const SYSTEM_PROMPT: &str = r#"You are an expert at analyzing user messages to determine project management actions.

Analyze the user's message and determine:
1. What action they want to take (create or list)
2. If they specified a namespace
3. If they specified a project ID/name (for create actions)
4. Your confidence in this analysis
5. Brief reasoning for your decision

Rules:
- "create", "new", "add", "make" usually indicate the create action
- "list", "show", "display", "view", "get" usually indicate the list action
- Look for namespace patterns like "in X namespace", "namespace X", "in X"
- For create actions, look for project names/IDs
- Default namespace is "test" if not specified
- Be flexible with natural language variations

Respond with a JSON object with exactly these fields: action, namespace, project_id, confidence, reasoning."#;

/// The exact shape requested from the structured-output endpoint; mirrors
/// `ProjectAnalysis` from the original service.
#[derive(Debug, Deserialize)]
struct RawAnalysis {
    action: String,
    namespace: Option<String>,
    project_id: Option<String>,
    confidence: f64,
    reasoning: String,
}

pub struct IntentAnalyzer {
    llm: LlmClient,
    fallback: RuleBasedAnalyzer,
    default_namespace: String,
}

impl IntentAnalyzer {
    pub fn new(llm: LlmClient, config: &AnalysisConfig) -> Self {
        Self {
            llm,
            fallback: RuleBasedAnalyzer::new(config),
            default_namespace: config.default_namespace.clone(),
        }
    }

    /// Produce an `IntentAnalysis` from `(message, overrides)`. Never fails:
    /// any LLM-side error falls back to the rule strategy.
    pub async fn analyze(&self, message: &str, overrides: &RequestOverrides) -> IntentAnalysis {
        if message.trim().is_empty() {
            return IntentAnalysis::empty_message(&self.default_namespace);
        }

        let mut analysis = match self.analyze_with_llm(message).await {
            Ok(analysis) => analysis,
            Err(reason) => {
                tracing::warn!(error = %reason, "LLM analysis failed, falling back to rule-based");
                let mut fallback = self.fallback.analyze(message);
                fallback.reasoning = format!("{} (LLM unavailable)", fallback.reasoning);
                fallback
            }
        };

        analysis.apply_overrides(overrides, &self.default_namespace);
        analysis
    }

    async fn analyze_with_llm(&self, message: &str) -> Result<IntentAnalysis, String> {
        let user_message = format!("Analyze this message: {message}");
        let raw: RawAnalysis = self
            .llm
            .chat_structured(SYSTEM_PROMPT, &user_message)
            .await
            .map_err(|e| e.to_string())?;

        let action = if raw.action.eq_ignore_ascii_case("create") {
            Action::Create
        } else {
            Action::List
        };

        Ok(IntentAnalysis {
            action,
            namespace: raw.namespace.unwrap_or_else(|| self.default_namespace.clone()),
            project_id: raw.project_id,
            confidence: raw.confidence.clamp(0.0, 1.0),
            reasoning: raw.reasoning,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmClientConfig;
    use router_kernel::defaults::default_analysis_config;

    fn analyzer_with_unreachable_llm() -> IntentAnalyzer {
        let llm = LlmClient::new(LlmClientConfig::new("http://127.0.0.1:1", "llama3.1")).unwrap();
        IntentAnalyzer::new(llm, &default_analysis_config())
    }

    #[tokio::test]
    async fn empty_message_short_circuits_without_calling_llm() {
        let analyzer = analyzer_with_unreachable_llm();
        let analysis = analyzer.analyze("", &RequestOverrides::default()).await;
        assert_eq!(analysis.action, Action::List);
        assert_eq!(analysis.confidence, 0.0);
    }

    #[tokio::test]
    async fn llm_unavailable_falls_back_to_rules_with_annotation() {
        let analyzer = analyzer_with_unreachable_llm();
        let analysis = analyzer
            .analyze(
                "create a new project called demo in dev namespace",
                &RequestOverrides::default(),
            )
            .await;
        assert_eq!(analysis.action, Action::Create);
        assert_eq!(analysis.namespace, "dev");
        assert_eq!(analysis.project_id.as_deref(), Some("demo"));
        assert!(analysis.reasoning.contains("LLM unavailable"));
    }

    #[tokio::test]
    async fn overrides_applied_after_fallback() {
        let analyzer = analyzer_with_unreachable_llm();
        let overrides = RequestOverrides {
            namespace: Some("forced".to_string()),
            project_id: None,
        };
        let analysis = analyzer.analyze("list projects", &overrides).await;
        assert_eq!(analysis.namespace, "forced");
    }
}
