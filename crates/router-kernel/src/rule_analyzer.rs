//! Deterministic, configuration-driven intent extraction (§4.2 "Rule
//! strategy").
//!
//! This is the fallback the Intent Analyzer uses whenever the LLM strategy
//! is unavailable or returns something that doesn't parse, and the only
//! strategy available when no LLM is configured at all. It has no I/O and no
//! interior mutability: everything it needs is compiled once at construction
//! from an [`AnalysisConfig`].

use std::collections::HashSet;

use regex::Regex;

use crate::analysis::{AnalysisConfig, AnalysisRule};
use crate::types::{Action, IntentAnalysis};

/// One [`AnalysisRule`] with its patterns pre-compiled.
struct CompiledRule {
    name: String,
    patterns: Vec<Regex>,
    keywords: Vec<String>,
    weight: f64,
    enabled: bool,
}

impl CompiledRule {
    fn compile(rule: &AnalysisRule) -> Self {
        let patterns = rule
            .patterns
            .iter()
            .filter_map(|p| match Regex::new(p) {
                Ok(re) => Some(re),
                Err(err) => {
                    tracing::warn!(rule = %rule.name, pattern = %p, error = %err, "invalid analysis rule pattern, skipping");
                    None
                }
            })
            .collect();

        Self {
            name: rule.name.clone(),
            patterns,
            keywords: rule.keywords.clone(),
            weight: rule.weight,
            enabled: rule.enabled,
        }
    }
}

/// Fallback patterns for project-id extraction when no action rule's own
/// pattern matched (mirrors the original service's hardcoded fallback list).
const PROJECT_ID_FALLBACK_PATTERNS: &[&str] = &[
    r"called\s+['\x22]?([a-z0-9._-]+)['\x22]?",
    r"new\s+project\s+['\x22]?([a-z0-9._-]+)['\x22]?",
    r"project\s+(?:named\s+)?['\x22]?([a-z0-9._-]+)['\x22]?",
];

pub struct RuleBasedAnalyzer {
    namespace_rules: Vec<CompiledRule>,
    action_rules: Vec<CompiledRule>,
    excluded_namespaces: HashSet<String>,
    default_namespace: String,
    project_id_fallbacks: Vec<Regex>,
}

impl RuleBasedAnalyzer {
    pub fn new(config: &AnalysisConfig) -> Self {
        Self {
            namespace_rules: config.namespace_patterns.iter().map(CompiledRule::compile).collect(),
            action_rules: config.action_patterns.iter().map(CompiledRule::compile).collect(),
            excluded_namespaces: config.excluded_namespaces.iter().cloned().collect(),
            default_namespace: config.default_namespace.clone(),
            project_id_fallbacks: PROJECT_ID_FALLBACK_PATTERNS
                .iter()
                .map(|p| Regex::new(p).expect("fallback patterns are valid regex"))
                .collect(),
        }
    }

    /// Deterministic extraction driven entirely by configuration (§4.2).
    /// Total over any non-empty input; callers handle the empty-input case
    /// themselves via [`IntentAnalysis::empty_message`].
    pub fn analyze(&self, message: &str) -> IntentAnalysis {
        let message_lower = message.to_lowercase();

        let (create_score, list_score) = self.score_action(&message_lower);
        let action = if create_score > list_score {
            Action::Create
        } else {
            Action::List
        };

        let namespace = self.extract_namespace(&message_lower);
        let project_id = if matches!(action, Action::Create) {
            self.extract_project_id(&message_lower)
        } else {
            None
        };

        let confidence =
            self.calculate_confidence(create_score.max(list_score), &namespace, project_id.as_deref(), action);

        IntentAnalysis {
            action,
            namespace: namespace.clone(),
            project_id,
            confidence,
            reasoning: format!("Rule-based analysis: action={}, namespace={}", action.as_str(), namespace),
        }
    }

    fn score_action(&self, message_lower: &str) -> (f64, f64) {
        let mut create_score = 0.0;
        let mut list_score = 0.0;

        for rule in &self.action_rules {
            if !rule.enabled {
                continue;
            }
            let matches = rule
                .keywords
                .iter()
                .filter(|kw| message_lower.contains(kw.as_str()))
                .count() as f64;
            if matches <= 0.0 {
                continue;
            }
            let name_lower = rule.name.to_lowercase();
            if name_lower.contains("create") {
                create_score += matches * rule.weight;
            } else if name_lower.contains("list") {
                list_score += matches * rule.weight;
            }
        }

        (create_score, list_score)
    }

    fn extract_namespace(&self, message_lower: &str) -> String {
        for rule in &self.namespace_rules {
            if !rule.enabled {
                continue;
            }
            for pattern in &rule.patterns {
                if let Some(caps) = pattern.captures(message_lower) {
                    if let Some(m) = caps.get(1) {
                        let candidate = m.as_str();
                        if !self.excluded_namespaces.contains(candidate) {
                            return candidate.to_string();
                        }
                    }
                }
            }
        }
        self.default_namespace.clone()
    }

    fn extract_project_id(&self, message_lower: &str) -> Option<String> {
        for rule in &self.action_rules {
            if !rule.enabled || !rule.name.to_lowercase().contains("create") {
                continue;
            }
            for pattern in &rule.patterns {
                if let Some(caps) = pattern.captures(message_lower) {
                    if let Some(m) = caps.get(1) {
                        return Some(m.as_str().to_string());
                    }
                }
            }
        }

        for pattern in &self.project_id_fallbacks {
            if let Some(caps) = pattern.captures(message_lower) {
                if let Some(m) = caps.get(1) {
                    return Some(m.as_str().to_string());
                }
            }
        }

        None
    }

    fn calculate_confidence(
        &self,
        max_action_score: f64,
        namespace: &str,
        project_id: Option<&str>,
        action: Action,
    ) -> f64 {
        let mut confidence: f64 = 0.7;

        if max_action_score > 1.0 {
            confidence += 0.1;
        }
        if namespace != self.default_namespace {
            confidence += 0.1;
        }
        if matches!(action, Action::Create) && project_id.is_some() {
            confidence += 0.1;
        }

        confidence.min(1.0)
    }
}
