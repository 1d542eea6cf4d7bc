//! Built-in defaults for [`crate::analysis::AnalysisConfig`] and
//! [`crate::analysis::ValidationConfig`].
//!
//! These mirror the values the original service falls back to when its
//! config file is absent or unparseable (`config_loader.py::_get_default_config`),
//! plus the analysis-rule patterns its LLM system prompt documents but its
//! (non-distributed) YAML file actually held -- reconstructed here from that
//! prompt's vocabulary since the file itself wasn't part of the source kept
//! for this port. See DESIGN.md for the open-question note.

use crate::analysis::{AnalysisConfig, AnalysisRule, ValidationConfig};

/// Keywords that mark a message as project/tool-related (the Response
/// Validator's pre-gate, §4.3).
pub fn trigger_keywords() -> Vec<String> {
    ["project", "list", "create", "show", "namespace"]
        .into_iter()
        .map(String::from)
        .collect()
}

pub fn default_analysis_config() -> AnalysisConfig {
    AnalysisConfig {
        default_namespace: "test".to_string(),
        confidence_threshold: 0.7,
        excluded_namespaces: ["the", "a", "an", "my", "projects", "project"]
            .into_iter()
            .map(String::from)
            .collect(),
        namespace_patterns: vec![
            AnalysisRule {
                name: "explicit_namespace_phrase".to_string(),
                patterns: vec![
                    r"in\s+(?:the\s+)?([a-z0-9_-]+)\s+namespace".to_string(),
                    r"namespace\s+([a-z0-9_-]+)".to_string(),
                ],
                keywords: vec!["namespace".to_string()],
                weight: 1.0,
                enabled: true,
            },
            AnalysisRule {
                name: "bare_in_phrase".to_string(),
                patterns: vec![r"\bin\s+([a-z0-9_-]+)\b".to_string()],
                keywords: vec!["in".to_string()],
                weight: 1.0,
                enabled: true,
            },
        ],
        action_patterns: vec![
            AnalysisRule {
                name: "create_keywords".to_string(),
                patterns: vec![
                    r"project\s+(?:called\s+|named\s+)?['\x22]?([a-z0-9._-]+)['\x22]?"
                        .to_string(),
                    r"new\s+project\s+['\x22]?([a-z0-9._-]+)['\x22]?".to_string(),
                ],
                keywords: vec![
                    "create".to_string(),
                    "new".to_string(),
                    "add".to_string(),
                    "make".to_string(),
                ],
                weight: 1.0,
                enabled: true,
            },
            AnalysisRule {
                name: "list_keywords".to_string(),
                patterns: vec![],
                keywords: vec![
                    "list".to_string(),
                    "show".to_string(),
                    "display".to_string(),
                    "view".to_string(),
                    "get".to_string(),
                ],
                weight: 1.0,
                enabled: true,
            },
        ],
    }
}

pub fn default_validation_config() -> ValidationConfig {
    ValidationConfig {
        template_indicators: [
            "[number of projects]",
            "[project list]",
            "[namespace]",
        ]
        .into_iter()
        .map(String::from)
        .collect(),
        inability_phrases: ["i don't have access", "cannot directly"]
            .into_iter()
            .map(String::from)
            .collect(),
        hallucination_indicators: ["project 1", "project 2", "project 3"]
            .into_iter()
            .map(String::from)
            .collect(),
        min_response_length: 50,
        enable_hallucination_detection: true,
        enable_count_query_validation: true,
        trigger_keywords: trigger_keywords(),
    }
}
