//! Pure, immutable configuration data for the rule-based analyzer and the
//! response validator (§3 `AnalysisRule` / `ValidationConfig`).
//!
//! Everything here is plain data, loaded once at startup and never mutated,
//! so it is safe to share across tasks without locking (§9 "Configuration as
//! immutable data").

use serde::{Deserialize, Serialize};

/// A single scored pattern used by the rule-based analyzer.
///
/// `patterns` are regex source strings (not compiled here -- the analyzer
/// compiles and caches them once at construction).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisRule {
    pub name: String,
    #[serde(default)]
    pub patterns: Vec<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    #[serde(default = "default_weight")]
    pub weight: f64,
    #[serde(default = "default_enabled")]
    pub enabled: bool,
}

fn default_weight() -> f64 {
    1.0
}

fn default_enabled() -> bool {
    true
}

/// Namespace- and action-rule lists plus the knobs the rule-based analyzer
/// needs (default namespace, excluded namespaces, confidence threshold).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    pub default_namespace: String,
    pub confidence_threshold: f64,
    pub excluded_namespaces: Vec<String>,
    pub namespace_patterns: Vec<AnalysisRule>,
    pub action_patterns: Vec<AnalysisRule>,
}

/// Configuration for the Response Validator (§4.3).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationConfig {
    pub template_indicators: Vec<String>,
    pub inability_phrases: Vec<String>,
    pub hallucination_indicators: Vec<String>,
    #[serde(default = "default_min_length")]
    pub min_response_length: usize,
    #[serde(default = "default_true")]
    pub enable_hallucination_detection: bool,
    #[serde(default = "default_true")]
    pub enable_count_query_validation: bool,
    /// Keywords that mark a message as tool-related; the pre-gate in §4.3
    /// short-circuits to `false` when none of these appear in the message.
    #[serde(default = "crate::defaults::trigger_keywords")]
    pub trigger_keywords: Vec<String>,
}

fn default_min_length() -> usize {
    50
}

fn default_true() -> bool {
    true
}
