//! Response Validator (§4.3): decides whether the Agent's natural-language
//! reply actually did the work, or whether the core needs to re-run it
//! manually.
//!
//! Stateless per call; all knobs live in [`ValidationConfig`].

use crate::analysis::ValidationConfig;

pub struct ResponseValidator {
    config: ValidationConfig,
}

/// Which check (if any) triggered manual execution, for debug logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TriggerReason {
    TemplateResponse,
    InabilityPhrase,
    TooShort,
    Hallucination,
    SuspiciousCountAnswer,
}

impl TriggerReason {
    fn as_str(self) -> &'static str {
        match self {
            TriggerReason::TemplateResponse => "template_response",
            TriggerReason::InabilityPhrase => "inability_phrase",
            TriggerReason::TooShort => "too_short",
            TriggerReason::Hallucination => "hallucination",
            TriggerReason::SuspiciousCountAnswer => "suspicious_count_answer",
        }
    }
}

impl ResponseValidator {
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Pre-gate: a message with none of the configured trigger keywords is
    /// not tool-related, full stop.
    pub fn is_tool_related(&self, message: &str) -> bool {
        let message_lower = message.to_lowercase();
        self.config
            .trigger_keywords
            .iter()
            .any(|kw| message_lower.contains(kw.as_str()))
    }

    /// §4.3: the five ordered, short-circuiting checks. Returns `false`
    /// immediately if the message isn't tool-related at all.
    pub fn needs_manual_execution(&self, reply: &str, original_message: &str) -> bool {
        if !self.is_tool_related(original_message) {
            return false;
        }

        if let Some(reason) = self.first_triggered_check(reply, original_message) {
            tracing::info!(reason = reason.as_str(), "manual execution triggered");
            true
        } else {
            false
        }
    }

    fn first_triggered_check(&self, reply: &str, original_message: &str) -> Option<TriggerReason> {
        if self.is_template_response(reply) {
            return Some(TriggerReason::TemplateResponse);
        }
        if self.contains_inability_phrase(reply) {
            return Some(TriggerReason::InabilityPhrase);
        }
        if reply.trim().len() < self.config.min_response_length {
            return Some(TriggerReason::TooShort);
        }
        if self.config.enable_hallucination_detection && self.is_hallucinated(reply) {
            return Some(TriggerReason::Hallucination);
        }
        if self.config.enable_count_query_validation
            && self.is_suspicious_count_answer(reply, original_message)
        {
            return Some(TriggerReason::SuspiciousCountAnswer);
        }
        None
    }

    fn is_template_response(&self, reply: &str) -> bool {
        let reply_lower = reply.to_lowercase();
        self.config
            .template_indicators
            .iter()
            .any(|ind| reply_lower.contains(&ind.to_lowercase()))
    }

    fn contains_inability_phrase(&self, reply: &str) -> bool {
        let reply_lower = reply.to_lowercase();
        self.config
            .inability_phrases
            .iter()
            .any(|phrase| reply_lower.contains(phrase.as_str()))
    }

    fn is_hallucinated(&self, reply: &str) -> bool {
        let reply_lower = reply.to_lowercase();
        self.config
            .hallucination_indicators
            .iter()
            .any(|ind| reply_lower.contains(ind.as_str()))
    }

    fn is_suspicious_count_answer(&self, reply: &str, original_message: &str) -> bool {
        const COUNT_KEYWORDS: &[&str] = &["how many", "count", "number of", "total"];

        let original_lower = original_message.to_lowercase();
        let is_count_query = COUNT_KEYWORDS.iter().any(|kw| original_lower.contains(kw));
        if !is_count_query {
            return false;
        }

        let has_digit = reply.chars().any(|c| c.is_ascii_digit());
        let has_found = reply.to_lowercase().contains("found");

        has_digit && !has_found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::defaults::default_validation_config;

    fn validator() -> ResponseValidator {
        ResponseValidator::new(default_validation_config())
    }

    #[test]
    fn pre_gate_rejects_unrelated_messages() {
        let v = validator();
        assert!(!v.needs_manual_execution("short", "what's the weather today"));
    }

    #[test]
    fn template_leak_triggers() {
        let v = validator();
        assert!(v.needs_manual_execution("You have [number of projects] projects.", "list projects"));
    }

    #[test]
    fn inability_phrase_triggers() {
        let v = validator();
        assert!(v.needs_manual_execution(
            "I don't have access to list your projects directly.",
            "list my projects"
        ));
    }

    #[test]
    fn too_short_triggers() {
        let v = validator();
        assert!(v.needs_manual_execution("Sure.", "list projects"));
    }

    #[test]
    fn hallucination_triggers() {
        let v = validator();
        let reply = "You have 3 projects: project 1, project 2, project 3 and that's all of them here.";
        assert!(v.needs_manual_execution(reply, "how many projects do I have in prod?"));
    }

    #[test]
    fn suspicious_count_answer_triggers() {
        let v = validator();
        let reply = "You have 12 projects in that namespace according to my records here today.";
        assert!(v.needs_manual_execution(reply, "how many projects do I have?"));
    }

    #[test]
    fn count_answer_with_found_does_not_trigger_count_check() {
        let v = validator();
        let reply = "I found 12 projects in the prod namespace after checking the filesystem just now.";
        assert!(!v.needs_manual_execution(reply, "how many projects do I have?"));
    }

    #[test]
    fn substantive_reply_does_not_trigger() {
        let v = validator();
        let reply = "I found 2 projects in the 'test' namespace: alpha, beta. Let me know if you need anything else.";
        assert!(!v.needs_manual_execution(reply, "list projects"));
    }
}
