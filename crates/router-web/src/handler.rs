//! Request Handler (§4.6): the orchestrator tying the Session Manager,
//! Agent, Response Validator, and Tool Executor together for one chat
//! request. Kept transport-agnostic (no Axum types) so it can be unit
//! tested directly.

use router_kernel::RequestOverrides;
use serde_json::Value;

use crate::formatter;
use crate::state::AppState;
use crate::wire::ChatCompletionRequest;

pub struct ChatOutcome {
    pub session_id: String,
    pub model: String,
    pub reply: String,
    pub tool_info: Option<Value>,
    /// The user message this reply answers; used downstream for the
    /// best-effort token-usage estimate (§3.1).
    pub prompt: String,
}

/// Run one chat-completion request end to end (§4.6, steps 1-6). Streaming
/// (step 7) is the caller's concern -- this always returns the whole reply.
pub async fn handle_chat(
    state: &AppState,
    session_id: Option<String>,
    request: &ChatCompletionRequest,
) -> ChatOutcome {
    let session_id = session_id.unwrap_or_else(|| format!("chat-{}", uuid::Uuid::now_v7()));
    let model = request
        .model
        .clone()
        .unwrap_or_else(|| state.config.llm.model.clone());
    let user_message = request.last_user_message().unwrap_or("").to_string();

    let agent = state.sessions.get_or_create(&session_id, || state.new_agent()).await;

    let initial_reply = {
        let mut agent = agent.lock().await;
        agent.run(&user_message).await
    };

    let initial_text = match initial_reply {
        Ok(reply) => reply.text,
        Err(err) => {
            tracing::error!(session_id = %session_id, error = %err, "agent run failed");
            return ChatOutcome {
                session_id,
                model,
                reply: format!("I'm sorry, I encountered an unexpected error: {err}"),
                tool_info: None,
                prompt: user_message,
            };
        }
    };

    let overrides = RequestOverrides {
        namespace: request.namespace.clone(),
        project_id: request.project_id.clone(),
    };

    let (reply, tool_info) = if state.validator.needs_manual_execution(&initial_text, &user_message) {
        tracing::info!(session_id = %session_id, "manual execution path taken");
        let tool_result = state.executor.execute(&user_message, &overrides).await;
        let reply = formatter::format_tool_response(&tool_result);
        let info = formatter::tool_info(&tool_result);
        (reply, Some(info))
    } else if state.validator.is_tool_related(&user_message) {
        (initial_text, Some(formatter::native_tool_info()))
    } else {
        (initial_text, None)
    };

    ChatOutcome {
        session_id,
        model,
        reply,
        tool_info,
        prompt: user_message,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::AppConfig;
    use crate::wire::ChatCompletionMessage;

    fn request(message: &str) -> ChatCompletionRequest {
        ChatCompletionRequest {
            model: None,
            messages: vec![ChatCompletionMessage {
                role: "user".to_string(),
                content: message.to_string(),
            }],
            temperature: None,
            top_p: None,
            top_k: None,
            max_tokens: None,
            stop: Vec::new(),
            frequency_penalty: None,
            presence_penalty: None,
            logit_bias: Default::default(),
            stream: false,
            namespace: None,
            project_id: None,
        }
    }

    fn state() -> AppState {
        let mut config = AppConfig::default();
        // Unreachable LLM endpoint: every call falls back (agent apology,
        // analyzer rule-based fallback), matching how these components
        // behave under a "LLM unavailable" condition (§7).
        config.llm.base_url = "http://127.0.0.1:1".to_string();
        AppState::new(config)
    }

    #[tokio::test]
    async fn unrelated_message_passes_through_agent_error_as_apology() {
        let state = state();
        let outcome = handle_chat(&state, None, &request("what's the weather today")).await;
        assert!(outcome.reply.contains("encountered an unexpected error"));
        assert!(outcome.tool_info.is_none());
    }

    #[tokio::test]
    async fn reusing_session_id_reuses_the_same_agent() {
        let state = state();
        let first = handle_chat(&state, Some("s1".to_string()), &request("list projects")).await;
        assert_eq!(first.session_id, "s1");
        assert_eq!(state.sessions.count().await, 1);

        handle_chat(&state, Some("s1".to_string()), &request("list projects again")).await;
        assert_eq!(state.sessions.count().await, 1);
    }

    #[tokio::test]
    async fn missing_session_id_is_minted() {
        let state = state();
        let outcome = handle_chat(&state, None, &request("hi")).await;
        assert!(!outcome.session_id.is_empty());
    }
}
