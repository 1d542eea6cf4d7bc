//! The Agent (§4.5): wraps an LLM client and a per-session conversation
//! history. One call to `run()` is one conversational turn.

use router_kernel::{AgentReply, Message};

use crate::error::Result;
use crate::llm::{ChatRequest, LlmClient, LlmResponse, ToolCall, ToolDefinition};

/// What tool-calling mode the Agent should operate in for the configured
/// model, decided once at construction (§4.5: "detect whether the
/// configured model supports native tool calls").
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToolCallingMode {
    /// Native function calling -- the model may reply with tool calls.
    Native,
    /// No native support; the request handler falls back to manual
    /// execution when the Response Validator flags the reply.
    Fallback,
}

pub struct Agent {
    llm: LlmClient,
    model: String,
    mode: ToolCallingMode,
    tools: Vec<ToolDefinition>,
    history: Vec<Message>,
    system_prompt: String,
}

impl Agent {
    pub fn new(llm: LlmClient, model: String, tools: Vec<ToolDefinition>) -> Self {
        let mode = if llm.config().supports_tools(&model) {
            ToolCallingMode::Native
        } else {
            ToolCallingMode::Fallback
        };

        let system_prompt = build_system_prompt(mode);

        tracing::info!(model = %model, mode = ?mode, "agent created");

        Self {
            llm,
            model,
            mode,
            tools,
            history: Vec::new(),
            system_prompt,
        }
    }

    pub fn mode(&self) -> ToolCallingMode {
        self.mode
    }

    /// Run one conversational turn: append the user message to history,
    /// submit the full history to the LLM, append the assistant's reply,
    /// and return it. History is only ever appended to, never reordered
    /// (§4.5).
    pub async fn run(&mut self, user_message: &str) -> Result<AgentReply> {
        let user_turn = Message::user(user_message);

        let mut messages = Vec::with_capacity(self.history.len() + 2);
        messages.push(Message::system(&self.system_prompt));
        messages.extend(self.history.iter().cloned());
        messages.push(user_turn.clone());

        let tools = match self.mode {
            ToolCallingMode::Native => self.tools.clone(),
            ToolCallingMode::Fallback => Vec::new(),
        };

        let request = ChatRequest {
            model: self.model.clone(),
            messages,
            tools,
            temperature: Some(0.1),
            top_p: Some(0.9),
            max_tokens: None,
            stop: Vec::new(),
        };

        // Only committed to history once the round trip succeeds -- an
        // aborted or failed call leaves history untouched (§5).
        let response = self.llm.chat(&request).await?;
        self.history.push(user_turn);

        let reply = match response {
            LlmResponse::Text(text) => {
                self.history.push(Message::assistant(&text));
                AgentReply {
                    text,
                    native_tool_calls: Vec::new(),
                }
            }
            LlmResponse::ToolCalls(calls) => {
                let payloads: Vec<serde_json::Value> =
                    calls.iter().map(tool_call_to_value).collect();
                // The request handler decides what to do with native tool
                // calls; the agent records an empty assistant turn so
                // history stays in sync without guessing at final text.
                self.history.push(Message::assistant(""));
                AgentReply {
                    text: String::new(),
                    native_tool_calls: payloads,
                }
            }
        };

        Ok(reply)
    }

    /// Clear all turns but preserve identity (client, model, mode).
    pub fn reset_history(&mut self) {
        self.history.clear();
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }
}

fn tool_call_to_value(call: &ToolCall) -> serde_json::Value {
    serde_json::json!({
        "id": call.id,
        "name": call.name,
        "arguments": call.arguments,
    })
}

fn build_system_prompt(mode: ToolCallingMode) -> String {
    let tool_calling_line = match mode {
        ToolCallingMode::Native => "NATIVE",
        ToolCallingMode::Fallback => "FALLBACK",
    };

    format!(
        "You are a helpful assistant for project management.\n\
         You have access to a projects tool that can list and create projects in different namespaces.\n\
         Tool calling support: {tool_calling_line}\n\n\
         Analyze the user's request to determine if they need project management assistance.\n\
         For listing projects: use action='list' with the appropriate namespace\n\
         For creating projects: use action='create' with namespace and project_id\n\
         Always provide clear, helpful responses based on the tool results.\n\n\
         Be helpful and friendly in your responses. When using tools, briefly explain what you're doing.\n\
         Provide clear summaries of project operations. Use the exact namespace mentioned by the user.\n\
         Format project lists in a readable way with bullet points."
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::LlmClientConfig;

    fn agent(model: &str) -> Agent {
        let llm = LlmClient::new(LlmClientConfig::new("http://127.0.0.1:1", model)).unwrap();
        Agent::new(llm, model.to_string(), Vec::new())
    }

    #[test]
    fn native_mode_for_allowlisted_model() {
        let agent = agent("llama3.1:8b");
        assert_eq!(agent.mode(), ToolCallingMode::Native);
    }

    #[test]
    fn fallback_mode_for_other_models() {
        let agent = agent("mistral-small");
        assert_eq!(agent.mode(), ToolCallingMode::Fallback);
    }

    #[test]
    fn reset_history_clears_turns_but_keeps_mode() {
        let mut agent = agent("llama3.1");
        agent.history.push(Message::user("hi"));
        agent.reset_history();
        assert_eq!(agent.history_len(), 0);
        assert_eq!(agent.mode(), ToolCallingMode::Native);
    }
}
