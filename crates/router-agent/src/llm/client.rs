//! OpenAI-compatible LLM client.
//!
//! Talks to any OpenAI-compatible chat-completion endpoint (the reference
//! deployment points this at a local Ollama instance). Two modes, chosen per
//! call by the caller:
//!
//! - **tools** -- native function calling; the model may reply with
//!   `tool_calls` instead of text.
//! - **json** -- structured output via `response_format: {"type":
//!   "json_object"}`; used by the Intent Analyzer to get a value conforming
//!   to a declared schema without relying on the model's own function
//!   calling (necessary for models that don't support it).
//!
//! Every call is non-streaming: this crate's notion of "streaming" is the
//! word-wrapped chunking of a complete reply, performed downstream by
//! `router-web`, not token-by-token passthrough from the provider.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

use crate::error::{AgentError, Result};
use crate::llm::types::{ChatRequest, LlmResponse, Message, Role, ToolCall, ToolDefinition};

/// Configuration for connecting to an OpenAI-compatible endpoint.
#[derive(Debug, Clone)]
pub struct LlmClientConfig {
    pub api_key: String,
    pub base_url: String,
    pub default_model: String,
    pub max_tokens: u32,
    pub request_timeout: Duration,
    /// Substrings of model names that support native tool calling.
    pub tool_calling_models: Vec<String>,
}

impl LlmClientConfig {
    pub fn new(base_url: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            api_key: String::new(),
            base_url: base_url.into(),
            default_model: model.into(),
            max_tokens: 1024,
            request_timeout: Duration::from_secs(60),
            tool_calling_models: crate::TOOL_CALLING_MODELS
                .iter()
                .map(|s| s.to_string())
                .collect(),
        }
    }

    /// Whether `model` (case-insensitive substring match) supports native
    /// tool calling per the configured allowlist.
    pub fn supports_tools(&self, model: &str) -> bool {
        let model_lower = model.to_lowercase();
        self.tool_calling_models
            .iter()
            .any(|supported| model_lower.contains(&supported.to_lowercase()))
    }
}

/// An LLM client that communicates with an OpenAI-compatible
/// `/chat/completions` endpoint.
#[derive(Debug, Clone)]
pub struct LlmClient {
    config: Arc<LlmClientConfig>,
    http: reqwest::Client,
}

impl LlmClient {
    pub fn new(config: LlmClientConfig) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| AgentError::LlmRequestFailed {
                reason: format!("failed to build HTTP client: {e}"),
            })?;

        Ok(Self {
            config: Arc::new(config),
            http,
        })
    }

    pub fn config(&self) -> &LlmClientConfig {
        &self.config
    }

    /// Send a chat request in native tool-calling mode (or plain chat when
    /// `request.tools` is empty) and return the aggregated response.
    pub async fn chat(&self, request: &ChatRequest) -> Result<LlmResponse> {
        let body = self.build_request_body(request, None);
        let value = self.send(&body).await?;
        self.parse_response(&value)
    }

    /// Send a chat request in JSON structured-output mode and deserialize
    /// the model's reply content into `T`. Used by the Intent Analyzer.
    pub async fn chat_structured<T: DeserializeOwned>(
        &self,
        system_prompt: &str,
        user_message: &str,
    ) -> Result<T> {
        let request = ChatRequest {
            model: String::new(),
            messages: vec![
                Message::system(system_prompt),
                Message::user(user_message),
            ],
            tools: Vec::new(),
            temperature: Some(0.1),
            top_p: None,
            max_tokens: None,
            stop: Vec::new(),
        };
        let body = self.build_request_body(&request, Some("json_object"));
        let value = self.send(&body).await?;

        let content = value["choices"][0]["message"]["content"]
            .as_str()
            .ok_or_else(|| AgentError::LlmParseFailed {
                reason: "missing message content in structured-output response".into(),
            })?;

        serde_json::from_str(content).map_err(|e| AgentError::LlmParseFailed {
            reason: format!("structured output did not match expected schema: {e}"),
        })
    }

    fn build_request_body(&self, request: &ChatRequest, response_format: Option<&str>) -> Value {
        let mut body = json!({
            "model": if request.model.is_empty() {
                &self.config.default_model
            } else {
                &request.model
            },
            "messages": self.build_messages_payload(&request.messages),
        });

        if let Some(max_tokens) = request.max_tokens.or(Some(self.config.max_tokens)) {
            body["max_tokens"] = json!(max_tokens);
        }
        if let Some(temp) = request.temperature {
            body["temperature"] = json!(temp);
        }
        if let Some(top_p) = request.top_p {
            body["top_p"] = json!(top_p);
        }
        if !request.stop.is_empty() {
            body["stop"] = json!(request.stop);
        }
        if !request.tools.is_empty() {
            body["tools"] = self.build_tools_payload(&request.tools);
            body["tool_choice"] = json!("auto");
        }
        if let Some(format) = response_format {
            body["response_format"] = json!({ "type": format });
        }

        body
    }

    fn build_messages_payload(&self, messages: &[Message]) -> Value {
        json!(
            messages
                .iter()
                .map(|m| {
                    json!({
                        "role": match m.role {
                            Role::System => "system",
                            Role::User => "user",
                            Role::Assistant => "assistant",
                        },
                        "content": m.content,
                    })
                })
                .collect::<Vec<_>>()
        )
    }

    fn build_tools_payload(&self, tools: &[ToolDefinition]) -> Value {
        json!(
            tools
                .iter()
                .map(|t| {
                    json!({
                        "type": "function",
                        "function": {
                            "name": t.name,
                            "description": t.description,
                            "parameters": t.input_schema,
                        },
                    })
                })
                .collect::<Vec<_>>()
        )
    }

    async fn send(&self, body: &Value) -> Result<Value> {
        let url = format!("{}/chat/completions", self.config.base_url.trim_end_matches('/'));

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        if !self.config.api_key.is_empty() {
            headers.insert(
                AUTHORIZATION,
                HeaderValue::from_str(&format!("Bearer {}", self.config.api_key)).map_err(
                    |e| AgentError::LlmRequestFailed {
                        reason: format!("invalid api key header: {e}"),
                    },
                )?,
            );
        }

        tracing::debug!(url = %url, model = %body["model"], "sending LLM request");

        let resp = self
            .http
            .post(&url)
            .headers(headers)
            .json(body)
            .send()
            .await
            .map_err(|e| AgentError::LlmRequestFailed {
                reason: e.to_string(),
            })?;

        let status = resp.status();
        let text = resp.text().await.map_err(|e| AgentError::LlmRequestFailed {
            reason: format!("failed to read response body: {e}"),
        })?;

        if !status.is_success() {
            return Err(AgentError::LlmRequestFailed {
                reason: format!("endpoint returned {status}: {text}"),
            });
        }

        serde_json::from_str(&text).map_err(|e| AgentError::LlmParseFailed {
            reason: format!("invalid JSON response: {e}"),
        })
    }

    fn parse_response(&self, value: &Value) -> Result<LlmResponse> {
        let message = &value["choices"][0]["message"];

        let tool_calls = message["tool_calls"].as_array();
        match tool_calls {
            Some(calls) if !calls.is_empty() => {
                let parsed = calls
                    .iter()
                    .map(|c| -> Result<ToolCall> {
                        let function = &c["function"];
                        let arguments_str = function["arguments"].as_str().unwrap_or("{}");
                        let arguments: Value =
                            serde_json::from_str(arguments_str).map_err(|e| {
                                AgentError::LlmParseFailed {
                                    reason: format!("invalid tool call arguments JSON: {e}"),
                                }
                            })?;
                        Ok(ToolCall {
                            id: c["id"].as_str().unwrap_or_default().to_string(),
                            name: function["name"].as_str().unwrap_or_default().to_string(),
                            arguments,
                        })
                    })
                    .collect::<Result<Vec<_>>>()?;
                Ok(LlmResponse::ToolCalls(parsed))
            }
            _ => {
                let content = message["content"].as_str().unwrap_or_default().to_string();
                Ok(LlmResponse::Text(content))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> LlmClient {
        LlmClient::new(LlmClientConfig::new("http://localhost:11434/v1", "llama3.1")).unwrap()
    }

    #[test]
    fn supports_tools_matches_allowlist_substring() {
        let config = LlmClientConfig::new("http://localhost:11434/v1", "llama3.1:8b-instruct");
        assert!(config.supports_tools("llama3.1:8b-instruct"));
        assert!(!config.supports_tools("llama3"));
    }

    #[test]
    fn build_request_body_basic() {
        let client = client();
        let request = ChatRequest {
            model: String::new(),
            messages: vec![Message::system("You are helpful."), Message::user("Hello")],
            tools: vec![],
            temperature: Some(0.1),
            top_p: None,
            max_tokens: Some(256),
            stop: vec![],
        };

        let body = client.build_request_body(&request, None);
        assert_eq!(body["model"], "llama3.1");
        assert_eq!(body["max_tokens"], 256);
        assert!(body.get("tools").is_none());

        let messages = body["messages"].as_array().unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[0]["role"], "system");
        assert_eq!(messages[1]["content"], "Hello");
    }

    #[test]
    fn build_request_body_with_tools_sets_tool_choice() {
        let client = client();
        let request = ChatRequest {
            model: "llama3.1".into(),
            messages: vec![Message::user("list my projects")],
            tools: vec![ToolDefinition {
                name: "projects".into(),
                description: "list or create projects".into(),
                input_schema: serde_json::json!({"type": "object"}),
            }],
            temperature: None,
            top_p: None,
            max_tokens: None,
            stop: vec![],
        };

        let body = client.build_request_body(&request, None);
        assert_eq!(body["tool_choice"], "auto");
        assert_eq!(body["tools"][0]["function"]["name"], "projects");
    }

    #[test]
    fn build_request_body_json_mode_sets_response_format() {
        let client = client();
        let request = ChatRequest {
            model: String::new(),
            messages: vec![Message::user("hi")],
            tools: vec![],
            temperature: None,
            top_p: None,
            max_tokens: None,
            stop: vec![],
        };

        let body = client.build_request_body(&request, Some("json_object"));
        assert_eq!(body["response_format"]["type"], "json_object");
    }

    #[test]
    fn parse_response_text() {
        let client = client();
        let value = serde_json::json!({
            "choices": [{ "message": { "role": "assistant", "content": "hello there" } }]
        });
        match client.parse_response(&value).unwrap() {
            LlmResponse::Text(text) => assert_eq!(text, "hello there"),
            _ => panic!("expected text response"),
        }
    }

    #[test]
    fn parse_response_tool_calls() {
        let client = client();
        let value = serde_json::json!({
            "choices": [{
                "message": {
                    "role": "assistant",
                    "tool_calls": [{
                        "id": "call_1",
                        "type": "function",
                        "function": { "name": "projects", "arguments": "{\"action\":\"list\",\"namespace\":\"dev\"}" }
                    }]
                }
            }]
        });
        match client.parse_response(&value).unwrap() {
            LlmResponse::ToolCalls(calls) => {
                assert_eq!(calls.len(), 1);
                assert_eq!(calls[0].name, "projects");
                assert_eq!(calls[0].arguments["namespace"], "dev");
            }
            _ => panic!("expected tool calls response"),
        }
    }
}
