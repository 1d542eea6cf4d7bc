//! OpenAI-compatible wire schema for the inbound chat-completion endpoint
//! (§3.1, §6). These types are what hits the HTTP boundary; `ChatRequest` /
//! `Message` (router-kernel) are what the core speaks internally.

use serde::{Deserialize, Serialize};

use router_kernel::{Message, Role};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ChatCompletionMessage {
    pub role: String,
    pub content: String,
}

impl From<&ChatCompletionMessage> for Message {
    fn from(m: &ChatCompletionMessage) -> Self {
        let role = match m.role.as_str() {
            "system" => Role::System,
            "assistant" => Role::Assistant,
            _ => Role::User,
        };
        Message {
            role,
            content: m.content.clone(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ChatCompletionRequest {
    pub model: Option<String>,
    pub messages: Vec<ChatCompletionMessage>,
    #[serde(default)]
    pub temperature: Option<f64>,
    #[serde(default)]
    pub top_p: Option<f64>,
    #[serde(default)]
    pub top_k: Option<u32>,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    #[serde(default)]
    pub stop: Vec<String>,
    #[serde(default)]
    pub frequency_penalty: Option<f64>,
    #[serde(default)]
    pub presence_penalty: Option<f64>,
    #[serde(default)]
    pub logit_bias: std::collections::HashMap<String, f64>,
    #[serde(default)]
    pub stream: bool,
    /// Structured override, consumed by the Tool Executor (§4.4) when
    /// manual execution is triggered.
    #[serde(default)]
    pub namespace: Option<String>,
    #[serde(default)]
    pub project_id: Option<String>,
}

impl ChatCompletionRequest {
    /// The conversational turn to run: the content of the last `user`
    /// message. Prior messages only seed a freshly created session's
    /// history (§3.1) -- this crate does not replay them into an existing
    /// session, since the Agent already owns that history.
    pub fn last_user_message(&self) -> Option<&str> {
        self.messages
            .iter()
            .rev()
            .find(|m| m.role == "user")
            .map(|m| m.content.as_str())
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionChoice {
    pub index: u32,
    pub message: ChatCompletionMessage,
    pub finish_reason: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

impl Usage {
    /// Best-effort whitespace-based token estimate (§3.1): this crate has no
    /// visibility into the backing model's real tokenizer.
    pub fn estimate(prompt: &str, completion: &str) -> Self {
        let prompt_tokens = estimate_tokens(prompt);
        let completion_tokens = estimate_tokens(completion);
        Self {
            prompt_tokens,
            completion_tokens,
            total_tokens: prompt_tokens + completion_tokens,
        }
    }
}

fn estimate_tokens(text: &str) -> u32 {
    text.split_whitespace().count() as u32
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionResponse {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatCompletionChoice>,
    pub usage: Usage,
}

impl ChatCompletionResponse {
    pub fn new(id: String, model: String, reply: String, prompt: &str, created: i64) -> Self {
        let usage = Usage::estimate(prompt, &reply);
        Self {
            id,
            object: "chat.completion",
            created,
            model,
            choices: vec![ChatCompletionChoice {
                index: 0,
                message: ChatCompletionMessage {
                    role: "assistant".to_string(),
                    content: reply,
                },
                finish_reason: "stop",
            }],
            usage,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ChunkDelta {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionChunkChoice {
    pub index: u32,
    pub delta: ChunkDelta,
    pub finish_reason: Option<&'static str>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatCompletionChunk {
    pub id: String,
    pub object: &'static str,
    pub created: i64,
    pub model: String,
    pub choices: Vec<ChatCompletionChunkChoice>,
}

impl ChatCompletionChunk {
    pub fn preface(id: &str, model: &str, created: i64) -> Self {
        Self::with_delta(
            id,
            model,
            created,
            ChunkDelta {
                role: Some("assistant"),
                content: None,
            },
            None,
        )
    }

    pub fn content(id: &str, model: &str, created: i64, piece: String) -> Self {
        Self::with_delta(
            id,
            model,
            created,
            ChunkDelta {
                role: None,
                content: Some(piece),
            },
            None,
        )
    }

    pub fn terminating(id: &str, model: &str, created: i64) -> Self {
        Self::with_delta(id, model, created, ChunkDelta::default(), Some("stop"))
    }

    fn with_delta(
        id: &str,
        model: &str,
        created: i64,
        delta: ChunkDelta,
        finish_reason: Option<&'static str>,
    ) -> Self {
        Self {
            id: id.to_string(),
            object: "chat.completion.chunk",
            created,
            model: model.to_string(),
            choices: vec![ChatCompletionChunkChoice {
                index: 0,
                delta,
                finish_reason,
            }],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_user_message_picks_most_recent() {
        let req = ChatCompletionRequest {
            model: None,
            messages: vec![
                ChatCompletionMessage {
                    role: "user".into(),
                    content: "first".into(),
                },
                ChatCompletionMessage {
                    role: "assistant".into(),
                    content: "reply".into(),
                },
                ChatCompletionMessage {
                    role: "user".into(),
                    content: "second".into(),
                },
            ],
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
        };
        assert_eq!(req.last_user_message(), Some("second"));
    }

    #[test]
    fn usage_estimate_counts_whitespace_tokens() {
        let usage = Usage::estimate("hello there", "a b c");
        assert_eq!(usage.prompt_tokens, 2);
        assert_eq!(usage.completion_tokens, 3);
        assert_eq!(usage.total_tokens, 5);
    }
}
