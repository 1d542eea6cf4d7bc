//! Server-Sent-Events encoding for the streaming chat-completion endpoint
//! (§6). The reply is always complete before streaming starts -- there is no
//! token-by-token passthrough from the LLM provider (see `router_agent::llm`)
//! -- so "streaming" here means re-chunking a whole string for the
//! transport, word-wrapped so no single event grows unbounded.

use crate::wire::ChatCompletionChunk;

pub const MAX_CHUNK_LEN: usize = 80;
pub const DONE_EVENT: &str = "data: [DONE]\n\n";

/// Split `text` into whitespace-preserving pieces of at most `max_len`
/// characters. Any run (whitespace or not) longer than `max_len` is
/// hard-split. Concatenating the result always reproduces `text` exactly
/// (§8).
pub fn wrap(text: &str, max_len: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for token in tokenize(text) {
        let token_len = token.chars().count();

        if token_len > max_len {
            if !current.is_empty() {
                pieces.push(std::mem::take(&mut current));
                current_len = 0;
            }
            let mut rest = token.as_str();
            while rest.chars().count() > max_len {
                let (head, tail) = split_at_chars(rest, max_len);
                pieces.push(head.to_string());
                rest = tail;
            }
            current.push_str(rest);
            current_len = rest.chars().count();
            continue;
        }

        if current_len + token_len > max_len && !current.is_empty() {
            pieces.push(std::mem::take(&mut current));
            current_len = 0;
        }
        current.push_str(&token);
        current_len += token_len;
    }

    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

fn tokenize(text: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut current_is_ws = None;

    for c in text.chars() {
        let is_ws = c.is_whitespace();
        if current_is_ws != Some(is_ws) && !current.is_empty() {
            tokens.push(std::mem::take(&mut current));
        }
        current.push(c);
        current_is_ws = Some(is_ws);
    }
    if !current.is_empty() {
        tokens.push(current);
    }
    tokens
}

fn split_at_chars(s: &str, n: usize) -> (&str, &str) {
    match s.char_indices().nth(n) {
        Some((idx, _)) => (&s[..idx], &s[idx..]),
        None => (s, ""),
    }
}

/// Build the full chunk sequence for one streamed reply: a preface chunk, N
/// content chunks, and a terminating chunk (§6). The `[DONE]` sentinel is
/// emitted separately by the caller after the SSE encoding of the last chunk.
pub fn build_chunks(id: &str, model: &str, created: i64, reply: &str) -> Vec<ChatCompletionChunk> {
    let mut chunks = vec![ChatCompletionChunk::preface(id, model, created)];
    for piece in wrap(reply, MAX_CHUNK_LEN) {
        chunks.push(ChatCompletionChunk::content(id, model, created, piece));
    }
    chunks.push(ChatCompletionChunk::terminating(id, model, created));
    chunks
}

/// Encode one chunk as an SSE `data: ...\n\n` frame.
pub fn sse_event(chunk: &ChatCompletionChunk) -> String {
    format!(
        "data: {}\n\n",
        serde_json::to_string(chunk).expect("ChatCompletionChunk always serializes")
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn wrap_preserves_exact_concatenation() {
        let text = "The quick brown fox jumps over the lazy dog and keeps on running through the meadow without stopping for quite a while.";
        let pieces = wrap(text, 80);
        assert_eq!(pieces.concat(), text);
        for p in &pieces {
            assert!(p.chars().count() <= 80, "piece exceeded max len: {p:?}");
        }
    }

    #[test]
    fn wrap_hard_splits_overlong_word() {
        let long_word = "x".repeat(230);
        let pieces = wrap(&long_word, 80);
        assert_eq!(pieces.concat(), long_word);
        assert!(pieces.iter().all(|p| p.chars().count() <= 80));
        assert!(pieces.len() >= 3);
    }

    #[test]
    fn wrap_mixed_long_word_and_text_reproduces_input() {
        let long_word = "a".repeat(150);
        let text = format!("please handle this: {long_word} and then continue as normal after that");
        let pieces = wrap(&text, 80);
        assert_eq!(pieces.concat(), text);
        assert!(pieces.iter().all(|p| p.chars().count() <= 80));
    }

    #[test]
    fn wrap_empty_text_yields_no_pieces() {
        assert!(wrap("", 80).is_empty());
    }

    #[test]
    fn wrap_hard_splits_overlong_whitespace_run() {
        let long_run = " ".repeat(230);
        let text = format!("before{long_run}after");
        let pieces = wrap(&text, 80);
        assert_eq!(pieces.concat(), text);
        assert!(pieces.iter().all(|p| p.chars().count() <= 80), "piece exceeded max len");
    }

    #[test]
    fn build_chunks_has_preface_and_terminating() {
        let chunks = build_chunks("id-1", "llama3.1", 0, "hello world");
        assert_eq!(chunks.first().unwrap().choices[0].delta.role, Some("assistant"));
        assert_eq!(
            chunks.last().unwrap().choices[0].finish_reason,
            Some("stop")
        );
        let reconstructed: String = chunks[1..chunks.len() - 1]
            .iter()
            .map(|c| c.choices[0].delta.content.clone().unwrap_or_default())
            .collect();
        assert_eq!(reconstructed, "hello world");
    }

    #[test]
    fn sse_event_is_data_prefixed_and_double_newline_terminated() {
        let chunk = ChatCompletionChunk::terminating("id", "m", 0);
        let event = sse_event(&chunk);
        assert!(event.starts_with("data: "));
        assert!(event.ends_with("\n\n"));
    }
}
