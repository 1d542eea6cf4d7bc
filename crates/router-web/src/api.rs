//! HTTP route handlers (§6): the OpenAI-compatible chat-completion endpoint
//! and a liveness probe.

use std::sync::Arc;

use axum::body::Body;
use axum::extract::State;
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::response::{IntoResponse, Json, Response};
use futures::stream;
use serde_json::json;

use crate::handler::{self, ChatOutcome};
use crate::state::AppState;
use crate::streaming::{self, DONE_EVENT};
use crate::wire::{ChatCompletionRequest, ChatCompletionResponse};

const SESSION_HEADER: &str = "x-session-id";

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(json!({ "status": "ok" })))
}

pub async fn chat_completions(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(request): Json<ChatCompletionRequest>,
) -> Response {
    let session_id = headers
        .get(SESSION_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    let stream_requested = request.stream;
    let outcome = handler::handle_chat(&state, session_id, &request).await;

    if stream_requested {
        streaming_response(outcome)
    } else {
        whole_response(outcome)
    }
}

fn whole_response(outcome: ChatOutcome) -> Response {
    let id = format!("chat-{}", uuid::Uuid::now_v7());
    let created = chrono::Utc::now().timestamp();
    let body = ChatCompletionResponse::new(id, outcome.model, outcome.reply, &outcome.prompt, created);

    let mut response = Json(body).into_response();
    set_session_header(response.headers_mut(), &outcome.session_id);
    response
}

fn streaming_response(outcome: ChatOutcome) -> Response {
    let id = format!("chat-{}", uuid::Uuid::now_v7());
    let created = chrono::Utc::now().timestamp();
    let chunks = streaming::build_chunks(&id, &outcome.model, created, &outcome.reply);

    let events: Vec<String> = chunks
        .iter()
        .map(streaming::sse_event)
        .chain(std::iter::once(DONE_EVENT.to_string()))
        .collect();

    // Each frame is its own stream item so the transport can flush between
    // them (§6, §9 "Streaming as lazy byte sequence").
    let body_stream = stream::iter(events.into_iter().map(Ok::<_, std::io::Error>));
    let body = Body::from_stream(body_stream);

    let mut response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, "text/event-stream")
        .header(header::CACHE_CONTROL, "no-cache")
        .header(header::CONNECTION, "keep-alive")
        .header("x-accel-buffering", "no")
        .body(body)
        .expect("streaming response is well-formed");

    set_session_header(response.headers_mut(), &outcome.session_id);
    response
}

fn set_session_header(headers: &mut HeaderMap, session_id: &str) {
    if let Ok(value) = HeaderValue::from_str(session_id) {
        headers.insert(SESSION_HEADER, value);
    }
}
