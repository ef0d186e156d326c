//! Request handlers.

use super::error::ApiError;
use super::state::AppState;
use super::wire::{CompletionBody, WireFrame};
use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderValue, StatusCode, header};
use axum::response::sse::{Event, Sse};
use axum::response::{IntoResponse, Response};
use futures::{StreamExt, stream};
use relay_application::FrameStream;
use relay_domain::{ChatRequest, StreamFrame};
use serde_json::{Value, json};

/// Handle a chat request, answering with an SSE stream or a JSON document.
///
/// The body is read as raw bytes so that malformed JSON is reported with the
/// same `{"error": ...}` shape as every other failure.
pub(crate) async fn handle_chat(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Response, ApiError> {
    let request = ChatRequest::parse(&body, &state.defaults)?;

    if request.stream {
        let frames = state.relay.execute(request);
        return Ok(stream_response(frames).await);
    }

    let composed = state.compose.execute(request).await?;
    Ok(Json(CompletionBody::from(composed)).into_response())
}

/// Turn the frame stream into an SSE response.
///
/// The first frame is awaited before headers are sent: a stream that fails
/// before producing any content is answered with status 500 and that single
/// error frame. Later failures arrive as the terminal frame of a 200 stream.
async fn stream_response(mut frames: FrameStream) -> Response {
    let first = frames.next().await;
    let status = match &first {
        Some(StreamFrame::Error(_)) => StatusCode::INTERNAL_SERVER_ERROR,
        _ => StatusCode::OK,
    };

    let events = stream::iter(first)
        .chain(frames)
        .map(|frame| Event::default().json_data(WireFrame::from(&frame)));

    let mut response = (status, Sse::new(events)).into_response();
    let headers = response.headers_mut();
    headers.insert(header::CONNECTION, HeaderValue::from_static("keep-alive"));
    headers.insert(
        header::ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static("*"),
    );
    response
}

/// Handle health check requests.
pub(crate) async fn handle_health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "persistence": state.persistence,
        "started_at": state.started_at.to_rfc3339(),
    }))
}
