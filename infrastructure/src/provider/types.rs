//! Wire types of the OpenAI-compatible chat completions API.

use relay_domain::{ChatMessage, UsageStats};
use serde::{Deserialize, Serialize};

#[derive(Serialize)]
pub(crate) struct CompletionRequestBody<'a> {
    pub model: &'a str,
    pub messages: &'a [ChatMessage],
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

#[derive(Deserialize)]
pub(crate) struct CompletionResponseBody {
    #[serde(default)]
    pub choices: Vec<CompletionChoice>,
    pub usage: Option<UsageStats>,
}

#[derive(Deserialize)]
pub(crate) struct CompletionChoice {
    pub message: CompletionMessage,
}

#[derive(Deserialize)]
pub(crate) struct CompletionMessage {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct StreamChunkBody {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
    pub error: Option<ApiErrorDetail>,
}

#[derive(Deserialize)]
pub(crate) struct StreamChoice {
    #[serde(default)]
    pub delta: StreamDelta,
    pub finish_reason: Option<String>,
}

#[derive(Deserialize, Default)]
pub(crate) struct StreamDelta {
    pub content: Option<String>,
}

#[derive(Deserialize)]
pub(crate) struct ApiErrorBody {
    pub error: ApiErrorDetail,
}

#[derive(Deserialize)]
pub(crate) struct ApiErrorDetail {
    pub message: String,
}

/// Pull `error.message` out of an error body, falling back to the raw text.
pub(crate) fn api_error_message(body: &str) -> String {
    serde_json::from_str::<ApiErrorBody>(body)
        .map(|b| b.error.message)
        .unwrap_or_else(|_| body.trim().to_string())
}
