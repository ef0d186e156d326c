//! Inbound chat request and its validator.
//!
//! [`ChatRequest::parse`] turns a raw request body into a validated request:
//!
//! 1. The body must be a JSON object, otherwise
//!    [`DomainError::MalformedInput`]. An empty body is read as `{}`.
//! 2. `messages` must be present and non-empty, otherwise
//!    [`DomainError::MissingField`], whatever the other fields hold.
//! 3. The remaining fields must match the request shape, otherwise
//!    [`DomainError::MalformedInput`].
//! 4. `model`, `temperature`, `max_tokens` and `stream` fall back to
//!    [`RequestDefaults`] when absent.

use super::completion::CompletionParams;
use super::message::{ChatMessage, Role};
use crate::core::{conv_id::ConvId, error::DomainError};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Values applied to request fields the caller left out.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RequestDefaults {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
}

impl Default for RequestDefaults {
    fn default() -> Self {
        Self {
            model: "glm-4-air".to_string(),
            temperature: 0.7,
            max_tokens: 1240,
            stream: true,
        }
    }
}

/// Wire shape of the request body, before defaults and validation.
#[derive(Debug, Deserialize)]
struct RawChatRequest {
    messages: Option<Vec<ChatMessage>>,
    model: Option<String>,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
    stream: Option<bool>,
    #[serde(rename = "userId")]
    user_id: Option<String>,
    #[serde(rename = "convId")]
    conv_id: Option<String>,
}

/// A validated chat request with defaults applied.
#[derive(Debug, Clone, PartialEq)]
pub struct ChatRequest {
    pub messages: Vec<ChatMessage>,
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub stream: bool,
    pub user_id: Option<String>,
    pub conv_id: Option<ConvId>,
}

impl ChatRequest {
    /// Parse and validate a raw request body.
    pub fn parse(body: &[u8], defaults: &RequestDefaults) -> Result<Self, DomainError> {
        let body = if body.iter().all(u8::is_ascii_whitespace) {
            b"{}".as_slice()
        } else {
            body
        };

        let value: Value = serde_json::from_slice(body)
            .map_err(|e| DomainError::MalformedInput(e.to_string()))?;
        let Value::Object(fields) = &value else {
            return Err(DomainError::MalformedInput(
                "request body must be a JSON object".to_string(),
            ));
        };

        // Checked before any other field is typed.
        match fields.get("messages") {
            None | Some(Value::Null) => return Err(DomainError::MissingField("messages")),
            Some(Value::Array(items)) if items.is_empty() => {
                return Err(DomainError::MissingField("messages"));
            }
            Some(_) => {}
        }

        let raw = RawChatRequest::deserialize(value)
            .map_err(|e| DomainError::MalformedInput(e.to_string()))?;
        let messages = raw.messages.unwrap_or_default();

        Ok(Self {
            messages,
            model: raw.model.unwrap_or_else(|| defaults.model.clone()),
            temperature: raw.temperature.unwrap_or(defaults.temperature),
            max_tokens: raw.max_tokens.unwrap_or(defaults.max_tokens),
            stream: raw.stream.unwrap_or(defaults.stream),
            user_id: non_blank(raw.user_id),
            conv_id: non_blank(raw.conv_id).map(ConvId::from),
        })
    }

    /// The most recent message with role `user`, scanning from the end.
    pub fn last_user_message(&self) -> Option<&ChatMessage> {
        self.messages.iter().rev().find(|m| m.role == Role::User)
    }

    /// The subset of the request forwarded to the provider.
    pub fn completion_params(&self) -> CompletionParams {
        CompletionParams {
            messages: self.messages.clone(),
            model: self.model.clone(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
