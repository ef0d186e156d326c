//! Completion provider adapters.
//!
//! [`OpenAiCompatibleGateway`] implements the
//! [`CompletionGateway`](relay_application::CompletionGateway) port against any
//! OpenAI-compatible `/chat/completions` endpoint.

mod openai;
mod sse;
mod types;

pub use openai::{OpenAiCompatibleGateway, ProviderSettings};
pub use sse::{SseEvent, SseLineBuffer};
