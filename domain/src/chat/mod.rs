//! Chat domain.
//!
//! - [`message::ChatMessage`]: a single message of the conversation history
//! - [`request::ChatRequest`]: a validated inbound request (with defaults applied)
//! - [`completion`]: provider-facing parameters and one-shot results
//! - [`frame::StreamFrame`]: one event of the streamed response
//! - [`turn::ChatTurnRecord`]: one persisted turn

pub mod completion;
pub mod frame;
pub mod message;
pub mod request;
pub mod turn;
