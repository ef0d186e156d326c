//! Domain layer for chat-relay
//!
//! This crate contains the chat data model and the inbound request validator.
//! It has no dependencies on infrastructure or presentation concerns.
//!
//! # Core Concepts
//!
//! - **Turn**: one message (user or assistant) within a conversation
//! - **Fragment**: an incremental piece of generated text delivered before the
//!   full response is complete
//! - **Conversation identifier** ([`ConvId`]): opaque token grouping the turns
//!   of one conversation in the history store

pub mod chat;
pub mod core;
pub mod util;

// Re-export commonly used types
pub use chat::{
    completion::{Completion, CompletionParams, UsageStats},
    frame::StreamFrame,
    message::{ChatMessage, Role},
    request::{ChatRequest, RequestDefaults},
    turn::{ANONYMOUS_USER, ChatTurnRecord},
};
pub use core::{conv_id::ConvId, error::DomainError};
