//! Core domain concepts shared across the chat model.
//!
//! - [`conv_id::ConvId`]: opaque conversation identifier
//! - [`error::DomainError`]: validation errors for inbound requests

pub mod conv_id;
pub mod error;
