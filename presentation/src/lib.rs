//! Presentation layer for chat-relay
//!
//! This crate contains the HTTP surface (router, handlers, wire encoding of
//! frames and responses) and the command-line definition of the server binary.

pub mod cli;
pub mod http;

// Re-export commonly used types
pub use cli::commands::Cli;
pub use http::{ApiError, AppState, create_router, serve};
