//! Completion Gateway port
//!
//! Defines the interface for requesting chat completions from an LLM provider.

use async_trait::async_trait;
use futures::stream::BoxStream;
use relay_domain::{Completion, CompletionParams};
use thiserror::Error;

/// Errors that can occur during completion gateway operations
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Provider returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse provider response: {0}")]
    Parse(String),

    #[error("Provider request timed out")]
    Timeout,

    #[error("Stream interrupted: {0}")]
    Stream(String),
}

/// Lazy sequence of text fragments from an incremental completion.
///
/// The sequence is finite and not restartable. A failure is yielded as a
/// terminal `Err` item. Dropping the stream abandons the upstream request.
pub type FragmentStream = BoxStream<'static, Result<String, GatewayError>>;

/// Gateway for LLM completions
///
/// This port defines how the application layer talks to the completion
/// provider. Implementations (adapters) live in the infrastructure layer.
#[async_trait]
pub trait CompletionGateway: Send + Sync {
    /// Request a full completion and wait for it.
    async fn complete_once(&self, params: CompletionParams) -> Result<Completion, GatewayError>;

    /// Open an incremental completion.
    ///
    /// Errors returned here mean the stream could not be opened at all;
    /// later failures arrive as items of the returned stream.
    async fn complete_stream(&self, params: CompletionParams)
    -> Result<FragmentStream, GatewayError>;
}
