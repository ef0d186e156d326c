//! Domain error types

use thiserror::Error;

/// Domain-level errors raised while validating an inbound chat request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The request body could not be parsed as a chat request.
    #[error("Invalid JSON in request body: {0}")]
    MalformedInput(String),

    /// A required field is absent or empty.
    #[error("{0} array is required")]
    MissingField(&'static str),
}
