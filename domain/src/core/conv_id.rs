//! Conversation identifier value object

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier grouping the turns of one conversation (Value Object).
///
/// Either supplied by the caller or generated the first time a turn of a new
/// conversation is persisted. Serializes as a bare string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ConvId(String);

impl ConvId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh identifier (UUID v4, hyphenated).
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ConvId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ConvId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for ConvId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
