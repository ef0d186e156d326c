//! Port for persisting chat turns.
//!
//! Defines the [`HistoryStore`] trait for writing one [`ChatTurnRecord`] to a
//! document store. Persistence is best-effort: the
//! [`HistoryRecorder`](crate::use_cases::record_turn::HistoryRecorder) turns
//! store failures into an explicit outcome rather than propagating them.

use async_trait::async_trait;
use relay_domain::ChatTurnRecord;
use thiserror::Error;

/// Errors that can occur while writing to the history store
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error("Storage connection error: {0}")]
    Connection(String),

    #[error("Storage returned {status}: {message}")]
    Api { status: u16, message: String },

    #[error("Failed to parse storage response: {0}")]
    Parse(String),
}

/// Port for writing chat turns to a document store.
#[async_trait]
pub trait HistoryStore: Send + Sync {
    /// Persist one turn and return the identifier of the created document.
    async fn create_record(&self, record: &ChatTurnRecord) -> Result<String, StoreError>;
}
