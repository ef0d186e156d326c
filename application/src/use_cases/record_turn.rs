//! History recording.
//!
//! [`HistoryRecorder`] persists one chat turn and resolves the conversation
//! identifier for the rest of the request:
//!
//! - Without a configured store it does nothing and hands the input
//!   identifier back ([`RecordOutcome::Disabled`]).
//! - With a store, a missing identifier is generated, the turn is written,
//!   and the identifier is adopted once the write succeeds
//!   ([`RecordOutcome::Stored`]).
//! - A failed write yields [`RecordOutcome::Failed`] with the identifier the
//!   caller already had. Callers decide to swallow it.

use crate::ports::history_store::HistoryStore;
use relay_domain::{ChatTurnRecord, ConvId, Role};
use std::sync::Arc;
use tracing::debug;

/// Result of a single best-effort write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordOutcome {
    /// No store configured; nothing was written.
    Disabled { conv_id: Option<ConvId> },
    /// The turn was written.
    Stored { conv_id: ConvId, document_id: String },
    /// The write failed; `conv_id` is the identifier known before the attempt.
    Failed {
        conv_id: Option<ConvId>,
        reason: String,
    },
}

impl RecordOutcome {
    /// The conversation identifier to carry forward.
    pub fn conv_id(&self) -> Option<&ConvId> {
        match self {
            RecordOutcome::Disabled { conv_id } | RecordOutcome::Failed { conv_id, .. } => {
                conv_id.as_ref()
            }
            RecordOutcome::Stored { conv_id, .. } => Some(conv_id),
        }
    }

    pub fn into_conv_id(self) -> Option<ConvId> {
        match self {
            RecordOutcome::Disabled { conv_id } | RecordOutcome::Failed { conv_id, .. } => conv_id,
            RecordOutcome::Stored { conv_id, .. } => Some(conv_id),
        }
    }
}

/// Writes chat turns to an optional [`HistoryStore`].
#[derive(Clone, Default)]
pub struct HistoryRecorder {
    store: Option<Arc<dyn HistoryStore>>,
}

impl HistoryRecorder {
    pub fn new(store: Arc<dyn HistoryStore>) -> Self {
        Self { store: Some(store) }
    }

    /// Recorder for deployments without storage configuration.
    pub fn disabled() -> Self {
        Self { store: None }
    }

    pub fn is_enabled(&self) -> bool {
        self.store.is_some()
    }

    /// Persist one turn.
    pub async fn record(
        &self,
        conv_id: Option<&ConvId>,
        user_id: Option<&str>,
        role: Role,
        content: &str,
    ) -> RecordOutcome {
        let Some(store) = &self.store else {
            return RecordOutcome::Disabled {
                conv_id: conv_id.cloned(),
            };
        };

        let candidate = conv_id.cloned().unwrap_or_else(ConvId::generate);
        let record = ChatTurnRecord::new(candidate.clone(), user_id, role, content);

        match store.create_record(&record).await {
            Ok(document_id) => {
                debug!(
                    conv_id = %candidate,
                    document_id = %document_id,
                    role = %role,
                    "Recorded chat turn"
                );
                RecordOutcome::Stored {
                    conv_id: candidate,
                    document_id,
                }
            }
            Err(e) => RecordOutcome::Failed {
                conv_id: conv_id.cloned(),
                reason: e.to_string(),
            },
        }
    }
}
