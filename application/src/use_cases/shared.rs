//! Shared helpers for use cases.
//!
//! Both the stream relay and the response composer record turns the same
//! way: write, log a failed write, carry the resolved identifier forward.

use crate::use_cases::record_turn::{HistoryRecorder, RecordOutcome};
use relay_domain::{ConvId, Role};
use tracing::warn;

/// Record one turn and return the conversation identifier to continue with.
///
/// A failed write is logged and otherwise ignored.
pub(crate) async fn record_turn_best_effort(
    recorder: &HistoryRecorder,
    conv_id: Option<ConvId>,
    user_id: Option<&str>,
    role: Role,
    content: &str,
) -> Option<ConvId> {
    let outcome = recorder
        .record(conv_id.as_ref(), user_id, role, content)
        .await;

    if let RecordOutcome::Failed { reason, .. } = &outcome {
        warn!(role = %role, "Failed to record chat turn: {}", reason);
    }

    outcome.into_conv_id()
}
