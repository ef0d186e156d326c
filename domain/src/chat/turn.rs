//! Persisted chat turn

use super::message::Role;
use crate::core::conv_id::ConvId;
use serde::{Deserialize, Serialize};

/// User id recorded when the caller did not identify itself.
pub const ANONYMOUS_USER: &str = "anonymous";

/// One persisted turn of a conversation (Entity).
///
/// Field names follow the document-store collection schema
/// (`userId`, `role`, `content`, `convId`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatTurnRecord {
    pub user_id: String,
    pub role: Role,
    pub content: String,
    pub conv_id: ConvId,
}

impl ChatTurnRecord {
    pub fn new(
        conv_id: ConvId,
        user_id: Option<&str>,
        role: Role,
        content: impl Into<String>,
    ) -> Self {
        Self {
            user_id: user_id.unwrap_or(ANONYMOUS_USER).to_string(),
            role,
            content: content.into(),
            conv_id,
        }
    }
}
