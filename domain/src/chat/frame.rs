//! Streamed response frames.
//!
//! [`StreamFrame`] is one event of the streamed response, emitted in strict
//! order: zero or more [`Content`](StreamFrame::Content) frames followed by
//! exactly one terminal frame ([`Done`](StreamFrame::Done) or
//! [`Error`](StreamFrame::Error)).

use crate::core::conv_id::ConvId;

/// An event in a streamed chat response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StreamFrame {
    /// A text fragment from the provider, forwarded unchanged.
    Content(String),
    /// The stream completed; carries the accumulated text and the final
    /// conversation identifier (if one was supplied or established).
    Done {
        full_response: String,
        conv_id: Option<ConvId>,
    },
    /// The stream failed; no further frames follow.
    Error(String),
}
