//! JSON shapes written to the client.

use relay_application::ComposedResponse;
use relay_domain::{ConvId, StreamFrame, UsageStats};
use serde::Serialize;

/// One SSE `data:` payload.
#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub(crate) enum WireFrame<'a> {
    Content {
        content: &'a str,
        done: bool,
    },
    Done {
        content: &'a str,
        done: bool,
        full_response: &'a str,
        #[serde(rename = "convId")]
        conv_id: Option<&'a ConvId>,
    },
    Error {
        error: &'a str,
        done: bool,
    },
}

impl<'a> From<&'a StreamFrame> for WireFrame<'a> {
    fn from(frame: &'a StreamFrame) -> Self {
        match frame {
            StreamFrame::Content(content) => WireFrame::Content {
                content,
                done: false,
            },
            StreamFrame::Done {
                full_response,
                conv_id,
            } => WireFrame::Done {
                content: "",
                done: true,
                full_response,
                conv_id: conv_id.as_ref(),
            },
            StreamFrame::Error(error) => WireFrame::Error { error, done: true },
        }
    }
}

/// Body of a successful one-shot response.
#[derive(Debug, Serialize)]
pub(crate) struct CompletionBody {
    pub success: bool,
    pub response: String,
    pub usage: UsageStats,
    #[serde(rename = "convId")]
    pub conv_id: Option<ConvId>,
}

impl From<ComposedResponse> for CompletionBody {
    fn from(composed: ComposedResponse) -> Self {
        Self {
            success: true,
            response: composed.text,
            usage: composed.usage,
            conv_id: composed.conv_id,
        }
    }
}
