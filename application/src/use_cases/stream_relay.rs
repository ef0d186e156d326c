//! Stream Relay use case.
//!
//! Drives the streamed response: records the latest user turn, forwards
//! provider fragments as [`StreamFrame::Content`] frames the moment they
//! arrive, records the assistant turn, and ends with a single terminal frame.
//!
//! ```text
//! Idle -> RecordingUserTurn -> Streaming -> RecordingAssistantTurn -> Completed
//!                                  \-> Errored
//! ```
//!
//! The returned [`FrameStream`] is lazy: nothing happens until it is polled,
//! and dropping it (client disconnect) drops the provider stream with it.

use crate::ports::completion_gateway::CompletionGateway;
use crate::use_cases::record_turn::HistoryRecorder;
use crate::use_cases::shared::record_turn_best_effort;
use futures::StreamExt;
use futures::stream::BoxStream;
use relay_domain::util::preview;
use relay_domain::{ChatRequest, Role, StreamFrame};
use std::fmt;
use std::sync::Arc;
use tracing::{debug, error, info};

/// Ordered frames of one streamed response.
pub type FrameStream = BoxStream<'static, StreamFrame>;

/// Phases of a single relay run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayPhase {
    Idle,
    RecordingUserTurn,
    Streaming,
    RecordingAssistantTurn,
    Completed,
    Errored,
}

impl fmt::Display for RelayPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RelayPhase::Idle => "idle",
            RelayPhase::RecordingUserTurn => "recording_user_turn",
            RelayPhase::Streaming => "streaming",
            RelayPhase::RecordingAssistantTurn => "recording_assistant_turn",
            RelayPhase::Completed => "completed",
            RelayPhase::Errored => "errored",
        };
        f.write_str(name)
    }
}

fn enter(phase: &mut RelayPhase, next: RelayPhase) {
    debug!(from = %phase, to = %next, "Relay phase change");
    *phase = next;
}

/// Use case for relaying an incremental completion as frames.
#[derive(Clone)]
pub struct StreamRelayUseCase {
    gateway: Arc<dyn CompletionGateway>,
    recorder: HistoryRecorder,
}

impl StreamRelayUseCase {
    pub fn new(gateway: Arc<dyn CompletionGateway>, recorder: HistoryRecorder) -> Self {
        Self { gateway, recorder }
    }

    /// Build the frame stream for a validated request.
    pub fn execute(&self, request: ChatRequest) -> FrameStream {
        let gateway = self.gateway.clone();
        let recorder = self.recorder.clone();

        let frames = async_stream::stream! {
            let mut phase = RelayPhase::Idle;
            let mut conv_id = request.conv_id.clone();
            let user_id = request.user_id.as_deref();

            info!(
                model = %request.model,
                messages = request.messages.len(),
                persistence = recorder.is_enabled(),
                "Starting streamed completion"
            );

            let user_turn = request
                .last_user_message()
                .filter(|_| recorder.is_enabled());
            if let Some(message) = user_turn {
                enter(&mut phase, RelayPhase::RecordingUserTurn);
                conv_id = record_turn_best_effort(
                    &recorder,
                    conv_id,
                    user_id,
                    Role::User,
                    &message.content,
                )
                .await;
            }

            enter(&mut phase, RelayPhase::Streaming);
            let mut fragments = match gateway.complete_stream(request.completion_params()).await {
                Ok(fragments) => fragments,
                Err(e) => {
                    enter(&mut phase, RelayPhase::Errored);
                    error!("Failed to open provider stream: {}", e);
                    yield StreamFrame::Error(e.to_string());
                    return;
                }
            };

            let mut full_response = String::new();
            while let Some(item) = fragments.next().await {
                match item {
                    Ok(fragment) => {
                        full_response.push_str(&fragment);
                        yield StreamFrame::Content(fragment);
                    }
                    Err(e) => {
                        enter(&mut phase, RelayPhase::Errored);
                        error!(
                            received_bytes = full_response.len(),
                            "Provider stream failed: {}", e
                        );
                        yield StreamFrame::Error(e.to_string());
                        return;
                    }
                }
            }
            drop(fragments);

            if recorder.is_enabled() && !full_response.is_empty() {
                enter(&mut phase, RelayPhase::RecordingAssistantTurn);
                conv_id = record_turn_best_effort(
                    &recorder,
                    conv_id,
                    user_id,
                    Role::Assistant,
                    &full_response,
                )
                .await;
            }

            enter(&mut phase, RelayPhase::Completed);
            info!(
                bytes = full_response.len(),
                conv_id = conv_id.as_ref().map(|c| c.as_str()),
                "Streamed completion finished: {}",
                preview(&full_response, 80)
            );
            yield StreamFrame::Done {
                full_response,
                conv_id,
            };
        };

        Box::pin(frames)
    }
}
