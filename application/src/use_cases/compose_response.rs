//! Compose Response use case.
//!
//! Drives the one-shot path: record the latest user turn, wait for the full
//! completion, record the assistant turn, and hand back text, usage and the
//! conversation identifier.

use crate::ports::completion_gateway::{CompletionGateway, GatewayError};
use crate::use_cases::record_turn::HistoryRecorder;
use crate::use_cases::shared::record_turn_best_effort;
use relay_domain::util::preview;
use relay_domain::{ChatRequest, ConvId, Role, UsageStats};
use std::sync::Arc;
use thiserror::Error;
use tracing::{error, info};

/// Errors that can occur while composing a one-shot response.
#[derive(Error, Debug)]
pub enum ComposeResponseError {
    #[error(transparent)]
    Provider(#[from] GatewayError),
}

/// Output of the [`ComposeResponseUseCase`].
#[derive(Debug, Clone, PartialEq)]
pub struct ComposedResponse {
    pub text: String,
    pub usage: UsageStats,
    pub conv_id: Option<ConvId>,
}

/// Use case for answering a request with a single JSON payload.
#[derive(Clone)]
pub struct ComposeResponseUseCase {
    gateway: Arc<dyn CompletionGateway>,
    recorder: HistoryRecorder,
}

impl ComposeResponseUseCase {
    pub fn new(gateway: Arc<dyn CompletionGateway>, recorder: HistoryRecorder) -> Self {
        Self { gateway, recorder }
    }

    pub async fn execute(
        &self,
        request: ChatRequest,
    ) -> Result<ComposedResponse, ComposeResponseError> {
        info!(
            model = %request.model,
            messages = request.messages.len(),
            persistence = self.recorder.is_enabled(),
            "Starting one-shot completion"
        );

        let mut conv_id = request.conv_id.clone();
        let user_id = request.user_id.as_deref();

        if let Some(message) = request.last_user_message() {
            conv_id = record_turn_best_effort(
                &self.recorder,
                conv_id,
                user_id,
                Role::User,
                &message.content,
            )
            .await;
        }

        let completion = self
            .gateway
            .complete_once(request.completion_params())
            .await
            .inspect_err(|e| error!("Provider completion failed: {}", e))?;

        if !completion.text.is_empty() {
            conv_id = record_turn_best_effort(
                &self.recorder,
                conv_id,
                user_id,
                Role::Assistant,
                &completion.text,
            )
            .await;
        }

        info!(
            total_tokens = completion.usage.total_tokens,
            "One-shot completion finished: {}",
            preview(&completion.text, 80)
        );

        Ok(ComposedResponse {
            text: completion.text,
            usage: completion.usage,
            conv_id,
        })
    }
}
