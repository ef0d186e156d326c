//! Application state shared across handlers.

use chrono::{DateTime, Utc};
use relay_application::{
    CompletionGateway, ComposeResponseUseCase, HistoryRecorder, StreamRelayUseCase,
};
use relay_domain::RequestDefaults;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub compose: ComposeResponseUseCase,
    pub relay: StreamRelayUseCase,
    /// Values applied to fields the caller left out.
    pub defaults: Arc<RequestDefaults>,
    /// Whether turns are written to a history store.
    pub persistence: bool,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(
        gateway: Arc<dyn CompletionGateway>,
        recorder: HistoryRecorder,
        defaults: RequestDefaults,
    ) -> Self {
        Self {
            persistence: recorder.is_enabled(),
            compose: ComposeResponseUseCase::new(gateway.clone(), recorder.clone()),
            relay: StreamRelayUseCase::new(gateway, recorder),
            defaults: Arc::new(defaults),
            started_at: Utc::now(),
        }
    }
}
