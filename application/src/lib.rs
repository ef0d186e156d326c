//! Application layer for chat-relay
//!
//! This crate contains the use cases (stream relay, response composer,
//! history recording) and the port definitions their adapters implement.
//! It depends only on the domain layer.

pub mod ports;
pub mod use_cases;

// Re-export commonly used types
pub use ports::{
    completion_gateway::{CompletionGateway, FragmentStream, GatewayError},
    history_store::{HistoryStore, StoreError},
};
pub use use_cases::compose_response::{
    ComposeResponseError, ComposeResponseUseCase, ComposedResponse,
};
pub use use_cases::record_turn::{HistoryRecorder, RecordOutcome};
pub use use_cases::stream_relay::{FrameStream, RelayPhase, StreamRelayUseCase};
