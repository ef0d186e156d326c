//! Infrastructure layer for chat-relay
//!
//! This crate contains adapters that implement the ports defined in the
//! application layer, and configuration loading.

pub mod config;
pub mod provider;
pub mod storage;

// Re-export commonly used types
pub use config::{
    ConfigLoader, ConfigValidationError, FileConfig, FileProviderConfig, FileServerConfig,
    FileStorageConfig,
};
pub use provider::{OpenAiCompatibleGateway, ProviderSettings};
pub use storage::{AppwriteHistoryStore, StorageSettings};
