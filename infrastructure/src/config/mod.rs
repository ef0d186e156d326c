//! Configuration loading for chat-relay
//!
//! This module handles file I/O and merging of configuration from multiple sources.
//! The priority order (highest to lowest):
//!
//! 1. Environment variables (`RELAY_*`, plus the deployment names such as
//!    `OPENAI_API_KEY` and `APPWRITE_DATABASE_ID`)
//! 2. `--config <path>` specified file
//! 3. Project root: `./chat-relay.toml`
//! 4. XDG config: `$XDG_CONFIG_HOME/chat-relay/config.toml`
//! 5. Default values
//!
//! Credentials have no defaults. A missing provider key fails at startup.

mod file_config;
mod loader;

pub use file_config::{
    ConfigValidationError, FileConfig, FileProviderConfig, FileServerConfig, FileStorageConfig,
};
pub use loader::ConfigLoader;
