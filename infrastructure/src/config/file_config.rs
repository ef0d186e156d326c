//! Raw configuration data types
//!
//! These structs represent the exact structure of the TOML config file (and
//! the environment overlay). They are deserialized directly and resolved into
//! adapter settings by [`FileConfig::provider_settings`] and
//! [`FileConfig::storage_settings`].

use crate::provider::ProviderSettings;
use crate::storage::StorageSettings;
use relay_domain::RequestDefaults;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;

/// Configuration validation errors
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigValidationError {
    #[error("{0} is required")]
    MissingCredential(&'static str),

    #[error("storage is partially configured, missing: {}", .0.join(", "))]
    PartialStorage(Vec<&'static str>),

    #[error("{0}.timeout_seconds cannot be 0")]
    InvalidTimeout(&'static str),
}

/// Raw HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileServerConfig {
    pub host: String,
    pub port: u16,
}

impl Default for FileServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
        }
    }
}

/// Raw completion provider configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileProviderConfig {
    /// API key sent as a bearer token (required)
    pub api_key: Option<String>,
    /// Base URL of the OpenAI-compatible API, e.g. `https://api.openai.com/v1` (required)
    pub base_url: Option<String>,
    /// Deadline for the initial response and for each streamed fragment
    pub timeout_seconds: u64,
}

impl Default for FileProviderConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            base_url: None,
            timeout_seconds: 120,
        }
    }
}

/// Raw document-store configuration
///
/// Persistence is enabled only when `api_key`, `database_id` and
/// `collection_id` are all set.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct FileStorageConfig {
    pub api_key: Option<String>,
    pub endpoint: String,
    pub database_id: Option<String>,
    pub collection_id: Option<String>,
    /// Sent as `X-Appwrite-Project` when set
    pub project_id: Option<String>,
    pub timeout_seconds: u64,
}

impl Default for FileStorageConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            endpoint: "https://cloud.appwrite.io/v1".to_string(),
            database_id: None,
            collection_id: None,
            project_id: None,
            timeout_seconds: 10,
        }
    }
}

/// Complete configuration file structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct FileConfig {
    pub server: FileServerConfig,
    pub provider: FileProviderConfig,
    /// Values applied to request fields the caller omits
    pub defaults: RequestDefaults,
    pub storage: FileStorageConfig,
}

fn present(value: &Option<String>) -> Option<&str> {
    value.as_deref().map(str::trim).filter(|v| !v.is_empty())
}

impl FileConfig {
    /// Validate the whole configuration.
    pub fn validate(&self) -> Result<(), ConfigValidationError> {
        self.provider_settings()?;
        self.storage_settings()?;
        Ok(())
    }

    /// Resolve provider settings. Both key and base URL must be given explicitly.
    pub fn provider_settings(&self) -> Result<ProviderSettings, ConfigValidationError> {
        let api_key = present(&self.provider.api_key)
            .ok_or(ConfigValidationError::MissingCredential("provider.api_key"))?;
        let base_url = present(&self.provider.base_url)
            .ok_or(ConfigValidationError::MissingCredential("provider.base_url"))?;
        if self.provider.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("provider"));
        }

        Ok(ProviderSettings {
            api_key: api_key.to_string(),
            base_url: base_url.to_string(),
            timeout: Duration::from_secs(self.provider.timeout_seconds),
        })
    }

    /// Resolve storage settings; `None` means persistence is disabled.
    pub fn storage_settings(&self) -> Result<Option<StorageSettings>, ConfigValidationError> {
        let storage = &self.storage;
        let fields = [
            ("storage.api_key", present(&storage.api_key)),
            ("storage.database_id", present(&storage.database_id)),
            ("storage.collection_id", present(&storage.collection_id)),
        ];

        let missing: Vec<&'static str> = fields
            .iter()
            .filter(|(_, value)| value.is_none())
            .map(|(name, _)| *name)
            .collect();

        if missing.len() == fields.len() {
            return Ok(None);
        }
        if !missing.is_empty() {
            return Err(ConfigValidationError::PartialStorage(missing));
        }
        if storage.timeout_seconds == 0 {
            return Err(ConfigValidationError::InvalidTimeout("storage"));
        }

        let [(_, Some(api_key)), (_, Some(database_id)), (_, Some(collection_id))] = fields
        else {
            return Ok(None);
        };

        Ok(Some(StorageSettings {
            api_key: api_key.to_string(),
            endpoint: storage.endpoint.trim_end_matches('/').to_string(),
            database_id: database_id.to_string(),
            collection_id: collection_id.to_string(),
            project_id: present(&storage.project_id).map(str::to_string),
            timeout: Duration::from_secs(storage.timeout_seconds),
        }))
    }
}
