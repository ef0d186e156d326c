//! Appwrite document store adapter
//!
//! Each turn becomes one document in a fixed collection:
//! `POST {endpoint}/databases/{database}/collections/{collection}/documents`
//! with `documentId` set to `unique()` so Appwrite assigns the identifier.

use async_trait::async_trait;
use relay_application::{HistoryStore, StoreError};
use relay_domain::ChatTurnRecord;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const UNIQUE_DOCUMENT_ID: &str = "unique()";

/// Resolved document store settings.
#[derive(Debug, Clone, PartialEq)]
pub struct StorageSettings {
    pub api_key: String,
    /// API root, e.g. `https://cloud.appwrite.io/v1` (no trailing slash)
    pub endpoint: String,
    pub database_id: String,
    pub collection_id: String,
    pub project_id: Option<String>,
    pub timeout: Duration,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CreateDocumentBody<'a> {
    document_id: &'a str,
    data: &'a ChatTurnRecord,
}

#[derive(Deserialize)]
struct CreatedDocument {
    #[serde(rename = "$id")]
    id: String,
}

#[derive(Deserialize)]
struct AppwriteErrorBody {
    message: String,
}

/// [`HistoryStore`] that writes documents through the Appwrite REST API.
pub struct AppwriteHistoryStore {
    client: reqwest::Client,
    documents_url: String,
    api_key: String,
    project_id: Option<String>,
}

impl AppwriteHistoryStore {
    pub fn new(settings: StorageSettings) -> Result<Self, StoreError> {
        let client = reqwest::Client::builder()
            .timeout(settings.timeout)
            .build()
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let documents_url = format!(
            "{}/databases/{}/collections/{}/documents",
            settings.endpoint, settings.database_id, settings.collection_id
        );
        info!(
            database = %settings.database_id,
            collection = %settings.collection_id,
            "History store configured"
        );

        Ok(Self {
            client,
            documents_url,
            api_key: settings.api_key,
            project_id: settings.project_id,
        })
    }
}

#[async_trait]
impl HistoryStore for AppwriteHistoryStore {
    async fn create_record(&self, record: &ChatTurnRecord) -> Result<String, StoreError> {
        let body = CreateDocumentBody {
            document_id: UNIQUE_DOCUMENT_ID,
            data: record,
        };

        let mut request = self
            .client
            .post(&self.documents_url)
            .header("X-Appwrite-Key", &self.api_key)
            .json(&body);
        if let Some(project_id) = &self.project_id {
            request = request.header("X-Appwrite-Project", project_id);
        }

        let response = request
            .send()
            .await
            .map_err(|e| StoreError::Connection(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<AppwriteErrorBody>(&text)
                .map(|b| b.message)
                .unwrap_or_else(|_| text.trim().to_string());
            return Err(StoreError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let created: CreatedDocument = response
            .json()
            .await
            .map_err(|e| StoreError::Parse(e.to_string()))?;

        debug!(document_id = %created.id, "Created history document");
        Ok(created.id)
    }
}
