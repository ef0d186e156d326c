//! History store adapters.
//!
//! [`AppwriteHistoryStore`] implements the
//! [`HistoryStore`](relay_application::HistoryStore) port with the Appwrite
//! Databases REST API.

mod appwrite;

pub use appwrite::{AppwriteHistoryStore, StorageSettings};
