//! Scripted port implementations for use case tests.

use crate::ports::completion_gateway::{CompletionGateway, FragmentStream, GatewayError};
use crate::ports::history_store::{HistoryStore, StoreError};
use async_trait::async_trait;
use relay_domain::{ChatTurnRecord, Completion, CompletionParams, UsageStats};
use std::collections::VecDeque;
use std::sync::Mutex;

/// One scripted answer for `complete_stream`.
pub(crate) enum StreamScript {
    /// The stream cannot be opened.
    OpenFails(GatewayError),
    /// The stream yields these items in order.
    Items(Vec<Result<String, GatewayError>>),
}

pub(crate) struct MockGateway {
    once: Mutex<VecDeque<Result<Completion, GatewayError>>>,
    streams: Mutex<VecDeque<StreamScript>>,
    seen: Mutex<Vec<CompletionParams>>,
}

impl MockGateway {
    pub(crate) fn new() -> Self {
        Self {
            once: Mutex::new(VecDeque::new()),
            streams: Mutex::new(VecDeque::new()),
            seen: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn with_completion(self, text: &str, usage: UsageStats) -> Self {
        self.once.lock().unwrap().push_back(Ok(Completion {
            text: text.to_string(),
            usage,
        }));
        self
    }

    pub(crate) fn with_completion_error(self, error: GatewayError) -> Self {
        self.once.lock().unwrap().push_back(Err(error));
        self
    }

    pub(crate) fn with_fragments(self, fragments: &[&str]) -> Self {
        let items = fragments.iter().map(|f| Ok(f.to_string())).collect();
        self.streams
            .lock()
            .unwrap()
            .push_back(StreamScript::Items(items));
        self
    }

    pub(crate) fn with_stream(self, script: StreamScript) -> Self {
        self.streams.lock().unwrap().push_back(script);
        self
    }

    pub(crate) fn seen(&self) -> Vec<CompletionParams> {
        self.seen.lock().unwrap().clone()
    }
}

#[async_trait]
impl CompletionGateway for MockGateway {
    async fn complete_once(&self, params: CompletionParams) -> Result<Completion, GatewayError> {
        self.seen.lock().unwrap().push(params);
        self.once
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(GatewayError::Connection("no scripted completion".into())))
    }

    async fn complete_stream(
        &self,
        params: CompletionParams,
    ) -> Result<FragmentStream, GatewayError> {
        self.seen.lock().unwrap().push(params);
        let script = self
            .streams
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(StreamScript::OpenFails(GatewayError::Connection(
                "no scripted stream".into(),
            )));
        match script {
            StreamScript::OpenFails(e) => Err(e),
            StreamScript::Items(items) => Ok(Box::pin(futures::stream::iter(items))),
        }
    }
}

pub(crate) struct MockStore {
    fail: bool,
    attempts: Mutex<usize>,
    records: Mutex<Vec<ChatTurnRecord>>,
}

impl MockStore {
    pub(crate) fn new() -> Self {
        Self {
            fail: false,
            attempts: Mutex::new(0),
            records: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn failing() -> Self {
        Self {
            fail: true,
            ..Self::new()
        }
    }

    pub(crate) fn records(&self) -> Vec<ChatTurnRecord> {
        self.records.lock().unwrap().clone()
    }

    pub(crate) fn attempts(&self) -> usize {
        *self.attempts.lock().unwrap()
    }
}

#[async_trait]
impl HistoryStore for MockStore {
    async fn create_record(&self, record: &ChatTurnRecord) -> Result<String, StoreError> {
        let attempt = {
            let mut attempts = self.attempts.lock().unwrap();
            *attempts += 1;
            *attempts
        };
        if self.fail {
            return Err(StoreError::Api {
                status: 503,
                message: "store unavailable".to_string(),
            });
        }
        self.records.lock().unwrap().push(record.clone());
        Ok(format!("doc-{attempt}"))
    }
}
