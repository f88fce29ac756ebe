//! In-memory [`StorageClient`] for exercising the workflow without a network
//!
//! Responses are queued per operation and returned in FIFO order. Every call
//! is recorded before it settles, and calls can be held pending until
//! [`MockStorageClient::release`] to observe the loading phase.

use crate::client::StorageClient;
use crate::download::RetrievedResponse;
use crate::error::{Result, StorageError};
use crate::types::{Cid, FileBlob};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;

/// Record of a call made to the mock client
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// Names of the files passed to `store`, in order
    Store(Vec<String>),
    Retrieve(Cid),
}

type SettleHook = Arc<dyn Fn() + Send + Sync>;

#[derive(Default)]
struct MockState {
    store_responses: VecDeque<Result<Cid>>,
    retrieve_responses: VecDeque<Result<RetrievedResponse>>,
    calls: Vec<MockCall>,
    on_settle: Option<SettleHook>,
}

#[derive(Clone)]
pub struct MockStorageClient {
    state: Arc<Mutex<MockState>>,
    held: Arc<watch::Sender<bool>>,
}

impl MockStorageClient {
    pub fn new() -> Self {
        let (held, _) = watch::channel(false);
        Self {
            state: Arc::new(Mutex::new(MockState::default())),
            held: Arc::new(held),
        }
    }

    /// Queue the outcome of the next `store` call
    pub fn push_store(&self, response: Result<Cid>) {
        self.lock().store_responses.push_back(response);
    }

    /// Queue the outcome of the next `retrieve` call
    pub fn push_retrieve(&self, response: Result<RetrievedResponse>) {
        self.lock().retrieve_responses.push_back(response);
    }

    /// Keep subsequent calls pending until [`release`](Self::release)
    pub fn hold(&self) {
        self.held.send_replace(true);
    }

    /// Let held calls settle
    pub fn release(&self) {
        self.held.send_replace(false);
    }

    /// Run `hook` inside every call, right before it returns its response
    pub fn on_settle<F>(&self, hook: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.lock().on_settle = Some(Arc::new(hook));
    }

    pub fn calls(&self) -> Vec<MockCall> {
        self.lock().calls.clone()
    }

    pub fn call_count(&self) -> usize {
        self.lock().calls.len()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    async fn wait_released(&self) {
        let mut held = self.held.subscribe();
        // The sender lives as long as `self`, so this cannot fail
        let _ = held.wait_for(|held| !*held).await;

        let hook = self.lock().on_settle.clone();
        if let Some(hook) = hook {
            hook();
        }
    }
}

impl Default for MockStorageClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl StorageClient for MockStorageClient {
    async fn store(&self, files: &[FileBlob]) -> Result<Cid> {
        self.lock().calls.push(MockCall::Store(
            files.iter().map(|f| f.name().to_string()).collect(),
        ));
        self.wait_released().await;

        self.lock()
            .store_responses
            .pop_front()
            .unwrap_or_else(|| Err(StorageError::upload_error("No mock store response queued")))
    }

    async fn retrieve(&self, cid: &Cid) -> Result<RetrievedResponse> {
        self.lock().calls.push(MockCall::Retrieve(cid.clone()));
        self.wait_released().await;

        self.lock().retrieve_responses.pop_front().unwrap_or_else(|| {
            Err(StorageError::retrieval_error(
                "No mock retrieve response queued",
            ))
        })
    }
}
