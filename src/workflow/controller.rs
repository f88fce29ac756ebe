//! Upload/retrieve workflow controller
//!
//! The controller owns the [`WorkflowState`] and turns user actions into
//! storage client calls. Failures never escape it: they are logged and
//! converted into a short user-facing message.

use crate::client::{PinataClient, StorageClient, StorageConfig};
use crate::error::{Result, StorageError};
use crate::types::{Cid, FileBlob};
use crate::workflow::artifact::ArtifactStore;
use crate::workflow::state::{
    WorkflowState, MSG_NO_CID, MSG_NO_FILE, MSG_RETRIEVE_FAILED, MSG_UPLOAD_FAILED,
};
use bytes::Bytes;
use std::path::Path;
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::watch;
use tokio_util::sync::CancellationToken;

/// Single-screen state machine driving a [`StorageClient`]
///
/// Actions take `&self`, so the controller can be shared (e.g. in an `Arc`)
/// while a presentation layer observes it through [`subscribe`].
///
/// [`subscribe`]: WorkflowController::subscribe
pub struct WorkflowController<C> {
    client: C,
    public_gateway_root: String,
    state: watch::Sender<WorkflowState>,
    artifacts: Mutex<ArtifactStore>,
    session: CancellationToken,
    actions: Mutex<CancellationToken>,
}

impl WorkflowController<PinataClient> {
    /// Create a controller backed by the Pinata client
    pub fn from_config(config: StorageConfig) -> Result<Self> {
        let public_gateway_root = config.public_gateway_root.clone();
        let client = PinataClient::new(config)?;
        Ok(Self::new(client, public_gateway_root))
    }
}

impl<C: StorageClient> WorkflowController<C> {
    /// Create a controller; links shown to the user are built from
    /// `public_gateway_root`
    pub fn new(client: C, public_gateway_root: impl Into<String>) -> Self {
        let (state, _) = watch::channel(WorkflowState::default());
        let session = CancellationToken::new();
        let actions = Mutex::new(session.child_token());

        Self {
            client,
            public_gateway_root: public_gateway_root.into(),
            state,
            artifacts: Mutex::new(ArtifactStore::new()),
            session,
            actions,
        }
    }

    pub fn client(&self) -> &C {
        &self.client
    }

    /// Snapshot of the current state
    pub fn state(&self) -> WorkflowState {
        self.state.borrow().clone()
    }

    /// Observe every state transition
    pub fn subscribe(&self) -> watch::Receiver<WorkflowState> {
        self.state.subscribe()
    }

    /// Replace the selected file and clear any error
    pub fn select_file(&self, file: FileBlob) {
        log::debug!("Selected {:?}", file);
        self.state.send_modify(|state| {
            state.selected_file = Some(file);
            state.error_message.clear();
        });
    }

    /// Pin the selected file and remember its CID
    pub async fn upload(&self) {
        let selected = self.state.borrow().selected_file.clone();
        let Some(file) = selected else {
            self.set_error(MSG_NO_FILE);
            return;
        };

        let token = self.begin();
        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.client.store(std::slice::from_ref(&file)) => Some(result),
        };

        self.state.send_modify(|state| {
            // reset() cancels before clearing state, so a cancelled token here
            // means the result belongs to a state that no longer exists
            match outcome.filter(|_| !token.is_cancelled()) {
                Some(Ok(cid)) => {
                    log::info!("Uploaded {} as {}", file.name(), cid);
                    state.cid = cid;
                }
                Some(Err(err)) => {
                    log::error!("Error storing {}: {}", file.name(), err);
                    state.error_message = MSG_UPLOAD_FAILED.to_string();
                }
                None => log::warn!("Upload of {} cancelled", file.name()),
            }
            state.is_loading = false;
        });
    }

    /// Fetch the content of the current CID into a fresh artifact
    ///
    /// Every call hits the network; the previous artifact is released once
    /// the new one exists.
    pub async fn retrieve(&self) {
        let cid: Cid = self.state.borrow().cid.clone();
        if cid.is_empty() {
            self.set_error(MSG_NO_CID);
            return;
        }

        let token = self.begin();
        let outcome = tokio::select! {
            biased;
            _ = token.cancelled() => None,
            result = self.client.retrieve(&cid) => Some(result),
        };

        let mut artifacts = lock(&self.artifacts);
        self.state.send_modify(|state| {
            match outcome.filter(|_| !token.is_cancelled()) {
                Some(Ok(response)) => {
                    let artifact = artifacts.create(response.bytes, response.content_type);
                    log::info!("Retrieved {} into {}", cid, artifact.url);
                    if let Some(previous) = state.retrieved.replace(artifact) {
                        artifacts.revoke(&previous.url);
                    }
                }
                Some(Err(err)) => {
                    log::error!("Error retrieving {}: {}", cid, err);
                    state.error_message = MSG_RETRIEVE_FAILED.to_string();
                }
                None => log::warn!("Retrieval of {} cancelled", cid),
            }
            state.is_loading = false;
        });
    }

    /// Cancel every action in flight; they settle without an error message
    pub fn cancel(&self) {
        let mut actions = lock(&self.actions);
        actions.cancel();
        *actions = self.session.child_token();
    }

    /// Cancel pending work, release artifacts and start over
    pub fn reset(&self) {
        self.cancel();

        let mut artifacts = lock(&self.artifacts);
        artifacts.clear();
        self.state.send_modify(|state| *state = WorkflowState::default());
    }

    /// Shareable gateway link for the uploaded content
    pub fn upload_link(&self) -> Option<String> {
        let state = self.state.borrow();
        if state.cid.is_empty() {
            None
        } else {
            Some(format!("{}{}", self.public_gateway_root, state.cid))
        }
    }

    /// Label of the download affordance
    pub fn download_label(&self) -> Option<String> {
        self.state.borrow().download_label()
    }

    /// Bytes of the current artifact
    pub fn artifact_bytes(&self) -> Option<Bytes> {
        let url = self.state.borrow().retrieved.as_ref()?.url.clone();
        lock(&self.artifacts).get(&url)
    }

    /// Number of artifacts not yet released
    pub fn live_artifacts(&self) -> usize {
        lock(&self.artifacts).len()
    }

    /// Write the current artifact to `path`, returning the number of bytes
    pub async fn save_artifact(&self, path: impl AsRef<Path>) -> Result<usize> {
        let bytes = self.artifact_bytes().ok_or_else(|| {
            StorageError::invalid_parameter("artifact", "Nothing has been retrieved yet")
        })?;

        tokio::fs::write(path.as_ref(), &bytes).await?;
        log::debug!("Saved artifact to {}", path.as_ref().display());
        Ok(bytes.len())
    }

    fn begin(&self) -> CancellationToken {
        self.state.send_modify(|state| {
            state.is_loading = true;
            state.error_message.clear();
        });
        lock(&self.actions).clone()
    }

    fn set_error(&self, message: &str) {
        log::debug!("Rejected action: {}", message);
        self.state
            .send_modify(|state| state.error_message = message.to_string());
    }
}

impl<C> Drop for WorkflowController<C> {
    fn drop(&mut self) {
        self.session.cancel();
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}
