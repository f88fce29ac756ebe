//! Upload/retrieve workflow
//!
//! This module holds the single-screen state machine, its observable state
//! and the store of locally materialized retrievals.

pub mod artifact;
pub mod controller;
pub mod state;

pub use artifact::{ArtifactStore, RetrievedArtifact};
pub use controller::WorkflowController;
pub use state::{
    WorkflowState, DEFAULT_DOWNLOAD_LABEL, MSG_NO_CID, MSG_NO_FILE, MSG_RETRIEVE_FAILED,
    MSG_UPLOAD_FAILED,
};
