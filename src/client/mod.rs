//! Storage client for the pinning service
//!
//! [`StorageClient`] is the seam between the workflow controller and the
//! network. [`PinataClient`] is the production implementation.

pub mod config;
pub mod pinata;

use crate::download::RetrievedResponse;
use crate::error::Result;
use crate::types::{Cid, FileBlob};
use async_trait::async_trait;

pub use config::StorageConfig;
pub use pinata::PinataClient;

/// The two network operations the workflow depends on
#[async_trait]
pub trait StorageClient: Send + Sync {
    /// Pin `files` and return the CID of the upload
    ///
    /// # Errors
    ///
    /// Returns an error if `files` is empty, the service answers with a
    /// non-success status, the response lacks a CID, or the transport fails.
    async fn store(&self, files: &[FileBlob]) -> Result<Cid>;

    /// Fetch previously pinned content by its CID
    ///
    /// The CID is not validated here; an empty or unknown CID is sent to the
    /// gateway as is.
    async fn retrieve(&self, cid: &Cid) -> Result<RetrievedResponse>;
}
