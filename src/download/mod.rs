//! Retrieval operations
//!
//! This module fetches pinned content back from an IPFS gateway.

pub mod operations;
pub mod types;

pub use operations::retrieve_file;
pub use types::{DownloadProgress, RetrieveOptions, RetrievedResponse};
