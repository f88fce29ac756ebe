pub mod client;
pub mod error;
#[cfg(any(test, feature = "testing"))]
pub mod testing;
pub mod types;

pub mod download;
pub mod upload;
pub mod workflow;

pub use client::{PinataClient, StorageClient, StorageConfig};

pub use download::{retrieve_file, DownloadProgress, RetrieveOptions, RetrievedResponse};

pub use error::{Result, StorageError};

pub use types::{sha256_hex, Cid, CidError, FileBlob};

pub use upload::{store_files, PinResponse};

pub use workflow::{
    ArtifactStore, RetrievedArtifact, WorkflowController, WorkflowState, MSG_NO_CID, MSG_NO_FILE,
    MSG_RETRIEVE_FAILED, MSG_UPLOAD_FAILED,
};
