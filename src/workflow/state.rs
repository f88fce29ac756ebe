use crate::types::{Cid, FileBlob};
use crate::workflow::artifact::RetrievedArtifact;

pub const MSG_NO_FILE: &str = "Please select a file first";
pub const MSG_NO_CID: &str = "No CID available";
pub const MSG_UPLOAD_FAILED: &str = "Failed to upload file to IPFS";
pub const MSG_RETRIEVE_FAILED: &str = "Failed to retrieve file from IPFS";

/// Label of the download affordance when no file name is known
pub const DEFAULT_DOWNLOAD_LABEL: &str = "Download File";

/// Everything the presentation layer renders
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WorkflowState {
    pub selected_file: Option<FileBlob>,
    /// Empty until an upload succeeds
    pub cid: Cid,
    pub retrieved: Option<RetrievedArtifact>,
    pub is_loading: bool,
    /// Empty when there is nothing to report
    pub error_message: String,
}

impl WorkflowState {
    pub fn has_error(&self) -> bool {
        !self.error_message.is_empty()
    }

    /// Whether the upload control should be enabled
    pub fn can_upload(&self) -> bool {
        self.selected_file.is_some() && !self.is_loading
    }

    /// Whether the retrieve control should be enabled
    pub fn can_retrieve(&self) -> bool {
        !self.cid.is_empty() && !self.is_loading
    }

    /// Label of the download affordance, `None` until something was retrieved
    pub fn download_label(&self) -> Option<String> {
        self.retrieved.as_ref().map(|_| {
            self.selected_file
                .as_ref()
                .map(|file| file.name().to_string())
                .unwrap_or_else(|| DEFAULT_DOWNLOAD_LABEL.to_string())
        })
    }
}
