//! Type-safe wrappers for content identifiers and file blobs

use crate::error::Result;
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt::{self, Display, Formatter};
use std::path::Path;
use std::str::FromStr;

/// MIME type used when nothing better can be guessed
pub const DEFAULT_MIME_TYPE: &str = "application/octet-stream";

/// Content Identifier (CID) returned by the pinning service
///
/// The identifier is opaque: CIDv0 (`Qm...`) and CIDv1 (`bafy...`) values are
/// both accepted. An empty CID means "none yet".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cid(String);

impl Cid {
    /// Creates a new CID from a string without validation
    ///
    /// Use `from_str()` for validated CID creation.
    pub fn new(cid: impl Into<String>) -> Self {
        Self(cid.into())
    }

    /// Returns the CID as a string slice
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the "none yet" identifier
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Consumes the CID and returns the inner String
    pub fn into_string(self) -> String {
        self.0
    }
}

impl FromStr for Cid {
    type Err = CidError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        if s.is_empty() {
            return Err(CidError::Empty);
        }

        // The CID is appended to gateway URLs as a single path segment
        if s
            .chars()
            .any(|c| c.is_whitespace() || matches!(c, '/' | '?' | '#'))
        {
            return Err(CidError::InvalidFormat(format!(
                "'{}' is not a single path segment",
                s
            )));
        }

        Ok(Cid(s.to_string()))
    }
}

impl Display for Cid {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<String> for Cid {
    fn from(s: String) -> Self {
        Self(s)
    }
}

impl From<&str> for Cid {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<Cid> for String {
    fn from(cid: Cid) -> Self {
        cid.0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CidError {
    Empty,
    InvalidFormat(String),
}

impl fmt::Display for CidError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            CidError::Empty => write!(f, "CID cannot be empty"),
            CidError::InvalidFormat(msg) => write!(f, "Invalid CID format: {}", msg),
        }
    }
}

impl std::error::Error for CidError {}

/// An in-memory file chosen by the user
///
/// Cloning is cheap; the content is reference counted.
#[derive(Clone, PartialEq, Eq)]
pub struct FileBlob {
    name: String,
    bytes: Bytes,
    mime_type: String,
}

impl FileBlob {
    /// Create a blob from a name and its content, guessing the MIME type
    /// from the file extension
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        let name = name.into();
        let mime_type = mime_guess::from_path(&name)
            .first_raw()
            .unwrap_or(DEFAULT_MIME_TYPE)
            .to_string();

        Self {
            name,
            bytes: bytes.into(),
            mime_type,
        }
    }

    /// Read a blob from the filesystem
    pub async fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path).await?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "file".to_string());

        Ok(Self::new(name, bytes))
    }

    /// Override the guessed MIME type
    pub fn with_mime_type(mut self, mime_type: impl Into<String>) -> Self {
        self.mime_type = mime_type.into();
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    pub fn mime_type(&self) -> &str {
        &self.mime_type
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Hex encoded SHA-256 of the content
    pub fn sha256(&self) -> String {
        sha256_hex(&self.bytes)
    }
}

impl fmt::Debug for FileBlob {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("FileBlob")
            .field("name", &self.name)
            .field("size", &self.bytes.len())
            .field("mime_type", &self.mime_type)
            .finish()
    }
}

/// Hex encoded SHA-256 digest of `bytes`
pub fn sha256_hex(bytes: &[u8]) -> String {
    format!("{:x}", Sha256::digest(bytes))
}
