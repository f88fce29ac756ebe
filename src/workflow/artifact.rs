//! Local, downloadable references to retrieved content
//!
//! Every retrieval materializes its bytes in an [`ArtifactStore`] under a
//! `blob:` URL. References are released explicitly with
//! [`ArtifactStore::revoke`].

use crate::types::sha256_hex;
use bytes::Bytes;
use std::collections::HashMap;

const URL_PREFIX: &str = "blob:ipfs-storage/";

/// Handle to retrieved content held in an [`ArtifactStore`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedArtifact {
    /// Local URL identifying the artifact in its store
    pub url: String,
    /// Content type reported by the gateway
    pub content_type: Option<String>,
    /// Size of the content in bytes
    pub size: usize,
    /// Hex encoded SHA-256 of the content
    pub sha256: String,
}

#[derive(Debug, Default)]
pub struct ArtifactStore {
    next_id: u64,
    entries: HashMap<String, Bytes>,
}

impl ArtifactStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Materialize `bytes` under a fresh URL
    pub fn create(&mut self, bytes: Bytes, content_type: Option<String>) -> RetrievedArtifact {
        self.next_id += 1;
        let url = format!("{}{}", URL_PREFIX, self.next_id);

        let artifact = RetrievedArtifact {
            url: url.clone(),
            content_type,
            size: bytes.len(),
            sha256: sha256_hex(&bytes),
        };

        self.entries.insert(url, bytes);
        artifact
    }

    /// Release the content behind `url`; returns false if it was not live
    pub fn revoke(&mut self, url: &str) -> bool {
        self.entries.remove(url).is_some()
    }

    /// Content behind a live URL
    pub fn get(&self, url: &str) -> Option<Bytes> {
        self.entries.get(url).cloned()
    }

    /// Number of live artifacts
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Release every artifact
    pub fn clear(&mut self) {
        self.entries.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_and_revoke() {
        let mut store = ArtifactStore::new();
        let artifact = store.create(Bytes::from_static(b"abc"), Some("text/plain".into()));

        assert!(artifact.url.starts_with("blob:"));
        assert_eq!(artifact.size, 3);
        assert_eq!(
            artifact.sha256,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
        assert_eq!(store.get(&artifact.url).unwrap().as_ref(), b"abc");

        assert!(store.revoke(&artifact.url));
        assert!(!store.revoke(&artifact.url));
        assert!(store.get(&artifact.url).is_none());
        assert!(store.is_empty());
    }

    #[test]
    fn test_urls_are_unique() {
        let mut store = ArtifactStore::new();
        let first = store.create(Bytes::from_static(b"same"), None);
        let second = store.create(Bytes::from_static(b"same"), None);

        assert_ne!(first.url, second.url);
        assert_eq!(first.sha256, second.sha256);
        assert_eq!(store.len(), 2);

        store.clear();
        assert!(store.is_empty());
    }
}
