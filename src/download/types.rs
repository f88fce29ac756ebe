//! Types for retrieval operations

use bytes::Bytes;
use std::sync::Arc;

/// Progress information for retrievals
#[derive(Debug, Clone)]
pub struct DownloadProgress {
    /// Number of bytes received so far
    pub bytes_downloaded: usize,
    /// Total number of bytes to download (if the gateway sent a length)
    pub total_bytes: Option<usize>,
    /// Progress percentage (0.0 to 1.0)
    pub percentage: f64,
}

impl DownloadProgress {
    /// Create new download progress
    pub fn new(bytes_downloaded: usize, total_bytes: Option<usize>) -> Self {
        let percentage = match total_bytes {
            Some(total) if total > 0 => bytes_downloaded as f64 / total as f64,
            _ => 0.0,
        };

        Self {
            bytes_downloaded,
            total_bytes,
            percentage: percentage.min(1.0),
        }
    }
}

/// Options for a retrieval
#[derive(Clone, Default)]
pub struct RetrieveOptions {
    /// Progress callback invoked for every received chunk
    pub on_progress: Option<Arc<dyn Fn(DownloadProgress) + Send + Sync>>,
}

impl std::fmt::Debug for RetrieveOptions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RetrieveOptions")
            .field("on_progress", &self.on_progress.is_some())
            .finish()
    }
}

impl RetrieveOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the progress callback
    pub fn on_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(DownloadProgress) + Send + Sync + 'static,
    {
        self.on_progress = Some(Arc::new(callback));
        self
    }
}

/// Raw gateway response: body bytes plus the metadata the gateway reported
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetrievedResponse {
    /// HTTP status code
    pub status: u16,
    /// `Content-Type` reported by the gateway
    pub content_type: Option<String>,
    /// `Content-Length` announced by the gateway, not necessarily the body size
    pub content_length: Option<u64>,
    /// Response body
    pub bytes: Bytes,
}

impl RetrievedResponse {
    pub fn new(bytes: impl Into<Bytes>) -> Self {
        Self {
            status: 200,
            content_type: None,
            content_length: None,
            bytes: bytes.into(),
        }
    }

    pub fn content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    pub fn size(&self) -> usize {
        self.bytes.len()
    }

    /// Consume the response and return its body
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_download_progress() {
        let progress = DownloadProgress::new(250, Some(1000));
        assert_eq!(progress.percentage, 0.25);

        let unknown = DownloadProgress::new(250, None);
        assert_eq!(unknown.percentage, 0.0);

        let overshoot = DownloadProgress::new(2000, Some(1000));
        assert_eq!(overshoot.percentage, 1.0);
    }

    #[test]
    fn test_retrieve_options_callback() {
        let seen = Arc::new(AtomicUsize::new(0));
        let seen_clone = seen.clone();
        let options = RetrieveOptions::new().on_progress(move |p| {
            seen_clone.store(p.bytes_downloaded, Ordering::SeqCst);
        });

        let callback = options.on_progress.as_ref().unwrap();
        callback(DownloadProgress::new(42, None));
        assert_eq!(seen.load(Ordering::SeqCst), 42);
        assert_eq!(format!("{:?}", options), "RetrieveOptions { on_progress: true }");
    }

    #[test]
    fn test_retrieved_response() {
        let response = RetrievedResponse::new(b"%PDF-".to_vec()).content_type("application/pdf");
        assert_eq!(response.size(), 5);
        assert_eq!(response.content_type.as_deref(), Some("application/pdf"));
        assert_eq!(response.content_length, None);
        assert_eq!(response.into_bytes().as_ref(), b"%PDF-");
    }
}
