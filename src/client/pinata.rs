//! Pinata-backed storage client

use crate::client::config::StorageConfig;
use crate::client::StorageClient;
use crate::download::{retrieve_file, RetrieveOptions, RetrievedResponse};
use crate::error::{Result, StorageError};
use crate::types::{Cid, FileBlob};
use crate::upload::store_files;
use async_trait::async_trait;
use std::sync::Arc;
use std::time::Duration;

/// HTTP client for the Pinata pinning API and an IPFS gateway
///
/// Cloning is cheap and shares the underlying connection pool.
#[derive(Clone)]
pub struct PinataClient {
    http: reqwest::Client,
    config: Arc<StorageConfig>,
}

impl PinataClient {
    /// Create a new client from a validated configuration
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use ipfs_storage::{PinataClient, StorageConfig};
    ///
    /// let config = StorageConfig::from_env()?;
    /// let client = PinataClient::new(config)?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn new(config: StorageConfig) -> Result<Self> {
        config.validate()?;

        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout))
            .user_agent(concat!("ipfs-storage/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| StorageError::config_error(format!("Failed to build HTTP client: {}", e)))?;

        log::debug!(
            "Created pinning client (upload: {}, gateway: {}, timeout: {}s)",
            config.upload_endpoint,
            config.retrieval_gateway_root,
            config.timeout
        );

        Ok(Self {
            http,
            config: Arc::new(config),
        })
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    pub(crate) fn http(&self) -> &reqwest::Client {
        &self.http
    }

    /// Retrieve with explicit options, e.g. to observe download progress
    pub async fn retrieve_with(
        &self,
        cid: &Cid,
        options: RetrieveOptions,
    ) -> Result<RetrievedResponse> {
        retrieve_file(self, cid, options).await
    }
}

impl std::fmt::Debug for PinataClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PinataClient")
            .field("config", &self.config)
            .finish()
    }
}

#[async_trait]
impl StorageClient for PinataClient {
    async fn store(&self, files: &[FileBlob]) -> Result<Cid> {
        let pin = store_files(self, files).await?;
        Ok(Cid::new(pin.ipfs_hash))
    }

    async fn retrieve(&self, cid: &Cid) -> Result<RetrievedResponse> {
        retrieve_file(self, cid, RetrieveOptions::default()).await
    }
}
