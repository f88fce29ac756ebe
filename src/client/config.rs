//! Client configuration for the pinning service and gateways

use crate::error::{Result, StorageError};
use serde::{Deserialize, Serialize};
use std::path::Path;

pub const DEFAULT_UPLOAD_ENDPOINT: &str = "https://api.pinata.cloud/pinning/pinFileToIPFS";
pub const DEFAULT_RETRIEVAL_GATEWAY_ROOT: &str = "https://gateway.pinata.cloud/ipfs/";
pub const DEFAULT_PUBLIC_GATEWAY_ROOT: &str = "https://ipfs.io/ipfs/";

/// Default request timeout in seconds (5 minutes)
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

pub const ENV_API_KEY: &str = "PINATA_API_KEY";
pub const ENV_SECRET_KEY: &str = "PINATA_SECRET_API_KEY";
pub const ENV_UPLOAD_ENDPOINT: &str = "IPFS_STORAGE_UPLOAD_ENDPOINT";
pub const ENV_RETRIEVAL_GATEWAY: &str = "IPFS_STORAGE_RETRIEVAL_GATEWAY";
pub const ENV_PUBLIC_GATEWAY: &str = "IPFS_STORAGE_PUBLIC_GATEWAY";

fn default_upload_endpoint() -> String {
    DEFAULT_UPLOAD_ENDPOINT.to_string()
}

fn default_retrieval_gateway_root() -> String {
    DEFAULT_RETRIEVAL_GATEWAY_ROOT.to_string()
}

fn default_public_gateway_root() -> String {
    DEFAULT_PUBLIC_GATEWAY_ROOT.to_string()
}

fn default_timeout() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

/// Configuration for a [`PinataClient`](crate::PinataClient)
///
/// Credentials are never serialized and never appear in `Debug` output.
#[derive(Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    /// Pinning endpoint receiving multipart uploads
    #[serde(rename = "upload-endpoint", default = "default_upload_endpoint")]
    pub upload_endpoint: String,

    /// Gateway root used to fetch content back, the CID is appended to it
    #[serde(
        rename = "retrieval-gateway-root",
        default = "default_retrieval_gateway_root"
    )]
    pub retrieval_gateway_root: String,

    /// Gateway root used for shareable links shown to the user
    #[serde(
        rename = "public-gateway-root",
        default = "default_public_gateway_root"
    )]
    pub public_gateway_root: String,

    /// Pinning service API key
    #[serde(rename = "api-key", default, skip_serializing)]
    pub api_key: String,

    /// Pinning service secret key
    #[serde(rename = "secret-key", default, skip_serializing)]
    pub secret_key: String,

    /// Request timeout in seconds
    #[serde(rename = "timeout", default = "default_timeout")]
    pub timeout: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            upload_endpoint: default_upload_endpoint(),
            retrieval_gateway_root: default_retrieval_gateway_root(),
            public_gateway_root: default_public_gateway_root(),
            api_key: String::new(),
            secret_key: String::new(),
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}

impl std::fmt::Debug for StorageConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StorageConfig")
            .field("upload_endpoint", &self.upload_endpoint)
            .field("retrieval_gateway_root", &self.retrieval_gateway_root)
            .field("public_gateway_root", &self.public_gateway_root)
            .field("api_key", &redact(&self.api_key))
            .field("secret_key", &redact(&self.secret_key))
            .field("timeout", &self.timeout)
            .finish()
    }
}

fn redact(secret: &str) -> &'static str {
    if secret.is_empty() {
        "<unset>"
    } else {
        "<redacted>"
    }
}

impl StorageConfig {
    /// Create a configuration with the default endpoints and no credentials
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a configuration from the process environment
    ///
    /// `PINATA_API_KEY` and `PINATA_SECRET_API_KEY` are required; endpoint
    /// overrides are optional.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a configuration from an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let required = |key: &str| {
            lookup(key)
                .filter(|v| !v.is_empty())
                .ok_or_else(|| StorageError::config_error(format!("{} is not set", key)))
        };

        let mut config = Self::new().credentials(required(ENV_API_KEY)?, required(ENV_SECRET_KEY)?);

        if let Some(endpoint) = lookup(ENV_UPLOAD_ENDPOINT) {
            config = config.upload_endpoint(endpoint);
        }
        if let Some(root) = lookup(ENV_RETRIEVAL_GATEWAY) {
            config = config.retrieval_gateway_root(root);
        }
        if let Some(root) = lookup(ENV_PUBLIC_GATEWAY) {
            config = config.public_gateway_root(root);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the upload endpoint
    pub fn upload_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.upload_endpoint = endpoint.into();
        self
    }

    /// Set the retrieval gateway root
    pub fn retrieval_gateway_root(mut self, root: impl Into<String>) -> Self {
        self.retrieval_gateway_root = normalize_root(root.into());
        self
    }

    /// Set the public gateway root
    pub fn public_gateway_root(mut self, root: impl Into<String>) -> Self {
        self.public_gateway_root = normalize_root(root.into());
        self
    }

    /// Set the API and secret keys
    pub fn credentials(mut self, api_key: impl Into<String>, secret_key: impl Into<String>) -> Self {
        self.api_key = api_key.into();
        self.secret_key = secret_key.into();
        self
    }

    /// Set the request timeout in seconds
    pub fn timeout(mut self, timeout: u64) -> Self {
        self.timeout = timeout;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.upload_endpoint.trim().is_empty() {
            return Err(StorageError::invalid_parameter(
                "upload_endpoint",
                "Upload endpoint cannot be empty",
            ));
        }

        if self.retrieval_gateway_root.trim().is_empty() {
            return Err(StorageError::invalid_parameter(
                "retrieval_gateway_root",
                "Retrieval gateway root cannot be empty",
            ));
        }

        if self.public_gateway_root.trim().is_empty() {
            return Err(StorageError::invalid_parameter(
                "public_gateway_root",
                "Public gateway root cannot be empty",
            ));
        }

        if self.api_key.is_empty() || self.secret_key.is_empty() {
            return Err(StorageError::config_error(
                "Both the API key and the secret key must be provided",
            ));
        }

        if self.timeout == 0 {
            return Err(StorageError::invalid_parameter(
                "timeout",
                "Timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    /// URL the gateway serves `cid` from
    pub fn retrieval_url(&self, cid: &str) -> String {
        format!("{}{}", self.retrieval_gateway_root, cid)
    }

    /// Shareable link for `cid`
    pub fn public_link(&self, cid: &str) -> String {
        format!("{}{}", self.public_gateway_root, cid)
    }

    /// Convert the configuration to a JSON string (credentials omitted)
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(StorageError::from)
    }

    /// Create a configuration from a JSON string
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json).map_err(StorageError::from)?;
        Ok(config.normalized())
    }

    /// Load a configuration from a JSON file
    ///
    /// Credentials missing from the file are taken from the environment.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let mut config = Self::from_json(&json)?;

        if config.api_key.is_empty() {
            config.api_key = std::env::var(ENV_API_KEY).unwrap_or_default();
        }
        if config.secret_key.is_empty() {
            config.secret_key = std::env::var(ENV_SECRET_KEY).unwrap_or_default();
        }

        Ok(config)
    }

    fn normalized(mut self) -> Self {
        self.retrieval_gateway_root = normalize_root(self.retrieval_gateway_root);
        self.public_gateway_root = normalize_root(self.public_gateway_root);
        self
    }
}

fn normalize_root(mut root: String) -> String {
    if !root.is_empty() && !root.ends_with('/') {
        root.push('/');
    }
    root
}
