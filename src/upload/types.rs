use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Form field every uploaded file is attached under
pub const UPLOAD_FIELD_NAME: &str = "file";

/// Header carrying the pinning service API key
pub const API_KEY_HEADER: &str = "pinata_api_key";

/// Header carrying the pinning service secret key
pub const SECRET_KEY_HEADER: &str = "pinata_secret_api_key";

/// Successful response of the pinning endpoint
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PinResponse {
    #[serde(rename = "IpfsHash")]
    pub ipfs_hash: String,
    #[serde(rename = "PinSize", default, skip_serializing_if = "Option::is_none")]
    pub pin_size: Option<u64>,
    #[serde(rename = "Timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<DateTime<Utc>>,
    #[serde(rename = "isDuplicate", default, skip_serializing_if = "Option::is_none")]
    pub is_duplicate: Option<bool>,
}
