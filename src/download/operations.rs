//! Retrieval operations against the IPFS gateway

use crate::client::PinataClient;
use crate::download::types::{DownloadProgress, RetrieveOptions, RetrievedResponse};
use crate::error::{Result, StorageError};
use crate::types::Cid;
use bytesize::ByteSize;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;

/// Upper bound on the buffer reserved up front from `Content-Length`
const MAX_PREALLOCATION: usize = 8 * 1024 * 1024;

/// Fetch the content behind `cid` from the retrieval gateway
///
/// The body is streamed; `options.on_progress` is called after every chunk.
///
/// # Errors
///
/// Returns an error if the gateway answers with a non-success status, or the
/// transport fails or times out while sending the request or reading the body.
pub async fn retrieve_file(
    client: &PinataClient,
    cid: &Cid,
    options: RetrieveOptions,
) -> Result<RetrievedResponse> {
    let url = client.config().retrieval_url(cid.as_str());

    log::debug!("Retrieving {} from {}", cid, url);

    let response = client
        .http()
        .get(&url)
        .send()
        .await
        .map_err(|e| StorageError::from_transport("retrieve", e))?;

    let status = response.status();
    if !status.is_success() {
        log::error!("Gateway answered retrieval of {} with status {}", cid, status);
        return Err(StorageError::retrieval_error(format!(
            "Gateway answered with status {}",
            status.as_u16()
        )));
    }

    let content_type = response
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    let content_length = response.content_length();
    let total_bytes = content_length.map(|len| usize::try_from(len).unwrap_or(usize::MAX));

    // Content-Length is untrusted; only use it as a bounded size hint
    let mut body = Vec::with_capacity(total_bytes.map_or(0, |len| len.min(MAX_PREALLOCATION)));
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk.map_err(|e| StorageError::from_transport("retrieve", e))?;
        body.extend_from_slice(&chunk);

        if let Some(ref callback) = options.on_progress {
            callback(DownloadProgress::new(body.len(), total_bytes));
        }
    }

    log::info!("Retrieved {} ({})", cid, ByteSize(body.len() as u64));

    Ok(RetrievedResponse {
        status: status.as_u16(),
        content_type,
        content_length,
        bytes: body.into(),
    })
}
