//! Upload operations against the pinning endpoint

use crate::client::PinataClient;
use crate::error::{Result, StorageError};
use crate::types::FileBlob;
use crate::upload::types::{PinResponse, API_KEY_HEADER, SECRET_KEY_HEADER, UPLOAD_FIELD_NAME};
use bytesize::ByteSize;
use reqwest::multipart::{Form, Part};

/// Pin one or more files with a single multipart request
///
/// Every file is attached under the `file` form field, in order, with its
/// name and MIME type.
///
/// # Errors
///
/// Returns an error if:
/// - `files` is empty
/// - a MIME type cannot be used as a part content type
/// - the service answers with a non-success status
/// - the response body has no `IpfsHash`
/// - the transport fails or the request times out
pub async fn store_files(client: &PinataClient, files: &[FileBlob]) -> Result<PinResponse> {
    if files.is_empty() {
        return Err(StorageError::invalid_parameter(
            "files",
            "At least one file must be provided",
        ));
    }

    let form = build_form(files)?;
    let total: usize = files.iter().map(FileBlob::size).sum();
    let config = client.config();

    log::debug!(
        "Uploading {} file(s), {} to {}",
        files.len(),
        ByteSize(total as u64),
        config.upload_endpoint
    );

    let response = client
        .http()
        .post(&config.upload_endpoint)
        .header(API_KEY_HEADER, &config.api_key)
        .header(SECRET_KEY_HEADER, &config.secret_key)
        .multipart(form)
        .send()
        .await
        .map_err(|e| StorageError::from_transport("upload", e))?;

    let status = response.status();
    if !status.is_success() {
        log::error!("Pinning service answered upload with status {}", status);
        return Err(StorageError::upload_error(format!(
            "Pinning service answered with status {}",
            status.as_u16()
        )));
    }

    let body = response
        .text()
        .await
        .map_err(|e| StorageError::from_transport("upload", e))?;
    let pin = parse_pin_response(&body)?;

    log::info!(
        "Pinned {} file(s) as {} ({})",
        files.len(),
        pin.ipfs_hash,
        ByteSize(pin.pin_size.unwrap_or(total as u64))
    );

    Ok(pin)
}

fn build_form(files: &[FileBlob]) -> Result<Form> {
    files.iter().try_fold(Form::new(), |form, file| {
        let body = reqwest::Body::from(file.bytes().clone());
        let part = Part::stream_with_length(body, file.size() as u64)
            .file_name(file.name().to_string())
            .mime_str(file.mime_type())
            .map_err(|_| {
                StorageError::invalid_parameter(
                    "mime_type",
                    format!("'{}' is not a valid MIME type", file.mime_type()),
                )
            })?;
        Ok(form.part(UPLOAD_FIELD_NAME, part))
    })
}

/// Parse the pinning service response into its typed contract
pub(crate) fn parse_pin_response(body: &str) -> Result<PinResponse> {
    let pin: PinResponse = serde_json::from_str(body)
        .map_err(|e| StorageError::parse_error(format!("Unexpected pin response: {}", e)))?;

    if pin.ipfs_hash.is_empty() {
        return Err(StorageError::parse_error("Pin response has an empty IpfsHash"));
    }

    Ok(pin)
}
