//! Multipart file-field reading shared by resume and profile-image uploads.

use axum::extract::multipart::{Multipart, MultipartError, MultipartRejection};
use axum::http::StatusCode;
use bytes::Bytes;
use tracing::warn;

use crate::errors::AppError;
use crate::storage::DocumentStore;

/// One file pulled out of a multipart body.
#[derive(Debug, Clone)]
pub struct UploadedFile {
    pub file_name: String,
    pub content_type: Option<String>,
    pub bytes: Bytes,
}

impl From<MultipartRejection> for AppError {
    fn from(rejection: MultipartRejection) -> Self {
        AppError::Validation(rejection.body_text())
    }
}

impl From<MultipartError> for AppError {
    fn from(e: MultipartError) -> Self {
        if e.status() == StatusCode::PAYLOAD_TOO_LARGE {
            AppError::PayloadTooLarge(e.body_text())
        } else {
            AppError::Validation(e.body_text())
        }
    }
}

/// Returns the first field named `field_name`, skipping any others.
/// Empty files count as missing.
pub async fn read_file_field(
    multipart: Result<Multipart, MultipartRejection>,
    field_name: &str,
    default_file_name: &str,
) -> Result<Option<UploadedFile>, AppError> {
    let mut multipart = multipart?;

    while let Some(field) = multipart.next_field().await? {
        if field.name() != Some(field_name) {
            continue;
        }

        let file_name = field
            .file_name()
            .map(str::trim)
            .filter(|n| !n.is_empty())
            .unwrap_or(default_file_name)
            .to_string();
        let content_type = field.content_type().map(str::to_string);
        let bytes = field.bytes().await?;

        if bytes.is_empty() {
            return Ok(None);
        }

        return Ok(Some(UploadedFile {
            file_name,
            content_type,
            bytes,
        }));
    }

    Ok(None)
}

/// Removes an object whose record could not be saved. Failures are only logged.
pub async fn discard_upload(storage: &dyn DocumentStore, key: &str) {
    if let Err(e) = storage.delete(key).await {
        warn!("Failed to remove orphaned upload {key}: {e}");
    }
}
