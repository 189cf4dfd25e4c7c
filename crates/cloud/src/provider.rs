//! The image host contract.

use async_trait::async_trait;
use flicker_core::presets::Transformation;
use serde::Serialize;

use crate::error::CloudError;

/// Path segment that precedes transformations in a delivery URL.
const UPLOAD_SEGMENT: &str = "/upload/";

/// Flag that makes the host serve a file as an attachment.
pub const ATTACHMENT_FLAG: &str = "fl_attachment";

/// Options for a single upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadOptions {
    /// Remote folder the asset is stored under; `None` uses the host's
    /// configured folder.
    pub folder: Option<String>,
    /// Quality directive applied on ingest, e.g. `auto:best`.
    pub quality: Option<String>,
}

/// What the host reports after a successful upload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadedAsset {
    /// Host-side identifier (`public_id`), used for transformations and deletion.
    pub storage_id: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    /// Stored size in bytes.
    pub bytes: i64,
    /// File format as reported by the host, e.g. `jpg`.
    pub format: String,
    /// HTTPS URL of the original.
    pub secure_url: String,
}

/// An image hosting and transformation service.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload encoded image bytes.
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, CloudError>;

    /// Delete a stored asset. Deleting an asset that no longer exists is not
    /// an error.
    async fn destroy(&self, storage_id: &str) -> Result<(), CloudError>;

    /// Fetch the bytes behind a delivery URL.
    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CloudError>;

    /// Delivery URL for an asset with a chain of transformations applied.
    fn transformation_url(
        &self,
        storage_id: &str,
        transformations: &[Transformation],
        attachment: bool,
    ) -> String;

    /// Rewrite an original delivery URL so the host serves it as an
    /// attachment. URLs without an upload segment are returned unchanged.
    fn attachment_url(&self, original: &str) -> String {
        attachment_url(original)
    }
}

/// Insert the attachment flag after the first `/upload/` segment.
pub fn attachment_url(original: &str) -> String {
    match original.split_once(UPLOAD_SEGMENT) {
        Some((head, tail)) => format!("{head}{UPLOAD_SEGMENT}{ATTACHMENT_FLAG}/{tail}"),
        None => original.to_string(),
    }
}
