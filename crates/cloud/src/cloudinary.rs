//! Cloudinary implementation of [`ImageHost`].
//!
//! Uploads and deletions go through the signed REST API; delivery URLs are
//! built locally from the cloud name and transformation chain.

use std::collections::BTreeMap;

use async_trait::async_trait;
use flicker_core::presets::{Crop, Transformation};
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::error::CloudError;
use crate::provider::{ImageHost, UploadOptions, UploadedAsset, ATTACHMENT_FLAG};

/// Default REST API base.
pub const DEFAULT_API_BASE: &str = "https://api.cloudinary.com";

/// Default delivery base.
pub const DEFAULT_DELIVERY_BASE: &str = "https://res.cloudinary.com";

/// Default remote folder for uploads.
pub const DEFAULT_UPLOAD_FOLDER: &str = "wallpapers";

/// Cloudinary account configuration.
#[derive(Debug, Clone)]
pub struct CloudinaryConfig {
    pub cloud_name: String,
    pub api_key: String,
    pub api_secret: String,
    /// Folder new uploads are placed in (default: `wallpapers`).
    pub upload_folder: String,
    /// REST API base (default: `https://api.cloudinary.com`).
    pub api_base: String,
    /// Delivery base for generated URLs.
    pub delivery_base: String,
}

impl CloudinaryConfig {
    /// Load configuration from environment variables.
    ///
    /// | Env Var                    | Default                      |
    /// |----------------------------|------------------------------|
    /// | `CLOUDINARY_CLOUD_NAME`    | required                     |
    /// | `CLOUDINARY_API_KEY`       | required                     |
    /// | `CLOUDINARY_API_SECRET`    | required                     |
    /// | `CLOUDINARY_UPLOAD_FOLDER` | `wallpapers`                 |
    /// | `CLOUDINARY_API_BASE`      | `https://api.cloudinary.com` |
    pub fn from_env() -> Self {
        let cloud_name =
            std::env::var("CLOUDINARY_CLOUD_NAME").expect("CLOUDINARY_CLOUD_NAME must be set");
        let api_key = std::env::var("CLOUDINARY_API_KEY").expect("CLOUDINARY_API_KEY must be set");
        let api_secret =
            std::env::var("CLOUDINARY_API_SECRET").expect("CLOUDINARY_API_SECRET must be set");
        let upload_folder = std::env::var("CLOUDINARY_UPLOAD_FOLDER")
            .unwrap_or_else(|_| DEFAULT_UPLOAD_FOLDER.into());
        let api_base =
            std::env::var("CLOUDINARY_API_BASE").unwrap_or_else(|_| DEFAULT_API_BASE.into());

        Self {
            cloud_name,
            api_key,
            api_secret,
            upload_folder,
            api_base: api_base.trim_end_matches('/').to_string(),
            delivery_base: DEFAULT_DELIVERY_BASE.to_string(),
        }
    }
}

/// Response of the upload endpoint (subset).
#[derive(Debug, Deserialize)]
struct UploadResponse {
    public_id: String,
    width: Option<i32>,
    height: Option<i32>,
    bytes: Option<i64>,
    format: Option<String>,
    secure_url: String,
}

/// Response of the destroy endpoint.
#[derive(Debug, Deserialize)]
struct DestroyResponse {
    result: String,
}

/// HTTP client for one Cloudinary account.
pub struct CloudinaryHost {
    client: reqwest::Client,
    config: CloudinaryConfig,
}

impl CloudinaryHost {
    pub fn new(config: CloudinaryConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    fn endpoint(&self, action: &str) -> String {
        format!(
            "{}/v1_1/{}/image/{action}",
            self.config.api_base, self.config.cloud_name
        )
    }

    /// Signed parameter set: the given params plus `timestamp`, `api_key`,
    /// `signature` and `signature_algorithm`.
    fn signed_params(
        &self,
        mut params: BTreeMap<&'static str, String>,
    ) -> BTreeMap<&'static str, String> {
        params.insert("timestamp", chrono::Utc::now().timestamp().to_string());
        let signature = sign(&params, &self.config.api_secret);
        params.insert("api_key", self.config.api_key.clone());
        params.insert("signature", signature);
        params.insert("signature_algorithm", "sha256".to_string());
        params
    }

    // ---- private helpers ----

    /// Ensure the response has a success status code.
    async fn ensure_success(response: reqwest::Response) -> Result<reqwest::Response, CloudError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(CloudError::Api {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }

    /// Parse a successful JSON response body into the expected type.
    async fn parse_response<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
    ) -> Result<T, CloudError> {
        let response = Self::ensure_success(response).await?;
        let body = response.text().await?;
        serde_json::from_str(&body).map_err(|e| CloudError::Decode(format!("{e}: {body}")))
    }
}

#[async_trait]
impl ImageHost for CloudinaryHost {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        filename: &str,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, CloudError> {
        let mut params = BTreeMap::new();
        let folder = options
            .folder
            .clone()
            .unwrap_or_else(|| self.config.upload_folder.clone());
        params.insert("folder", folder);
        if let Some(quality) = &options.quality {
            params.insert("transformation", format!("q_{quality}"));
        }

        let file = reqwest::multipart::Part::bytes(bytes).file_name(filename.to_string());
        let form = self
            .signed_params(params)
            .into_iter()
            .fold(reqwest::multipart::Form::new(), |form, (key, value)| {
                form.text(key, value)
            })
            .part("file", file);

        let response = self
            .client
            .post(self.endpoint("upload"))
            .multipart(form)
            .send()
            .await?;
        let uploaded: UploadResponse = Self::parse_response(response).await?;

        tracing::debug!(public_id = %uploaded.public_id, "Image uploaded to Cloudinary");

        Ok(UploadedAsset {
            storage_id: uploaded.public_id,
            width: uploaded.width,
            height: uploaded.height,
            bytes: uploaded.bytes.unwrap_or(0),
            format: uploaded.format.unwrap_or_default(),
            secure_url: uploaded.secure_url,
        })
    }

    async fn destroy(&self, storage_id: &str) -> Result<(), CloudError> {
        let mut params = BTreeMap::new();
        params.insert("public_id", storage_id.to_string());

        let response = self
            .client
            .post(self.endpoint("destroy"))
            .form(&self.signed_params(params))
            .send()
            .await?;
        let outcome: DestroyResponse = Self::parse_response(response).await?;

        match outcome.result.as_str() {
            "ok" | "not found" => Ok(()),
            other => Err(CloudError::Api {
                status: 200,
                body: other.to_string(),
            }),
        }
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CloudError> {
        let response = self.client.get(url).send().await?;
        let response = Self::ensure_success(response).await?;
        Ok(response.bytes().await?.to_vec())
    }

    fn transformation_url(
        &self,
        storage_id: &str,
        transformations: &[Transformation],
        attachment: bool,
    ) -> String {
        delivery_url(
            &self.config.delivery_base,
            &self.config.cloud_name,
            storage_id,
            transformations,
            attachment,
        )
    }
}

/// SHA-256 signature over `k=v` pairs joined by `&` in key order, with the
/// API secret appended.
pub fn sign(params: &BTreeMap<&'static str, String>, api_secret: &str) -> String {
    let to_sign = params
        .iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join("&");
    format!("{:x}", Sha256::digest(format!("{to_sign}{api_secret}")))
}

/// Render one transformation step, e.g. `w_1920,h_1080,c_fill`.
pub fn render_transformation(step: &Transformation) -> String {
    let mut parts = Vec::new();
    if let Some(w) = step.width {
        parts.push(format!("w_{w}"));
    }
    if let Some(h) = step.height {
        parts.push(format!("h_{h}"));
    }
    if let Some(crop) = step.crop {
        parts.push(
            match crop {
                Crop::Fill => "c_fill",
                Crop::Limit => "c_limit",
            }
            .to_string(),
        );
    }
    if let Some(q) = step.quality {
        parts.push(format!("q_{q}"));
    }
    if let Some(f) = step.fetch_format {
        parts.push(format!("f_{f}"));
    }
    parts.join(",")
}

/// Full delivery URL:
/// `{base}/{cloud}/image/upload/[fl_attachment/][steps/]{storage_id}`.
pub fn delivery_url(
    base: &str,
    cloud_name: &str,
    storage_id: &str,
    transformations: &[Transformation],
    attachment: bool,
) -> String {
    let mut segments: Vec<String> = Vec::with_capacity(transformations.len() + 1);
    if attachment {
        segments.push(ATTACHMENT_FLAG.to_string());
    }
    segments.extend(
        transformations
            .iter()
            .map(render_transformation)
            .filter(|s| !s.is_empty()),
    );
    segments.push(storage_id.to_string());
    format!("{base}/{cloud_name}/image/upload/{}", segments.join("/"))
}
