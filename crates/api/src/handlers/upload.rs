//! Staff upload: validate, push to the image host, persist.
//!
//! If the record cannot be saved after the host accepted the file, the
//! remote asset is destroyed again so no orphan is left behind, unless the
//! save failed because another record already references that asset.

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use flicker_cloud::{UploadOptions, UploadedAsset};
use flicker_core::error::CoreError;
use flicker_core::imaging::{mime_for_format, read_dimensions};
use flicker_core::presets::{preview_chain, UPLOAD_QUALITY};
use flicker_core::upload::{
    parse_flag, validate_image_file, UploadFields, ADVERTISED_MAX_UPLOAD_MB, ALLOWED_EXTENSIONS,
};
use flicker_core::wallpaper::{
    category_choices, device_choices, normalize_category, normalize_device, Choice, Device,
};
use flicker_db::models::wallpaper::CreateWallpaper;
use flicker_db::repositories::{is_storage_id_conflict, WallpaperRepo};
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

/// Metadata the upload form needs.
#[derive(Debug, Serialize)]
pub struct UploadFormInfo {
    pub max_upload_mb: u32,
    pub allowed_extensions: &'static [&'static str],
    pub categories: Vec<Choice>,
    pub devices: Vec<Choice>,
}

/// Raw multipart fields before validation.
#[derive(Debug, Default)]
struct UploadForm {
    title: String,
    category: Option<String>,
    device: Option<String>,
    tags: String,
    featured: bool,
    image: Option<(String, Vec<u8>)>,
}

/// GET /upload/
pub async fn upload_form(RequireStaff(_staff): RequireStaff) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse {
        data: UploadFormInfo {
            max_upload_mb: ADVERTISED_MAX_UPLOAD_MB,
            allowed_extensions: ALLOWED_EXTENSIONS,
            categories: category_choices(),
            devices: device_choices(),
        },
    }))
}

/// POST /upload/
///
/// Multipart form: `title`, `category`, `device`, `tags`, `featured`, and the
/// image under `image` (or `file`).
pub async fn upload_wallpaper(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    multipart: Multipart,
) -> AppResult<impl IntoResponse> {
    let form = read_form(multipart).await?;

    // --- Validation ---
    let fields = UploadFields::parse(&form.title, &form.tags)?;
    let category = normalize_category(form.category.as_deref())?;
    let device = normalize_device(form.device.as_deref())?;
    let (filename, data) = form
        .image
        .ok_or_else(|| AppError::BadRequest("An image file is required".into()))?;
    validate_image_file(&filename, data.len(), state.config.max_upload_bytes)?;

    let file_size = data.len() as i64;
    let local_dims = read_dimensions(&data);

    // --- Remote upload ---
    let options = UploadOptions {
        folder: None,
        quality: Some(UPLOAD_QUALITY.to_string()),
    };
    let asset: UploadedAsset = state
        .image_host
        .upload(data, &filename, &options)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, filename = %filename, "Image host upload failed");
            AppError::Core(CoreError::Upstream(format!(
                "An error occurred during upload: {e}"
            )))
        })?;

    let (width, height) = match (asset.width, asset.height) {
        (Some(w), Some(h)) => (Some(w), Some(h)),
        _ => match local_dims {
            Ok((w, h)) => (i32::try_from(w).ok(), i32::try_from(h).ok()),
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    storage_id = %asset.storage_id,
                    "Could not determine image dimensions",
                );
                (asset.width, asset.height)
            }
        },
    };

    let preview = preview_chain(Device::from_value(&device).unwrap_or_default());
    let input = CreateWallpaper {
        title: fields.title,
        view_link: state
            .image_host
            .transformation_url(&asset.storage_id, &preview, false),
        download_link: asset.secure_url.clone(),
        mime_type: mime_for_format(&asset.format),
        width,
        height,
        size_bytes: Some(if asset.bytes > 0 { asset.bytes } else { file_size }),
        category,
        is_featured: form.featured,
        tags: fields.tags,
        device,
        storage_id: asset.storage_id.clone(),
    };

    // --- Persist (with compensation) ---
    let wallpaper = match WallpaperRepo::create(&state.pool, &input).await {
        Ok(wallpaper) => wallpaper,
        // A storage id clash means the asset belongs to an existing record.
        Err(err) if is_storage_id_conflict(&err) => {
            tracing::warn!(
                storage_id = %asset.storage_id,
                "Uploaded asset already belongs to another wallpaper, keeping it",
            );
            return Err(AppError::Database(err));
        }
        Err(err) => {
            if let Err(e) = state.image_host.destroy(&asset.storage_id).await {
                tracing::warn!(
                    storage_id = %asset.storage_id,
                    error = %e,
                    "Failed to remove orphaned remote asset",
                );
            }
            return Err(AppError::Database(err));
        }
    };

    tracing::info!(
        slug = %wallpaper.slug,
        storage_id = %wallpaper.storage_id,
        user = %staff.username,
        "Wallpaper uploaded",
    );

    Ok((
        StatusCode::CREATED,
        Json(MessageResponse {
            message: format!("'{}' uploaded successfully!", wallpaper.title),
            data: wallpaper,
        }),
    ))
}

/// Drain the multipart stream into an [`UploadForm`].
async fn read_form(mut multipart: Multipart) -> AppResult<UploadForm> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::BadRequest(e.to_string()))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "image" | "file" => {
                let filename = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                if !data.is_empty() || form.image.is_none() {
                    form.image = Some((filename, data.to_vec()));
                }
            }
            "title" | "category" | "device" | "tags" | "featured" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| AppError::BadRequest(e.to_string()))?;
                match name.as_str() {
                    "title" => form.title = text,
                    "category" => form.category = Some(text),
                    "device" => form.device = Some(text),
                    "tags" => form.tags = text,
                    _ => form.featured = parse_flag(&text),
                }
            }
            _ => {} // ignore unknown fields
        }
    }

    Ok(form)
}
