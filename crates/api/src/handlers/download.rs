//! Download proxy: counts the download, then streams the image back as an
//! attachment so browsers save it under a readable filename.

use axum::extract::{Path, Query, State};
use axum::http::header::{CONTENT_DISPOSITION, CONTENT_LENGTH, CONTENT_TYPE};
use axum::response::IntoResponse;
use flicker_core::imaging::content_type_for;
use flicker_core::naming::download_filename;
use flicker_core::presets::download_preset;
use flicker_db::repositories::WallpaperRepo;

use crate::error::{AppError, AppResult};
use crate::query::DownloadParams;
use crate::state::AppState;

/// GET /w/{slug}/download/?res=
///
/// `res` selects a resize preset (`hd`, `2k`, `4k`, `mobile`); anything else
/// serves the original. The counter is incremented before the fetch, so a
/// failed upstream fetch still counts.
pub async fn download_wallpaper(
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Query(params): Query<DownloadParams>,
) -> AppResult<impl IntoResponse> {
    let wallpaper = WallpaperRepo::increment_downloads(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::wallpaper_not_found(&slug))?;

    let token = params
        .res
        .as_deref()
        .map(|r| r.trim().to_lowercase())
        .filter(|r| download_preset(r).is_some());

    let url = match token.as_deref().and_then(download_preset) {
        Some(preset) => {
            state
                .image_host
                .transformation_url(&wallpaper.storage_id, &[preset], true)
        }
        None => state.image_host.attachment_url(&wallpaper.download_link),
    };

    let bytes = state.image_host.fetch(&url).await.map_err(|e| {
        tracing::error!(slug = %slug, url = %url, error = %e, "Download fetch failed");
        AppError::Cloud(e)
    })?;

    let filename = download_filename(&wallpaper.title, token.as_deref(), &wallpaper.mime_type);
    tracing::info!(
        slug = %slug,
        res = token.as_deref().unwrap_or("original"),
        downloads = wallpaper.downloads,
        "Wallpaper downloaded",
    );

    Ok((
        [
            (CONTENT_TYPE, content_type_for(&wallpaper.mime_type)),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{filename}\""),
            ),
            (CONTENT_LENGTH, bytes.len().to_string()),
        ],
        bytes,
    ))
}
