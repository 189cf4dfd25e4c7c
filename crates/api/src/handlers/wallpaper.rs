//! Handlers for the gallery listing, detail pages and staff edits.

use axum::extract::{Path, Query, State};
use axum::response::IntoResponse;
use axum::Json;
use flicker_core::listing::{resolve_page, ListingFilter, PAGE_SIZE, RELATED_LIMIT};
use flicker_core::presets::DOWNLOAD_TOKENS;
use flicker_core::upload::EditFields;
use flicker_core::wallpaper::{
    category_choices, device_choices, normalize_category, normalize_device, Choice,
};
use flicker_db::models::wallpaper::{UpdateWallpaper, Wallpaper};
use flicker_db::repositories::WallpaperRepo;
use serde::Serialize;

use crate::error::{AppError, AppResult};
use crate::middleware::rbac::RequireStaff;
use crate::query::ListingParams;
use crate::response::{DataResponse, MessageResponse};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

/// Filter values echoed back to the caller, after normalisation.
#[derive(Debug, Serialize)]
pub struct EchoedFilters {
    pub q: String,
    pub cat: String,
    pub res: String,
    pub device: String,
    pub sort: &'static str,
}

impl EchoedFilters {
    fn new(params: &ListingParams, filter: &ListingFilter) -> Self {
        let trimmed = |v: &Option<String>| v.as_deref().map(str::trim).unwrap_or("").to_string();
        Self {
            q: filter.query.clone().unwrap_or_default(),
            cat: filter.category.clone().unwrap_or_default(),
            res: trimmed(&params.res),
            device: filter.device.clone().unwrap_or_default(),
            sort: filter.sort.as_str(),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ListingPage {
    pub wallpapers: Vec<Wallpaper>,
    pub page: i64,
    pub num_pages: i64,
    pub has_next: bool,
    pub has_previous: bool,
    /// Matching records across all pages.
    pub total: i64,
    /// Sum of known file sizes across all pages.
    pub total_size_bytes: Option<i64>,
    pub filters: EchoedFilters,
    pub categories: Vec<Choice>,
    pub devices: Vec<Choice>,
}

#[derive(Debug, Serialize)]
pub struct WallpaperDetail {
    pub wallpaper: Wallpaper,
    pub tags: Vec<String>,
    pub aspect_ratio: Option<String>,
    pub related: Vec<Wallpaper>,
    /// `res` values the download endpoint resizes to.
    pub download_resolutions: &'static [&'static str],
}

/// Body of a staff edit. Every field is optional.
#[derive(Debug, Default, serde::Deserialize)]
pub struct EditWallpaperRequest {
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub device: Option<String>,
    pub is_featured: Option<bool>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

// ---------------------------------------------------------------------------
// Public pages
// ---------------------------------------------------------------------------

/// GET /
///
/// Paginated gallery listing with search, filters and sort.
pub async fn list_wallpapers(
    State(state): State<AppState>,
    Query(params): Query<ListingParams>,
) -> AppResult<impl IntoResponse> {
    let filter = params.filter();

    let summary = WallpaperRepo::summarize(&state.pool, &filter).await?;
    let window = resolve_page(params.page.as_deref(), summary.total, PAGE_SIZE);
    let wallpapers =
        WallpaperRepo::list(&state.pool, &filter, window.limit, window.offset).await?;

    Ok(Json(DataResponse {
        data: ListingPage {
            wallpapers,
            page: window.number,
            num_pages: window.num_pages,
            has_next: window.has_next(),
            has_previous: window.has_previous(),
            total: summary.total,
            total_size_bytes: summary.total_size_bytes,
            filters: EchoedFilters::new(&params, &filter),
            categories: category_choices(),
            devices: device_choices(),
        },
    }))
}

/// GET /w/{slug}/
///
/// A single wallpaper with its most popular siblings in the same category.
pub async fn get_wallpaper(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let wallpaper = WallpaperRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::wallpaper_not_found(&slug))?;

    let related =
        WallpaperRepo::related(&state.pool, &wallpaper.category, &wallpaper.slug, RELATED_LIMIT)
            .await?;

    Ok(Json(DataResponse {
        data: WallpaperDetail {
            tags: wallpaper.tag_list(),
            aspect_ratio: wallpaper.aspect_ratio(),
            wallpaper,
            related,
            download_resolutions: DOWNLOAD_TOKENS,
        },
    }))
}

// ---------------------------------------------------------------------------
// Staff actions
// ---------------------------------------------------------------------------

/// PATCH /w/{slug}/
///
/// Partial edit. The slug is immutable; the resolution label follows the
/// (possibly corrected) dimensions.
pub async fn update_wallpaper(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(slug): Path<String>,
    Json(input): Json<EditWallpaperRequest>,
) -> AppResult<impl IntoResponse> {
    let update = validate_edit(input)?;

    let wallpaper = WallpaperRepo::update(&state.pool, &slug, &update)
        .await?
        .ok_or_else(|| AppError::wallpaper_not_found(&slug))?;

    tracing::info!(slug = %slug, user = %staff.username, "Wallpaper updated");

    Ok(Json(MessageResponse {
        message: format!("'{}' updated successfully!", wallpaper.title),
        data: wallpaper,
    }))
}

/// POST /{slug}/delete/
///
/// Remove the remote asset (best effort) and then the record.
pub async fn delete_wallpaper(
    RequireStaff(staff): RequireStaff,
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> AppResult<impl IntoResponse> {
    let wallpaper = WallpaperRepo::find_by_slug(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::wallpaper_not_found(&slug))?;

    if let Err(e) = state.image_host.destroy(&wallpaper.storage_id).await {
        tracing::warn!(
            slug = %slug,
            storage_id = %wallpaper.storage_id,
            error = %e,
            "Remote asset deletion failed, removing record anyway",
        );
    }

    let removed = WallpaperRepo::delete(&state.pool, &slug)
        .await?
        .ok_or_else(|| AppError::wallpaper_not_found(&slug))?;

    tracing::info!(slug = %slug, user = %staff.username, "Wallpaper deleted");

    Ok(Json(MessageResponse {
        message: format!("'{}' deleted successfully!", removed.title),
        data: removed,
    }))
}

/// Validate and normalise an edit request.
fn validate_edit(input: EditWallpaperRequest) -> AppResult<UpdateWallpaper> {
    let fields = EditFields::parse(input.title.as_deref(), input.tags.as_deref())?;

    let category = input
        .category
        .as_deref()
        .map(|c| normalize_category(Some(c)))
        .transpose()?;
    let device = input
        .device
        .as_deref()
        .map(|d| normalize_device(Some(d)))
        .transpose()?;

    for dim in [input.width, input.height].into_iter().flatten() {
        if dim <= 0 {
            return Err(AppError::BadRequest(
                "Dimensions must be positive integers".into(),
            ));
        }
    }

    Ok(UpdateWallpaper {
        title: fields.title,
        category,
        tags: fields.tags,
        device,
        is_featured: input.is_featured,
        width: input.width,
        height: input.height,
    })
}
