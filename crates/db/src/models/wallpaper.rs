//! Wallpaper entity model and DTOs.

use flicker_core::resolution::aspect_ratio;
use flicker_core::types::{DbId, Timestamp};
use flicker_core::wallpaper::split_tags;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// A row from the `wallpapers` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct Wallpaper {
    pub id: DbId,
    pub title: String,
    pub slug: String,
    /// Reference id of the asset on the image host.
    pub storage_id: String,
    /// Preview (transformation) URL.
    pub view_link: String,
    /// Original full-quality URL.
    pub download_link: String,
    pub mime_type: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub size_bytes: Option<i64>,
    pub category: String,
    pub resolution_label: String,
    pub downloads: i64,
    pub is_featured: bool,
    /// Comma-separated tags.
    pub tags: String,
    pub device: String,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Wallpaper {
    /// Reduced aspect ratio, e.g. `"16:9"`.
    pub fn aspect_ratio(&self) -> Option<String> {
        aspect_ratio(self.width, self.height)
    }

    /// Tags as a trimmed list.
    pub fn tag_list(&self) -> Vec<String> {
        split_tags(&self.tags)
    }
}

/// DTO for creating a new wallpaper.
///
/// Slug and resolution label are not part of the input; the repository
/// derives them.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateWallpaper {
    pub title: String,
    pub storage_id: String,
    pub view_link: String,
    pub download_link: String,
    pub mime_type: String,
    pub width: Option<i32>,
    pub height: Option<i32>,
    pub size_bytes: Option<i64>,
    pub category: String,
    pub is_featured: bool,
    pub tags: String,
    pub device: String,
}

/// DTO for a staff edit. Slug is deliberately absent: it never changes.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateWallpaper {
    pub title: Option<String>,
    pub category: Option<String>,
    pub tags: Option<String>,
    pub device: Option<String>,
    pub is_featured: Option<bool>,
    pub width: Option<i32>,
    pub height: Option<i32>,
}

/// Aggregates over the full filtered listing (before pagination).
#[derive(Debug, Clone, Copy, FromRow, Serialize)]
pub struct ListingSummary {
    pub total: i64,
    /// `None` when nothing matched or every matching size is unknown.
    pub total_size_bytes: Option<i64>,
}
