//! robots.txt and sitemap.xml.

use axum::extract::State;
use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use flicker_core::seo::{
    render_sitemap, robots_txt, static_entries, wallpaper_entry, SitemapSource,
};
use flicker_db::repositories::WallpaperRepo;

use crate::error::AppResult;
use crate::state::AppState;

/// GET /robots.txt
pub async fn robots(State(state): State<AppState>) -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/plain; charset=utf-8")],
        robots_txt(&state.config.site_url),
    )
}

/// GET /sitemap.xml
///
/// Static pages followed by one entry (with image metadata) per wallpaper.
pub async fn sitemap(State(state): State<AppState>) -> AppResult<impl IntoResponse> {
    let site_url = &state.config.site_url;
    let wallpapers = WallpaperRepo::list_all(&state.pool).await?;

    let mut entries = static_entries(site_url);
    entries.extend(wallpapers.iter().map(|w| {
        wallpaper_entry(
            site_url,
            &SitemapSource {
                slug: &w.slug,
                title: &w.title,
                tags: &w.tags,
                category: &w.category,
                device: &w.device,
                resolution_label: &w.resolution_label,
                image_url: &w.download_link,
                updated: Some(w.updated_at.date_naive()),
            },
        )
    }));

    tracing::debug!(entries = entries.len(), "Rendered sitemap");

    Ok((
        [(CONTENT_TYPE, "application/xml; charset=utf-8")],
        render_sitemap(&entries),
    ))
}
