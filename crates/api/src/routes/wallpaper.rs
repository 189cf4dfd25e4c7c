//! Gallery, detail, download, upload and delete routes.

use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{download, upload, wallpaper};
use crate::state::AppState;

/// Allowance for multipart boundaries and the text fields on top of the
/// image itself.
const MULTIPART_OVERHEAD_BYTES: usize = 64 * 1024;

/// ```text
/// GET    /                      -> list_wallpapers
/// GET    /w/{slug}/             -> get_wallpaper
/// PATCH  /w/{slug}/             -> update_wallpaper (staff)
/// GET    /w/{slug}/download/    -> download_wallpaper
/// GET    /upload/               -> upload_form (staff)
/// POST   /upload/               -> upload_wallpaper (staff)
/// POST   /{slug}/delete/        -> delete_wallpaper (staff)
/// ```
pub fn router(max_upload_bytes: usize) -> Router<AppState> {
    Router::new()
        .route("/", get(wallpaper::list_wallpapers))
        .route(
            "/w/{slug}/",
            get(wallpaper::get_wallpaper).patch(wallpaper::update_wallpaper),
        )
        .route("/w/{slug}/download/", get(download::download_wallpaper))
        .route(
            "/upload/",
            get(upload::upload_form)
                .post(upload::upload_wallpaper)
                .layer(DefaultBodyLimit::max(
                    max_upload_bytes + MULTIPART_OVERHEAD_BYTES,
                )),
        )
        .route("/{slug}/delete/", post(wallpaper::delete_wallpaper))
}
