pub mod health;
pub mod site;
pub mod wallpaper;

use axum::Router;

use crate::config::ServerConfig;
use crate::state::AppState;

/// Build the route tree.
///
/// Route hierarchy:
///
/// ```text
/// /                        gallery listing
/// /w/{slug}/               detail, edit (staff, PATCH)
/// /w/{slug}/download/      download proxy
/// /upload/                 form metadata, upload (staff)
/// /{slug}/delete/          delete (staff, POST)
///
/// /sitemap.xml             sitemap
/// /robots.txt              robots
/// /about/ /privacy/ /terms/ /contact/
/// /logout/                 clear token cookie
/// ```
pub fn app_routes(config: &ServerConfig) -> Router<AppState> {
    Router::new()
        .merge(wallpaper::router(config.max_upload_bytes))
        .merge(site::router())
}
