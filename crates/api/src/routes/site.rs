//! SEO files, static pages and logout.

use axum::routing::get;
use axum::Router;

use crate::handlers::{pages, seo, session};
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/robots.txt", get(seo::robots))
        .route("/sitemap.xml", get(seo::sitemap))
        .route("/about/", get(pages::about))
        .route("/privacy/", get(pages::privacy))
        .route("/terms/", get(pages::terms))
        .route("/contact/", get(pages::contact))
        .route("/logout/", get(session::logout))
}
