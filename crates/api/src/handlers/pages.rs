//! Static informational pages. The frontend renders the content; the API
//! only supplies page metadata.

use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::response::DataResponse;

#[derive(Debug, Clone, Copy, Serialize)]
pub struct PageInfo {
    pub page: &'static str,
    pub title: &'static str,
    pub description: &'static str,
}

const ABOUT: PageInfo = PageInfo {
    page: "about",
    title: "About",
    description: "Flicker is a free gallery of high-resolution wallpapers for desktop and mobile.",
};

const PRIVACY: PageInfo = PageInfo {
    page: "privacy",
    title: "Privacy Policy",
    description: "How Flicker handles the little data it collects.",
};

const TERMS: PageInfo = PageInfo {
    page: "terms",
    title: "Terms of Service",
    description: "The terms under which Flicker wallpapers may be downloaded and used.",
};

const CONTACT: PageInfo = PageInfo {
    page: "contact",
    title: "Contact",
    description: "Get in touch about takedown requests, feedback or partnerships.",
};

fn page(info: PageInfo) -> impl IntoResponse {
    Json(DataResponse { data: info })
}

/// GET /about/
pub async fn about() -> impl IntoResponse {
    page(ABOUT)
}

/// GET /privacy/
pub async fn privacy() -> impl IntoResponse {
    page(PRIVACY)
}

/// GET /terms/
pub async fn terms() -> impl IntoResponse {
    page(TERMS)
}

/// GET /contact/
pub async fn contact() -> impl IntoResponse {
    page(CONTACT)
}
