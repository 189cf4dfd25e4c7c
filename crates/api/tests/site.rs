//! Integration tests for robots.txt, the sitemap, static pages and logout.

mod common;

use axum::http::header::{CONTENT_TYPE, LOCATION, SET_COOKIE};
use axum::http::StatusCode;
use common::{body_json, body_text, build_test_app, get, new_wallpaper, seed};
use sqlx::PgPool;

// ---------------------------------------------------------------------------
// Test: GET /robots.txt
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_robots_points_at_sitemap(pool: PgPool) {
    let response = get(build_test_app(pool), "/robots.txt").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()[CONTENT_TYPE], "text/plain; charset=utf-8");
    let text = body_text(response).await;
    assert!(text.contains("Disallow: /upload/"));
    assert!(text.contains("Sitemap: https://flicker.example.com/sitemap.xml"));
}

// ---------------------------------------------------------------------------
// Test: GET /sitemap.xml
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_sitemap_lists_pages_and_wallpapers(pool: PgPool) {
    let mut input = new_wallpaper("Rock & Roll <Live>", "wallpapers/rock");
    input.tags = "music, stage".to_string();
    seed(&pool, input).await;

    let response = get(build_test_app(pool), "/sitemap.xml").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response.headers()[CONTENT_TYPE],
        "application/xml; charset=utf-8"
    );
    let xml = body_text(response).await;
    assert!(xml.starts_with("<?xml"));
    assert!(xml.contains("<loc>https://flicker.example.com/</loc>"));
    assert!(xml.contains("<loc>https://flicker.example.com/about/</loc>"));
    assert!(xml.contains("<loc>https://flicker.example.com/w/rock-roll-live/</loc>"));
    assert!(xml.contains("Rock &amp; Roll &lt;Live&gt;"));
    assert!(!xml.contains("/upload/</loc>"));
}

// ---------------------------------------------------------------------------
// Test: static pages
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_static_pages_respond(pool: PgPool) {
    for (path, page) in [
        ("/about/", "about"),
        ("/privacy/", "privacy"),
        ("/terms/", "terms"),
        ("/contact/", "contact"),
    ] {
        let response = get(build_test_app(pool.clone()), path).await;
        assert_eq!(response.status(), StatusCode::OK, "{path}");
        let json = body_json(response).await;
        assert_eq!(json["data"]["page"], page);
    }
}

// ---------------------------------------------------------------------------
// Test: GET /logout/
// ---------------------------------------------------------------------------

#[sqlx::test(migrations = "../../db/migrations")]
async fn test_logout_clears_cookie_and_redirects(pool: PgPool) {
    let response = get(build_test_app(pool), "/logout/").await;

    assert_eq!(response.status(), StatusCode::SEE_OTHER);
    assert_eq!(response.headers()[LOCATION], "/");
    let cookie = response.headers()[SET_COOKIE].to_str().unwrap();
    assert!(cookie.starts_with("access_token=;"));
    assert!(cookie.contains("Max-Age=0"));
}
