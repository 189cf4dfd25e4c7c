#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::header::{AUTHORIZATION, CONTENT_TYPE, COOKIE};
use axum::http::{Method, Request, Response};
use axum::Router;
use flicker_api::auth::jwt::{generate_access_token, JwtConfig};
use flicker_api::config::ServerConfig;
use flicker_api::router::build_app_router;
use flicker_api::state::AppState;
use flicker_cloud::cloudinary::delivery_url;
use flicker_cloud::{CloudError, ImageHost, UploadOptions, UploadedAsset};
use flicker_core::presets::Transformation;
use flicker_core::upload::MAX_UPLOAD_BYTES;
use flicker_db::models::wallpaper::{CreateWallpaper, Wallpaper};
use flicker_db::repositories::WallpaperRepo;
use http_body_util::BodyExt;
use sqlx::PgPool;
use tower::ServiceExt;

pub const TEST_JWT_SECRET: &str = "test-secret-that-is-long-enough-for-hmac";
pub const TEST_SITE_URL: &str = "https://flicker.example.com";
pub const MOCK_DELIVERY_BASE: &str = "https://res.example.com";
pub const MOCK_CLOUD: &str = "demo";
pub const MOCK_IMAGE_BYTES: &[u8] = b"mock-image-bytes";

/// Smallest valid PNG: 1x1 transparent pixel.
pub const PNG_1X1: &[u8] = &[
    0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
    0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
    0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
    0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
    0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
];

// ---------------------------------------------------------------------------
// Mock image host
// ---------------------------------------------------------------------------

/// In-memory [`ImageHost`] that records calls and can be told to fail.
#[derive(Default)]
pub struct MockImageHost {
    pub fail_upload: bool,
    pub fail_fetch: bool,
    pub fail_destroy: bool,
    /// Dimensions reported on upload; `None` mimics a host that omits them.
    pub dimensions: Option<(i32, i32)>,
    pub uploads: AtomicUsize,
    pub destroyed: Mutex<Vec<String>>,
    pub fetched: Mutex<Vec<String>>,
}

impl MockImageHost {
    pub fn new() -> Self {
        Self {
            dimensions: Some((3840, 2160)),
            ..Self::default()
        }
    }

    pub fn destroyed(&self) -> Vec<String> {
        self.destroyed.lock().unwrap().clone()
    }

    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().unwrap().clone()
    }
}

fn mock_error() -> CloudError {
    CloudError::Api {
        status: 500,
        body: "mock failure".to_string(),
    }
}

#[async_trait]
impl ImageHost for MockImageHost {
    async fn upload(
        &self,
        bytes: Vec<u8>,
        _filename: &str,
        options: &UploadOptions,
    ) -> Result<UploadedAsset, CloudError> {
        if self.fail_upload {
            return Err(mock_error());
        }
        let n = self.uploads.fetch_add(1, Ordering::SeqCst) + 1;
        let folder = options.folder.clone().unwrap_or_else(|| "wallpapers".into());
        let storage_id = format!("{folder}/mock-{n}");
        Ok(UploadedAsset {
            secure_url: format!(
                "{MOCK_DELIVERY_BASE}/{MOCK_CLOUD}/image/upload/v1/{storage_id}.png"
            ),
            storage_id,
            width: self.dimensions.map(|(w, _)| w),
            height: self.dimensions.map(|(_, h)| h),
            bytes: bytes.len() as i64,
            format: "png".to_string(),
        })
    }

    async fn destroy(&self, storage_id: &str) -> Result<(), CloudError> {
        self.destroyed.lock().unwrap().push(storage_id.to_string());
        if self.fail_destroy {
            return Err(mock_error());
        }
        Ok(())
    }

    async fn fetch(&self, url: &str) -> Result<Vec<u8>, CloudError> {
        self.fetched.lock().unwrap().push(url.to_string());
        if self.fail_fetch {
            return Err(mock_error());
        }
        Ok(MOCK_IMAGE_BYTES.to_vec())
    }

    fn transformation_url(
        &self,
        storage_id: &str,
        transformations: &[Transformation],
        attachment: bool,
    ) -> String {
        delivery_url(
            MOCK_DELIVERY_BASE,
            MOCK_CLOUD,
            storage_id,
            transformations,
            attachment,
        )
    }
}

// ---------------------------------------------------------------------------
// App construction
// ---------------------------------------------------------------------------

pub fn test_jwt_config() -> JwtConfig {
    JwtConfig {
        secret: TEST_JWT_SECRET.to_string(),
        access_token_expiry_mins: 15,
    }
}

/// Build a test `ServerConfig` with safe defaults.
pub fn test_config() -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        site_url: TEST_SITE_URL.to_string(),
        max_upload_bytes: MAX_UPLOAD_BYTES,
        jwt: test_jwt_config(),
    }
}

/// Full application router backed by a default [`MockImageHost`].
pub fn build_test_app(pool: PgPool) -> Router {
    build_test_app_with_host(pool, Arc::new(MockImageHost::new()))
}

/// Full application router backed by the given mock, so tests can inspect
/// the calls it received.
pub fn build_test_app_with_host(pool: PgPool, host: Arc<MockImageHost>) -> Router {
    let config = test_config();
    let state = AppState {
        pool,
        config: Arc::new(config.clone()),
        image_host: host,
    };
    build_app_router(state, &config)
}

/// A valid token for `role`.
pub fn token_for(role: &str) -> String {
    generate_access_token("tester", role, &test_jwt_config()).unwrap()
}

pub fn staff_token() -> String {
    token_for("staff")
}

// ---------------------------------------------------------------------------
// Fixtures
// ---------------------------------------------------------------------------

/// A 1920x1080 PC wallpaper in `nature`, stored under `storage_id`.
pub fn new_wallpaper(title: &str, storage_id: &str) -> CreateWallpaper {
    CreateWallpaper {
        title: title.to_string(),
        storage_id: storage_id.to_string(),
        view_link: format!("{MOCK_DELIVERY_BASE}/{MOCK_CLOUD}/image/upload/w_600/{storage_id}"),
        download_link: format!(
            "{MOCK_DELIVERY_BASE}/{MOCK_CLOUD}/image/upload/v1/{storage_id}.png"
        ),
        mime_type: "image/png".to_string(),
        width: Some(1920),
        height: Some(1080),
        size_bytes: Some(1_000),
        category: "nature".to_string(),
        is_featured: false,
        tags: String::new(),
        device: "pc".to_string(),
    }
}

pub async fn seed(pool: &PgPool, input: CreateWallpaper) -> Wallpaper {
    WallpaperRepo::create(pool, &input).await.unwrap()
}

pub async fn seed_titled(pool: &PgPool, title: &str, storage_id: &str) -> Wallpaper {
    seed(pool, new_wallpaper(title, storage_id)).await
}

// ---------------------------------------------------------------------------
// Request helpers
// ---------------------------------------------------------------------------

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(app, request).await
}

pub async fn get_authed(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

/// GET authenticated by the `access_token` cookie alone.
pub async fn get_with_cookie(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .uri(uri)
        .header(COOKIE, format!("theme=dark; access_token={token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn post_authed(app: Router, uri: &str, token: &str) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn patch_json(
    app: Router,
    uri: &str,
    token: &str,
    body: serde_json::Value,
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::PATCH)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap();
    send(app, request).await
}

/// One part of a multipart form.
pub enum FormPart<'a> {
    Text(&'a str, &'a str),
    File {
        name: &'a str,
        filename: &'a str,
        bytes: &'a [u8],
    },
}

const BOUNDARY: &str = "flicker-test-boundary";

pub fn multipart_body(parts: &[FormPart<'_>]) -> Vec<u8> {
    let mut body = Vec::new();
    for part in parts {
        body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
        match part {
            FormPart::Text(name, value) => {
                body.extend_from_slice(
                    format!("Content-Disposition: form-data; name=\"{name}\"\r\n\r\n{value}\r\n")
                        .as_bytes(),
                );
            }
            FormPart::File {
                name,
                filename,
                bytes,
            } => {
                body.extend_from_slice(
                    format!(
                        "Content-Disposition: form-data; name=\"{name}\"; filename=\"{filename}\"\r\n\
                         Content-Type: application/octet-stream\r\n\r\n"
                    )
                    .as_bytes(),
                );
                body.extend_from_slice(bytes);
                body.extend_from_slice(b"\r\n");
            }
        }
    }
    body.extend_from_slice(format!("--{BOUNDARY}--\r\n").as_bytes());
    body
}

pub async fn post_multipart(
    app: Router,
    uri: &str,
    token: &str,
    parts: &[FormPart<'_>],
) -> Response<Body> {
    let request = Request::builder()
        .method(Method::POST)
        .uri(uri)
        .header(AUTHORIZATION, format!("Bearer {token}"))
        .header(
            CONTENT_TYPE,
            format!("multipart/form-data; boundary={BOUNDARY}"),
        )
        .body(Body::from(multipart_body(parts)))
        .unwrap();
    send(app, request).await
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    String::from_utf8(body_bytes(response).await).unwrap()
}
