//! JWT-based authentication extractor for Axum handlers.

use axum::extract::FromRequestParts;
use axum::http::header::{AUTHORIZATION, COOKIE};
use axum::http::request::Parts;
use flicker_core::error::CoreError;

use crate::auth::jwt::{validate_token, ACCESS_TOKEN_COOKIE};
use crate::error::AppError;
use crate::state::AppState;

/// Authenticated caller extracted from a JWT.
///
/// The token is read from `Authorization: Bearer <token>` or, failing that,
/// from the `access_token` cookie.
#[derive(Debug, Clone)]
pub struct AuthUser {
    /// Username (from `claims.sub`).
    pub username: String,
    /// Role name (e.g. `"admin"`, `"staff"`).
    pub role: String,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let token = match parts.headers.get(AUTHORIZATION) {
            Some(value) => {
                let header = value.to_str().unwrap_or_default();
                header
                    .strip_prefix("Bearer ")
                    .ok_or_else(|| {
                        AppError::Core(CoreError::Unauthorized(
                            "Invalid Authorization format. Expected: Bearer <token>".into(),
                        ))
                    })?
                    .to_string()
            }
            None => cookie_value(parts, ACCESS_TOKEN_COOKIE).ok_or_else(|| {
                AppError::Core(CoreError::Unauthorized("Authentication required".into()))
            })?,
        };

        let claims = validate_token(&token, &state.config.jwt).map_err(|_| {
            AppError::Core(CoreError::Unauthorized("Invalid or expired token".into()))
        })?;

        Ok(AuthUser {
            username: claims.sub,
            role: claims.role,
        })
    }
}

/// Value of the named cookie across all `Cookie` headers.
fn cookie_value(parts: &Parts, name: &str) -> Option<String> {
    parts
        .headers
        .get_all(COOKIE)
        .iter()
        .filter_map(|v| v.to_str().ok())
        .flat_map(|header| header.split(';'))
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value.to_string())
        .filter(|value| !value.is_empty())
}
