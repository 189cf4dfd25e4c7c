use axum::http::header::SET_COOKIE;
use axum::response::{IntoResponse, Redirect};

use crate::auth::jwt::ACCESS_TOKEN_COOKIE;

/// GET /logout/
///
/// Clears the token cookie and sends the browser back to the gallery. Bearer
/// tokens are stateless and simply expire.
pub async fn logout() -> impl IntoResponse {
    let expired = format!("{ACCESS_TOKEN_COOKIE}=; Path=/; Max-Age=0; HttpOnly; SameSite=Lax");
    ([(SET_COOKIE, expired)], Redirect::to("/"))
}
