//! Shared response envelope types for API handlers.
//!
//! All JSON responses use a `{ "data": ... }` envelope. Mutating endpoints
//! that used to flash a message to the user return it alongside the data in
//! [`MessageResponse`].

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: items }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}

/// `{ "data": T, "message": "..." }` envelope for mutating endpoints.
#[derive(Debug, Serialize)]
pub struct MessageResponse<T: Serialize> {
    pub data: T,
    pub message: String,
}
