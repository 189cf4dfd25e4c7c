//! Authentication and authorization extractors.
//!
//! - [`auth::AuthUser`] -- Extracts the caller from a JWT (Bearer header or cookie).
//! - [`rbac::RequireStaff`] -- Requires the `staff` or `admin` role.

pub mod auth;
pub mod rbac;
