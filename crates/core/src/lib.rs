//! Domain logic for the Flicker wallpaper gallery.
//!
//! Everything in this crate is pure: no database, no network. The `db`,
//! `cloud` and `api` crates build on these types and functions.

pub mod error;
pub mod imaging;
pub mod listing;
pub mod naming;
pub mod presets;
pub mod resolution;
pub mod roles;
pub mod seo;
pub mod types;
pub mod upload;
pub mod wallpaper;
