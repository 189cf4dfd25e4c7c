//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod wallpaper_repo;

pub use wallpaper_repo::{is_storage_id_conflict, WallpaperRepo};
