pub mod download;
pub mod pages;
pub mod seo;
pub mod session;
pub mod upload;
pub mod wallpaper;
