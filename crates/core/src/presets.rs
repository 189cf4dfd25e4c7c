//! Transformation presets sent to the image host.
//!
//! A [`Transformation`] is a host-agnostic description of one resize/format
//! step; the cloud crate renders it into the host's URL syntax.

use crate::wallpaper::Device;

/// Crop mode for a resize step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crop {
    /// Fill the box exactly, cropping overflow.
    Fill,
    /// Fit inside the box without upscaling.
    Limit,
}

/// One transformation step.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Transformation {
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub crop: Option<Crop>,
    /// Host quality directive, e.g. `auto:low`.
    pub quality: Option<&'static str>,
    /// Host format directive, e.g. `auto`.
    pub fetch_format: Option<&'static str>,
}

impl Transformation {
    /// A resize step.
    pub fn resize(width: u32, height: u32, crop: Crop) -> Self {
        Self {
            width: Some(width),
            height: Some(height),
            crop: Some(crop),
            ..Self::default()
        }
    }

    /// A quality/format step.
    pub fn delivery(quality: &'static str, fetch_format: &'static str) -> Self {
        Self {
            quality: Some(quality),
            fetch_format: Some(fetch_format),
            ..Self::default()
        }
    }
}

/// Resolution tokens accepted by the download endpoint.
pub const DOWNLOAD_TOKENS: &[&str] = &["hd", "2k", "4k", "mobile"];

/// Quality requested from the host for incoming uploads.
pub const UPLOAD_QUALITY: &str = "auto:best";

/// Resize preset for a download `res` token (case-insensitive).
///
/// Unknown or empty tokens return `None`, meaning "serve the original".
pub fn download_preset(token: &str) -> Option<Transformation> {
    let (w, h) = match token.trim().to_lowercase().as_str() {
        "hd" => (1920, 1080),
        "2k" => (2560, 1440),
        "4k" => (3840, 2160),
        "mobile" => (1080, 2400),
        _ => return None,
    };
    Some(Transformation::resize(w, h, Crop::Fill))
}

/// Preview chain for the gallery grid. Mobile wallpapers get a taller box.
pub fn preview_chain(device: Device) -> Vec<Transformation> {
    let (w, h) = match device {
        Device::Pc => (600, 600),
        Device::Mobile => (720, 1280),
    };
    vec![
        Transformation::resize(w, h, Crop::Limit),
        Transformation::delivery("auto:low", "auto"),
    ]
}
