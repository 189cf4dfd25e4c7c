//! Local image inspection.
//!
//! Used as a fallback when the image host does not report dimensions. Only
//! the header is decoded.

use std::io::Cursor;

use image::ImageReader;

use crate::error::CoreError;

/// Content type used when a record carries no usable MIME type.
pub const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Read `(width, height)` from encoded image bytes.
pub fn read_dimensions(bytes: &[u8]) -> Result<(u32, u32), CoreError> {
    ImageReader::new(Cursor::new(bytes))
        .with_guessed_format()
        .map_err(|e| CoreError::Validation(format!("Unreadable image: {e}")))?
        .into_dimensions()
        .map_err(|e| CoreError::Validation(format!("Could not read image dimensions: {e}")))
}

/// HTTP content type for a stored MIME type.
///
/// Hosts report JPEGs as `jpg`, which yields the non-standard `image/jpg`;
/// that is normalised to `image/jpeg`.
pub fn content_type_for(mime_type: &str) -> String {
    let mime = mime_type.trim().to_lowercase();
    match mime.as_str() {
        "" => DEFAULT_CONTENT_TYPE.to_string(),
        "image/jpg" => "image/jpeg".to_string(),
        m if m.contains('/') && !m.ends_with('/') => mime,
        _ => DEFAULT_CONTENT_TYPE.to_string(),
    }
}

/// MIME type recorded for a host-reported format (`png` -> `image/png`).
pub fn mime_for_format(format: &str) -> String {
    let format = format.trim().to_lowercase();
    if format.is_empty() {
        String::new()
    } else {
        format!("image/{format}")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_matches::assert_matches;

    /// Smallest valid PNG: 1x1 transparent pixel.
    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52, 0x00, 0x00, 0x00, 0x01, 0x00, 0x00, 0x00, 0x01, 0x08, 0x06, 0x00, 0x00, 0x00, 0x1F,
        0x15, 0xC4, 0x89, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x44, 0x41, 0x54, 0x78, 0x9C, 0x63, 0x00,
        0x01, 0x00, 0x00, 0x05, 0x00, 0x01, 0x0D, 0x0A, 0x2D, 0xB4, 0x00, 0x00, 0x00, 0x00, 0x49,
        0x45, 0x4E, 0x44, 0xAE, 0x42, 0x60, 0x82,
    ];

    #[test]
    fn reads_png_header() {
        assert_eq!(read_dimensions(PNG_1X1).unwrap(), (1, 1));
    }

    #[test]
    fn garbage_is_rejected() {
        assert_matches!(
            read_dimensions(b"definitely not an image"),
            Err(CoreError::Validation(_))
        );
    }

    #[test]
    fn jpg_mime_is_normalised() {
        assert_eq!(content_type_for("image/jpg"), "image/jpeg");
        assert_eq!(content_type_for("IMAGE/PNG"), "image/png");
        assert_eq!(content_type_for(""), DEFAULT_CONTENT_TYPE);
        assert_eq!(content_type_for("image/"), DEFAULT_CONTENT_TYPE);
    }

    #[test]
    fn format_maps_to_mime() {
        assert_eq!(mime_for_format("webp"), "image/webp");
        assert_eq!(mime_for_format(""), "");
    }
}
