//! Upload form validation.
//!
//! The size limit enforced here (20 MB) is authoritative for the upload
//! endpoint; the smaller advertised size is only shown to uploaders as a
//! recommendation.

use validator::{Validate, ValidationErrors};

use crate::error::CoreError;

/// Maximum accepted upload size in bytes.
pub const MAX_UPLOAD_BYTES: usize = 20 * 1024 * 1024;

/// Upload size advertised on the upload form, in megabytes.
pub const ADVERTISED_MAX_UPLOAD_MB: u32 = 10;

/// Accepted image file extensions (lowercase).
pub const ALLOWED_EXTENSIONS: &[&str] = &["jpg", "jpeg", "png", "webp"];

/// Text fields of an upload, validated together.
#[derive(Debug, Clone, Validate)]
pub struct UploadFields {
    #[validate(length(
        min = 5,
        max = 255,
        message = "Title must be between 5 and 255 characters long"
    ))]
    pub title: String,
    #[validate(length(max = 255, message = "Tags must be at most 255 characters"))]
    pub tags: String,
}

impl UploadFields {
    /// Trim the inputs and validate them.
    pub fn parse(title: &str, tags: &str) -> Result<Self, CoreError> {
        let fields = Self {
            title: title.trim().to_string(),
            tags: tags.trim().to_string(),
        };
        fields.validate().map_err(first_message)?;
        Ok(fields)
    }
}

/// Text fields of a staff edit. Absent fields are left unchanged and are
/// not validated.
#[derive(Debug, Clone, Default, Validate)]
pub struct EditFields {
    #[validate(length(
        min = 5,
        max = 255,
        message = "Title must be between 5 and 255 characters long"
    ))]
    pub title: Option<String>,
    #[validate(length(max = 255, message = "Tags must be at most 255 characters"))]
    pub tags: Option<String>,
}

impl EditFields {
    pub fn parse(title: Option<&str>, tags: Option<&str>) -> Result<Self, CoreError> {
        let fields = Self {
            title: title.map(|t| t.trim().to_string()),
            tags: tags.map(|t| t.trim().to_string()),
        };
        fields.validate().map_err(first_message)?;
        Ok(fields)
    }
}

/// Collapse validator output into the first human-readable message.
fn first_message(errors: ValidationErrors) -> CoreError {
    let message = errors
        .field_errors()
        .values()
        .flat_map(|errs| errs.iter())
        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
        .next()
        .unwrap_or_else(|| errors.to_string());
    CoreError::Validation(message)
}

/// Validate the uploaded file's name and size.
pub fn validate_image_file(filename: &str, size: usize, max_bytes: usize) -> Result<(), CoreError> {
    if size == 0 {
        return Err(CoreError::Validation("Image file is empty".into()));
    }

    let ext = filename
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_lowercase())
        .unwrap_or_default();
    if !ALLOWED_EXTENSIONS.contains(&ext.as_str()) {
        return Err(CoreError::Validation(format!(
            "Unsupported image format '{filename}'. Allowed: {}",
            ALLOWED_EXTENSIONS.join(", ")
        )));
    }

    if size > max_bytes {
        return Err(CoreError::Validation(format!(
            "File size must be less than {}MB",
            max_bytes / (1024 * 1024)
        )));
    }

    Ok(())
}

/// Interpret a checkbox-style form value. Presence means `true` unless the
/// value explicitly says otherwise.
pub fn parse_flag(value: &str) -> bool {
    !matches!(
        value.trim().to_lowercase().as_str(),
        "false" | "0" | "off" | "no"
    )
}
