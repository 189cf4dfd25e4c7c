//! Category and device vocabularies for wallpaper records.
//!
//! Both are stored as plain lowercase strings; these enums are the single
//! source of truth for which values are accepted.

use serde::Serialize;

use crate::error::CoreError;

/// Wallpaper category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Anime,
    Animals,
    Cars,
    Cityscape,
    Fantasy,
    Games,
    Movies,
    Nature,
    Space,
    Sports,
    Superheros,
    Technology,
    Other,
}

impl Category {
    /// Every category, in display order.
    pub const ALL: [Category; 13] = [
        Category::Anime,
        Category::Animals,
        Category::Cars,
        Category::Cityscape,
        Category::Fantasy,
        Category::Games,
        Category::Movies,
        Category::Nature,
        Category::Space,
        Category::Sports,
        Category::Superheros,
        Category::Technology,
        Category::Other,
    ];

    /// Stored value.
    pub fn as_str(self) -> &'static str {
        match self {
            Category::Anime => "anime",
            Category::Animals => "animals",
            Category::Cars => "cars",
            Category::Cityscape => "cityscape",
            Category::Fantasy => "fantasy",
            Category::Games => "games",
            Category::Movies => "movies",
            Category::Nature => "nature",
            Category::Space => "space",
            Category::Sports => "sports",
            Category::Superheros => "superheros",
            Category::Technology => "technology",
            Category::Other => "other",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            Category::Anime => "Anime",
            Category::Animals => "Animals",
            Category::Cars => "Cars",
            Category::Cityscape => "Cityscape",
            Category::Fantasy => "Fantasy",
            Category::Games => "Games",
            Category::Movies => "Movies",
            Category::Nature => "Nature",
            Category::Space => "Space",
            Category::Sports => "Sports",
            Category::Superheros => "Super Heroes",
            Category::Technology => "Technology",
            Category::Other => "Other",
        }
    }

    /// Look up a stored value, case-insensitively.
    pub fn from_value(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.as_str().eq_ignore_ascii_case(value))
    }
}

/// Target device for a wallpaper.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Device {
    #[default]
    Pc,
    Mobile,
}

impl Device {
    pub const ALL: [Device; 2] = [Device::Pc, Device::Mobile];

    pub fn as_str(self) -> &'static str {
        match self {
            Device::Pc => "pc",
            Device::Mobile => "mobile",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Device::Pc => "PC",
            Device::Mobile => "Mobile",
        }
    }

    pub fn from_value(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|d| d.as_str().eq_ignore_ascii_case(value))
    }
}

/// A `{ value, label }` pair for choice lists in responses.
#[derive(Debug, Clone, Serialize)]
pub struct Choice {
    pub value: &'static str,
    pub label: &'static str,
}

/// All category choices.
pub fn category_choices() -> Vec<Choice> {
    Category::ALL
        .into_iter()
        .map(|c| Choice {
            value: c.as_str(),
            label: c.label(),
        })
        .collect()
}

/// All device choices.
pub fn device_choices() -> Vec<Choice> {
    Device::ALL
        .into_iter()
        .map(|d| Choice {
            value: d.as_str(),
            label: d.label(),
        })
        .collect()
}

/// Validate an optional category input, returning the stored value.
///
/// Blank input means "no category" and maps to the empty string.
pub fn normalize_category(input: Option<&str>) -> Result<String, CoreError> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(String::new()),
        Some(raw) => Category::from_value(raw)
            .map(|c| c.as_str().to_string())
            .ok_or_else(|| CoreError::Validation(format!("Unknown category '{raw}'"))),
    }
}

/// Validate an optional device input, defaulting to `pc`.
pub fn normalize_device(input: Option<&str>) -> Result<String, CoreError> {
    match input.map(str::trim).filter(|s| !s.is_empty()) {
        None => Ok(Device::default().as_str().to_string()),
        Some(raw) => Device::from_value(raw)
            .map(|d| d.as_str().to_string())
            .ok_or_else(|| {
                CoreError::Validation(format!("Unknown device '{raw}'. Must be 'pc' or 'mobile'"))
            }),
    }
}

/// Split a comma-separated tag string into trimmed, non-empty tags.
pub fn split_tags(tags: &str) -> Vec<String> {
    tags.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}
