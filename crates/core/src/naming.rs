//! Slug and download filename conventions.
//!
//! Slugs are derived from titles once, on first save, and never change.
//! Collisions are resolved by appending `-1`, `-2`, ... to the base slug.

use std::collections::HashSet;
use std::sync::LazyLock;

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

/// Maximum slug length (matches the column limit on titles).
pub const MAX_SLUG_LEN: usize = 255;

/// Room reserved at the end of a base slug for a `-N` suffix.
const SUFFIX_RESERVE: usize = 12;

/// Base slug used when a title contains nothing slug-worthy.
pub const FALLBACK_SLUG: &str = "wallpaper";

/// File extension used when a record has no MIME type.
pub const DEFAULT_EXTENSION: &str = "jpg";

static STRIP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^\w\s-]").expect("valid regex"));
static DASH_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[-\s]+").expect("valid regex"));

/// Normalize a title into a URL-safe slug.
///
/// Accented letters are decomposed (NFKD) to their base letter and any
/// remaining non-ASCII characters are dropped; punctuation other than hyphens and
/// underscores is removed, runs of whitespace and hyphens collapse into a
/// single hyphen, and leading/trailing `-` and `_` are stripped.
///
/// # Examples
///
/// ```
/// use flicker_core::naming::slugify;
///
/// assert_eq!(slugify("Neon City at Night!"), "neon-city-at-night");
/// assert_eq!(slugify("  Mount  Fuji -- Sunrise "), "mount-fuji-sunrise");
/// ```
pub fn slugify(title: &str) -> String {
    let ascii: String = title.nfkd().filter(char::is_ascii).collect();
    let stripped = STRIP_RE.replace_all(&ascii, "").to_lowercase();
    let collapsed = DASH_RE.replace_all(stripped.trim(), "-");
    collapsed.trim_matches(|c| c == '-' || c == '_').to_string()
}

/// Slug base for a title: [`slugify`], falling back to [`FALLBACK_SLUG`] and
/// capped so that any numeric suffix still fits in [`MAX_SLUG_LEN`].
pub fn base_slug(title: &str) -> String {
    let slug = slugify(title);
    if slug.is_empty() {
        return FALLBACK_SLUG.to_string();
    }
    let cap = MAX_SLUG_LEN - SUFFIX_RESERVE;
    if slug.len() <= cap {
        return slug;
    }
    // Slugs are ASCII, so byte slicing is safe.
    slug[..cap].trim_end_matches('-').to_string()
}

/// Pick the first free slug among `base`, `base-1`, `base-2`, ...
pub fn unique_slug(base: &str, taken: &HashSet<String>) -> String {
    if !taken.contains(base) {
        return base.to_string();
    }
    let mut n: u64 = 1;
    loop {
        let candidate = format!("{base}-{n}");
        if !taken.contains(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

/// File extension for a MIME type (`image/png` -> `png`).
pub fn extension_for_mime(mime_type: &str) -> &str {
    match mime_type.rsplit('/').next() {
        Some(ext) if !ext.trim().is_empty() && mime_type.contains('/') => ext.trim(),
        _ => DEFAULT_EXTENSION,
    }
}

/// Filename offered to the browser for a download.
///
/// Convention: `{slugified title}_{resolution token or "original"}.{ext}`.
///
/// ```
/// use flicker_core::naming::download_filename;
///
/// assert_eq!(download_filename("Blue Lagoon", Some("4k"), "image/png"), "blue-lagoon_4k.png");
/// assert_eq!(download_filename("Blue Lagoon", None, ""), "blue-lagoon_original.jpg");
/// ```
pub fn download_filename(title: &str, res: Option<&str>, mime_type: &str) -> String {
    let res = res.filter(|r| !r.is_empty()).unwrap_or("original");
    format!("{}_{res}.{}", slugify(title), extension_for_mime(mime_type))
}
