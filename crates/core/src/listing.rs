//! Gallery listing: filter normalisation, sort keys and page math.
//!
//! The repository turns a [`ListingFilter`] into SQL; this module only decides
//! what the request parameters mean.

use std::num::IntErrorKind;

use serde::Serialize;

use crate::resolution::ResolutionFilter;

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Fixed number of wallpapers per listing page.
pub const PAGE_SIZE: i64 = 24;

/// Default sort key when none (or an unknown one) is given.
pub const DEFAULT_SORT: &str = "date";

/// Number of related wallpapers shown on a detail page.
pub const RELATED_LIMIT: i64 = 6;

// ---------------------------------------------------------------------------
// Sort
// ---------------------------------------------------------------------------

/// Listing order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SortKey {
    /// Newest first.
    #[default]
    Date,
    /// Most downloaded first.
    Downloads,
    /// Featured wallpapers only, newest first.
    Featured,
}

impl SortKey {
    /// Parse a `sort` token; anything unrecognised sorts by date.
    pub fn parse(token: &str) -> Self {
        match token.trim() {
            "downloads" => SortKey::Downloads,
            "featured" => SortKey::Featured,
            _ => SortKey::Date,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            SortKey::Date => "date",
            SortKey::Downloads => "downloads",
            SortKey::Featured => "featured",
        }
    }
}

// ---------------------------------------------------------------------------
// Filter
// ---------------------------------------------------------------------------

/// Normalised listing filter. `None` means "no restriction".
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ListingFilter {
    /// Free text matched against title, category and tags.
    pub query: Option<String>,
    /// Category, compared case-insensitively.
    pub category: Option<String>,
    /// Resolution restriction.
    pub resolution: Option<ResolutionFilter>,
    /// Device, compared exactly.
    pub device: Option<String>,
    pub sort: SortKey,
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

impl ListingFilter {
    /// Build a filter from raw request parameters. Values are trimmed and
    /// blank values are ignored.
    pub fn from_params(
        q: Option<&str>,
        cat: Option<&str>,
        res: Option<&str>,
        device: Option<&str>,
        sort: Option<&str>,
    ) -> Self {
        Self {
            query: non_empty(q),
            category: non_empty(cat),
            resolution: res.and_then(ResolutionFilter::parse),
            device: non_empty(device),
            sort: sort.map(SortKey::parse).unwrap_or_default(),
        }
    }

    /// `ILIKE` pattern for the free-text query, with LIKE metacharacters
    /// escaped so they match literally.
    pub fn query_pattern(&self) -> Option<String> {
        self.query.as_deref().map(like_contains_pattern)
    }

    /// Whether only featured wallpapers are listed.
    pub fn featured_only(&self) -> bool {
        self.sort == SortKey::Featured
    }
}

/// Build a `%...%` substring pattern, escaping `\`, `%` and `_`.
pub fn like_contains_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for c in text.chars() {
        if matches!(c, '\\' | '%' | '_') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

// ---------------------------------------------------------------------------
// Pagination
// ---------------------------------------------------------------------------

/// The resolved page of a listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageWindow {
    /// 1-based page number actually served.
    pub number: i64,
    /// Total number of pages (at least 1).
    pub num_pages: i64,
    #[serde(skip)]
    pub offset: i64,
    #[serde(skip)]
    pub limit: i64,
}

impl PageWindow {
    pub fn has_next(&self) -> bool {
        self.number < self.num_pages
    }

    pub fn has_previous(&self) -> bool {
        self.number > 1
    }
}

/// Resolve a raw `page` parameter against the total record count.
///
/// Missing or non-numeric input serves page 1. Numbers are clamped into
/// `1..=num_pages`. An empty result set still has one (empty) page.
pub fn resolve_page(raw: Option<&str>, total: i64, page_size: i64) -> PageWindow {
    let page_size = page_size.max(1);
    let total = total.max(0);
    let num_pages = ((total + page_size - 1) / page_size).max(1);

    let requested = raw.map(str::trim).and_then(parse_page).unwrap_or(1);
    let number = requested.clamp(1, num_pages);

    PageWindow {
        number,
        num_pages,
        offset: (number - 1) * page_size,
        limit: page_size,
    }
}

/// Numeric page tokens too large for `i64` saturate, so they still clamp
/// to the first or last page.
fn parse_page(token: &str) -> Option<i64> {
    match token.parse::<i64>() {
        Ok(n) => Some(n),
        Err(e) => match e.kind() {
            IntErrorKind::PosOverflow => Some(i64::MAX),
            IntErrorKind::NegOverflow => Some(i64::MIN),
            _ => None,
        },
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- SortKey -------------------------------------------------------------

    #[test]
    fn unknown_sort_defaults_to_date() {
        assert_eq!(SortKey::parse("popular"), SortKey::Date);
        assert_eq!(SortKey::parse(""), SortKey::Date);
        assert_eq!(SortKey::parse("downloads"), SortKey::Downloads);
        assert_eq!(SortKey::parse(" featured "), SortKey::Featured);
    }

    // -- ListingFilter -------------------------------------------------------

    #[test]
    fn blank_params_are_ignored() {
        let filter = ListingFilter::from_params(Some("  "), Some(""), Some(" "), None, None);
        assert_eq!(filter, ListingFilter::default());
    }

    #[test]
    fn params_are_trimmed() {
        let filter = ListingFilter::from_params(
            Some(" forest "),
            Some(" Nature"),
            Some("4k"),
            Some("mobile "),
            Some("downloads"),
        );
        assert_eq!(filter.query.as_deref(), Some("forest"));
        assert_eq!(filter.category.as_deref(), Some("Nature"));
        assert_eq!(filter.device.as_deref(), Some("mobile"));
        assert_eq!(filter.sort, SortKey::Downloads);
        assert!(matches!(
            filter.resolution,
            Some(ResolutionFilter::AtLeast { width: 3840, .. })
        ));
    }

    #[test]
    fn featured_sort_restricts_to_featured() {
        let filter = ListingFilter::from_params(None, None, None, None, Some("featured"));
        assert!(filter.featured_only());
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_contains_pattern("sun"), "%sun%");
        assert_eq!(like_contains_pattern("100%"), "%100\\%%");
        assert_eq!(like_contains_pattern("a_b\\c"), "%a\\_b\\\\c%");
    }

    // -- resolve_page --------------------------------------------------------

    #[test]
    fn fifty_records_make_three_pages() {
        let first = resolve_page(Some("1"), 50, PAGE_SIZE);
        assert_eq!(first.num_pages, 3);
        assert_eq!(first.offset, 0);
        assert!(first.has_next());
        assert!(!first.has_previous());

        let last = resolve_page(Some("3"), 50, PAGE_SIZE);
        assert_eq!(last.offset, 48);
        assert!(!last.has_next());
    }

    #[test]
    fn out_of_range_pages_clamp() {
        assert_eq!(resolve_page(Some("0"), 50, PAGE_SIZE).number, 1);
        assert_eq!(resolve_page(Some("-4"), 50, PAGE_SIZE).number, 1);
        assert_eq!(resolve_page(Some("100"), 50, PAGE_SIZE).number, 3);
    }

    #[test]
    fn overflowing_page_numbers_clamp() {
        let window = resolve_page(Some("99999999999999999999"), 50, PAGE_SIZE);
        assert_eq!(window.number, 3);
        assert_eq!(window.offset, 48);
        assert_eq!(
            resolve_page(Some("-99999999999999999999"), 50, PAGE_SIZE).number,
            1
        );
    }

    #[test]
    fn non_numeric_page_serves_first() {
        assert_eq!(resolve_page(Some("abc"), 50, PAGE_SIZE).number, 1);
        assert_eq!(resolve_page(None, 50, PAGE_SIZE).number, 1);
    }

    #[test]
    fn empty_listing_has_one_page() {
        let window = resolve_page(Some("7"), 0, PAGE_SIZE);
        assert_eq!(window.number, 1);
        assert_eq!(window.num_pages, 1);
        assert_eq!(window.offset, 0);
    }

    #[test]
    fn exact_multiple_has_no_extra_page() {
        assert_eq!(resolve_page(None, 48, PAGE_SIZE).num_pages, 2);
    }
}
