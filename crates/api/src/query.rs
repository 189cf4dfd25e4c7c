//! Query parameter types for API handlers.
//!
//! Values are taken as raw strings so that malformed input (e.g.
//! `?page=abc`) degrades to defaults instead of rejecting the request.

use flicker_core::listing::ListingFilter;
use serde::Deserialize;

/// Gallery listing parameters (`?q=&cat=&res=&device=&sort=&page=`).
#[derive(Debug, Default, Deserialize)]
pub struct ListingParams {
    pub q: Option<String>,
    pub cat: Option<String>,
    pub res: Option<String>,
    pub device: Option<String>,
    pub sort: Option<String>,
    pub page: Option<String>,
}

impl ListingParams {
    pub fn filter(&self) -> ListingFilter {
        ListingFilter::from_params(
            self.q.as_deref(),
            self.cat.as_deref(),
            self.res.as_deref(),
            self.device.as_deref(),
            self.sort.as_deref(),
        )
    }
}

/// Download parameters (`?res=`).
#[derive(Debug, Default, Deserialize)]
pub struct DownloadParams {
    pub res: Option<String>,
}
