//! Resolution labels, aspect ratios and the `res` listing filter.
//!
//! Labels are orientation-agnostic: a 2160x3840 portrait image is as much
//! "4K" as a 3840x2160 landscape one.

/* --------------------------------------------------------------------------
Named constants
-------------------------------------------------------------------------- */

/// Label for 7680x4320 and above.
pub const LABEL_8K: &str = "8K";

/// Label for 3840x2160 and above.
pub const LABEL_4K: &str = "4K";

/// Label for 2560x1440 and above.
pub const LABEL_QHD: &str = "QHD";

/// Label for 1920x1080 and above.
pub const LABEL_FHD: &str = "FHD";

/// Label for 1280x720 and above.
pub const LABEL_HD: &str = "HD";

/// Tiers in strict precedence order: `(label, long side, short side)`.
const TIERS: &[(&str, i32, i32)] = &[
    (LABEL_8K, 7680, 4320),
    (LABEL_4K, 3840, 2160),
    (LABEL_QHD, 2560, 1440),
    (LABEL_FHD, 1920, 1080),
    (LABEL_HD, 1280, 720),
];

/* --------------------------------------------------------------------------
Classification
-------------------------------------------------------------------------- */

/// Classify known pixel dimensions into a tier label.
///
/// Returns the highest tier whose threshold is met in either orientation,
/// or the literal `"{w}x{h}"` when the image is below HD.
pub fn classify(width: i32, height: i32) -> String {
    TIERS
        .iter()
        .find(|(_, long, short)| {
            (width >= *long && height >= *short) || (height >= *long && width >= *short)
        })
        .map(|(label, _, _)| (*label).to_string())
        .unwrap_or_else(|| format!("{width}x{height}"))
}

/// Compute the stored resolution label for optional dimensions.
///
/// A label only exists when both dimensions are present and positive.
pub fn resolution_label(width: Option<i32>, height: Option<i32>) -> Option<String> {
    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => Some(classify(w, h)),
        _ => None,
    }
}

/// Reduce `width:height` by their greatest common divisor (e.g. `"16:9"`).
pub fn aspect_ratio(width: Option<i32>, height: Option<i32>) -> Option<String> {
    match (width, height) {
        (Some(w), Some(h)) if w > 0 && h > 0 => {
            let divisor = gcd(w, h);
            Some(format!("{}:{}", w / divisor, h / divisor))
        }
        _ => None,
    }
}

fn gcd(mut a: i32, mut b: i32) -> i32 {
    while b != 0 {
        let t = a % b;
        a = b;
        b = t;
    }
    a
}

/* --------------------------------------------------------------------------
Listing filter
-------------------------------------------------------------------------- */

/// How a `res` query token restricts the listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolutionFilter {
    /// Either dimension meets its threshold (`width >= w OR height >= h`).
    AtLeast { width: i32, height: i32 },
    /// The stored label equals this value, case-insensitively.
    Label(String),
}

impl ResolutionFilter {
    /// Interpret a `res` token. Empty tokens yield no filter.
    ///
    /// `4k` and `8k` are threshold filters; every other token is compared
    /// against the stored label.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.trim();
        if token.is_empty() {
            return None;
        }
        match token.to_lowercase().as_str() {
            "4k" => Some(Self::AtLeast {
                width: 3840,
                height: 2160,
            }),
            "8k" => Some(Self::AtLeast {
                width: 7680,
                height: 4320,
            }),
            _ => Some(Self::Label(token.to_string())),
        }
    }
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    // -- classify --

    #[test]
    fn exact_tier_thresholds() {
        assert_eq!(classify(7680, 4320), "8K");
        assert_eq!(classify(3840, 2160), "4K");
        assert_eq!(classify(2560, 1440), "QHD");
        assert_eq!(classify(1920, 1080), "FHD");
        assert_eq!(classify(1280, 720), "HD");
    }

    #[test]
    fn portrait_orientation_matches_same_tier() {
        assert_eq!(classify(4320, 7680), "8K");
        assert_eq!(classify(2160, 3840), "4K");
        assert_eq!(classify(1080, 2400), "FHD");
        assert_eq!(classify(720, 1280), "HD");
    }

    #[test]
    fn just_below_each_tier_falls_to_next() {
        assert_eq!(classify(7679, 4320), "4K");
        assert_eq!(classify(7680, 4319), "4K");
        assert_eq!(classify(3839, 2160), "QHD");
        assert_eq!(classify(2560, 1439), "FHD");
        assert_eq!(classify(1919, 1080), "HD");
    }

    #[test]
    fn below_hd_returns_literal_dimensions() {
        assert_eq!(classify(1279, 720), "1279x720");
        assert_eq!(classify(800, 600), "800x600");
    }

    #[test]
    fn oversized_images_stay_8k() {
        assert_eq!(classify(15360, 8640), "8K");
    }

    // -- resolution_label --

    #[test]
    fn label_requires_both_dimensions() {
        assert_eq!(resolution_label(Some(1920), None), None);
        assert_eq!(resolution_label(None, Some(1080)), None);
        assert_eq!(resolution_label(Some(0), Some(1080)), None);
        assert_eq!(resolution_label(Some(1920), Some(1080)), Some("FHD".into()));
    }

    // -- aspect_ratio --

    #[test]
    fn aspect_ratio_reduces_by_gcd() {
        assert_eq!(aspect_ratio(Some(1920), Some(1080)), Some("16:9".into()));
        assert_eq!(aspect_ratio(Some(1080), Some(2400)), Some("9:20".into()));
        assert_eq!(aspect_ratio(Some(1000), Some(1000)), Some("1:1".into()));
    }

    #[test]
    fn aspect_ratio_undefined_without_dimensions() {
        assert_eq!(aspect_ratio(None, Some(1080)), None);
        assert_eq!(aspect_ratio(Some(1920), Some(0)), None);
    }

    // -- ResolutionFilter --

    #[test]
    fn threshold_tokens_are_case_insensitive() {
        assert_eq!(
            ResolutionFilter::parse("4K"),
            Some(ResolutionFilter::AtLeast {
                width: 3840,
                height: 2160
            })
        );
        assert_eq!(
            ResolutionFilter::parse("8k"),
            Some(ResolutionFilter::AtLeast {
                width: 7680,
                height: 4320
            })
        );
    }

    #[test]
    fn other_tokens_compare_labels() {
        assert_eq!(
            ResolutionFilter::parse(" qhd "),
            Some(ResolutionFilter::Label("qhd".into()))
        );
        assert_eq!(ResolutionFilter::parse("   "), None);
    }
}
