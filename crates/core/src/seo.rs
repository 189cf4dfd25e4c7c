//! robots.txt and sitemap.xml generation.
//!
//! The sitemap follows the sitemaps.org 0.9 protocol with the Google image
//! extension. Every inserted value goes through [`xml_escape`].

use chrono::NaiveDate;

use crate::wallpaper::{split_tags, Category, Device};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

pub const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";
pub const IMAGE_NS: &str = "http://www.google.com/schemas/sitemap-image/1.1";

/// Number of tags folded into a generated image title.
const TITLE_TAG_COUNT: usize = 3;

/// Static informational pages: `(path, change frequency, priority)`.
pub const STATIC_PAGES: &[(&str, ChangeFreq, &str)] = &[
    ("/", ChangeFreq::Daily, "1.0"),
    ("/about/", ChangeFreq::Monthly, "0.5"),
    ("/privacy/", ChangeFreq::Monthly, "0.5"),
    ("/terms/", ChangeFreq::Monthly, "0.5"),
    ("/contact/", ChangeFreq::Monthly, "0.5"),
];

/// Priority of a wallpaper detail page.
pub const DETAIL_PRIORITY: &str = "0.8";

// ---------------------------------------------------------------------------
// robots.txt
// ---------------------------------------------------------------------------

/// The robots.txt body for a site rooted at `site_url`.
pub fn robots_txt(site_url: &str) -> String {
    format!(
        "User-agent: *\n\
         Disallow: /admin/\n\
         Disallow: /upload/\n\
         Allow: /\n\
         \n\
         Sitemap: {}/sitemap.xml\n",
        site_url.trim_end_matches('/')
    )
}

// ---------------------------------------------------------------------------
// Sitemap model
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChangeFreq {
    Daily,
    Weekly,
    Monthly,
}

impl ChangeFreq {
    pub fn as_str(self) -> &'static str {
        match self {
            ChangeFreq::Daily => "daily",
            ChangeFreq::Weekly => "weekly",
            ChangeFreq::Monthly => "monthly",
        }
    }
}

/// `<image:image>` block of a sitemap entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapImage {
    pub loc: String,
    pub title: String,
    pub caption: String,
}

/// One `<url>` entry.
#[derive(Debug, Clone, PartialEq)]
pub struct SitemapEntry {
    pub loc: String,
    pub lastmod: Option<NaiveDate>,
    pub changefreq: ChangeFreq,
    pub priority: &'static str,
    pub image: Option<SitemapImage>,
}

/// The wallpaper fields a sitemap entry is built from.
#[derive(Debug, Clone)]
pub struct SitemapSource<'a> {
    pub slug: &'a str,
    pub title: &'a str,
    pub tags: &'a str,
    pub category: &'a str,
    pub device: &'a str,
    pub resolution_label: &'a str,
    pub image_url: &'a str,
    pub updated: Option<NaiveDate>,
}

/// Entries for the static pages of a site.
pub fn static_entries(site_url: &str) -> Vec<SitemapEntry> {
    let base = site_url.trim_end_matches('/');
    STATIC_PAGES
        .iter()
        .map(|(path, changefreq, priority)| SitemapEntry {
            loc: format!("{base}{path}"),
            lastmod: None,
            changefreq: *changefreq,
            priority: *priority,
            image: None,
        })
        .collect()
}

/// Entry for one wallpaper detail page, including its image block.
pub fn wallpaper_entry(site_url: &str, source: &SitemapSource<'_>) -> SitemapEntry {
    let base = site_url.trim_end_matches('/');
    let image = (!source.image_url.is_empty()).then(|| SitemapImage {
        loc: source.image_url.to_string(),
        title: image_title(source.title, source.tags),
        caption: image_caption(source),
    });
    SitemapEntry {
        loc: format!("{base}/w/{}/", source.slug),
        lastmod: source.updated,
        changefreq: ChangeFreq::Weekly,
        priority: DETAIL_PRIORITY,
        image,
    }
}

/// SEO title: the wallpaper title followed by its first few tags.
pub fn image_title(title: &str, tags: &str) -> String {
    let top: Vec<String> = split_tags(tags).into_iter().take(TITLE_TAG_COUNT).collect();
    if top.is_empty() {
        format!("{title} Wallpaper")
    } else {
        format!("{title} Wallpaper - {}", top.join(", "))
    }
}

/// SEO caption describing resolution, category and device.
pub fn image_caption(source: &SitemapSource<'_>) -> String {
    let mut caption = format!("Download {}", source.title);
    if !source.resolution_label.is_empty() {
        caption.push(' ');
        caption.push_str(source.resolution_label);
    }
    if let Some(category) = Category::from_value(source.category) {
        caption.push(' ');
        caption.push_str(category.label());
    }
    caption.push_str(" wallpaper");
    if let Some(device) = Device::from_value(source.device) {
        caption.push_str(" for ");
        caption.push_str(device.label());
    }
    caption.push_str(", free in full quality.");
    caption
}

// ---------------------------------------------------------------------------
// XML emission
// ---------------------------------------------------------------------------

/// Escape the five XML special characters.
pub fn xml_escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            other => out.push(other),
        }
    }
    out
}

/// Render a complete sitemap document.
pub fn render_sitemap(entries: &[SitemapEntry]) -> String {
    let mut xml = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
    xml.push_str(&format!(
        "<urlset xmlns=\"{SITEMAP_NS}\" xmlns:image=\"{IMAGE_NS}\">\n"
    ));

    for entry in entries {
        xml.push_str("  <url>\n");
        xml.push_str(&format!("    <loc>{}</loc>\n", xml_escape(&entry.loc)));
        if let Some(lastmod) = entry.lastmod {
            xml.push_str(&format!(
                "    <lastmod>{}</lastmod>\n",
                lastmod.format("%Y-%m-%d")
            ));
        }
        xml.push_str(&format!(
            "    <changefreq>{}</changefreq>\n",
            entry.changefreq.as_str()
        ));
        xml.push_str(&format!("    <priority>{}</priority>\n", entry.priority));
        if let Some(image) = &entry.image {
            xml.push_str("    <image:image>\n");
            xml.push_str(&format!(
                "      <image:loc>{}</image:loc>\n",
                xml_escape(&image.loc)
            ));
            xml.push_str(&format!(
                "      <image:title>{}</image:title>\n",
                xml_escape(&image.title)
            ));
            xml.push_str(&format!(
                "      <image:caption>{}</image:caption>\n",
                xml_escape(&image.caption)
            ));
            xml.push_str("    </image:image>\n");
        }
        xml.push_str("  </url>\n");
    }

    xml.push_str("</urlset>\n");
    xml
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn source<'a>(title: &'a str, tags: &'a str) -> SitemapSource<'a> {
        SitemapSource {
            slug: "neon-city",
            title,
            tags,
            category: "cityscape",
            device: "mobile",
            resolution_label: "4K",
            image_url: "https://res.example.com/image/upload/v1/wallpapers/neon.jpg",
            updated: NaiveDate::from_ymd_opt(2026, 3, 14),
        }
    }

    // -- robots --------------------------------------------------------------

    #[test]
    fn robots_names_sitemap_and_disallows() {
        let body = robots_txt("https://flicker.example.com/");
        assert!(body.contains("Disallow: /admin/\n"));
        assert!(body.contains("Disallow: /upload/\n"));
        assert!(body.contains("Allow: /\n"));
        assert!(body.ends_with("Sitemap: https://flicker.example.com/sitemap.xml\n"));
        assert!(body.starts_with("User-agent: *\n"));
    }

    // -- escaping ------------------------------------------------------------

    #[test]
    fn escapes_all_special_characters() {
        assert_eq!(
            xml_escape(r#"<Tom & "Jerry's">"#),
            "&lt;Tom &amp; &quot;Jerry&apos;s&quot;&gt;"
        );
        assert_eq!(xml_escape("plain"), "plain");
    }

    // -- titles & captions ---------------------------------------------------

    #[test]
    fn image_title_uses_top_three_tags() {
        assert_eq!(
            image_title("Neon City", "night, rain, neon, cyberpunk"),
            "Neon City Wallpaper - night, rain, neon"
        );
        assert_eq!(image_title("Neon City", ""), "Neon City Wallpaper");
    }

    #[test]
    fn caption_mentions_resolution_category_device() {
        let caption = image_caption(&source("Neon City", ""));
        assert_eq!(
            caption,
            "Download Neon City 4K Cityscape wallpaper for Mobile, free in full quality."
        );
    }

    // -- entries & rendering -------------------------------------------------

    #[test]
    fn static_entries_cover_informational_pages() {
        let entries = static_entries("https://flicker.example.com/");
        let locs: Vec<&str> = entries.iter().map(|e| e.loc.as_str()).collect();
        assert_eq!(locs[0], "https://flicker.example.com/");
        assert!(locs.contains(&"https://flicker.example.com/about/"));
        assert!(locs.contains(&"https://flicker.example.com/contact/"));
        assert_eq!(entries[0].priority, "1.0");
    }

    #[test]
    fn wallpaper_entry_points_at_detail_page() {
        let entry = wallpaper_entry("https://flicker.example.com", &source("Neon City", "night"));
        assert_eq!(entry.loc, "https://flicker.example.com/w/neon-city/");
        assert_eq!(entry.changefreq, ChangeFreq::Weekly);
        assert!(entry.image.is_some());
    }

    #[test]
    fn rendered_sitemap_escapes_titles() {
        let entry = wallpaper_entry(
            "https://flicker.example.com",
            &source("Cats <3 & Dogs > Birds", "a&b"),
        );
        let xml = render_sitemap(&[entry]);

        assert!(xml.contains("Cats &lt;3 &amp; Dogs &gt; Birds Wallpaper - a&amp;b"));
        assert!(!xml.contains("Cats <3"));
        assert!(xml.contains("<lastmod>2026-03-14</lastmod>"));
        assert!(xml.contains("xmlns:image=\"http://www.google.com/schemas/sitemap-image/1.1\""));
        assert!(xml.trim_end().ends_with("</urlset>"));
    }

    #[test]
    fn rendered_sitemap_is_well_formed_xml() {
        let title = r#"Tom & "Jerry's" <Chase>"#;
        let mut entries = static_entries("https://flicker.example.com");
        entries.push(wallpaper_entry(
            "https://flicker.example.com",
            &source(title, "a&b, <c>"),
        ));
        let xml = render_sitemap(&entries);

        let doc = roxmltree::Document::parse(&xml).expect("sitemap should parse");
        let root = doc.root_element();
        assert!(root.has_tag_name((SITEMAP_NS, "urlset")));

        let urls = root
            .children()
            .filter(|n| n.has_tag_name((SITEMAP_NS, "url")))
            .count();
        assert_eq!(urls, STATIC_PAGES.len() + 1);

        let text_of = |name: &str| {
            doc.descendants()
                .find(|n| n.has_tag_name((IMAGE_NS, name)))
                .and_then(|n| n.text())
                .map(str::to_string)
        };
        assert_eq!(
            text_of("title").as_deref(),
            Some(r#"Tom & "Jerry's" <Chase> Wallpaper - a&b, <c>"#)
        );
        let caption = text_of("caption").unwrap();
        assert!(caption.starts_with(r#"Download Tom & "Jerry's" <Chase>"#));
    }

    #[test]
    fn entries_without_lastmod_omit_the_tag() {
        let xml = render_sitemap(&static_entries("https://flicker.example.com"));
        assert!(!xml.contains("<lastmod>"));
        assert_eq!(xml.matches("<url>").count(), STATIC_PAGES.len());
    }
}
