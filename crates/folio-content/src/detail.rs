//! Detail page loading and social-sharing metadata.

use serde::Serialize;

use folio_md::{first_image, first_text_block, parse_document, render_html, Frontmatter, ParsedDoc};

use crate::source::{ContentError, SourceFile, WorkSource};
use crate::work::{is_valid_slug, title_from_slug};

/// Open Graph type for every detail page.
pub const ARTICLE: &str = "article";

/// Metadata for link previews on social sites.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SocialMeta {
    pub title: String,
    pub description: String,
    /// Absolute image URL
    pub image: Option<String>,
    /// Absolute page URL
    pub url: String,
    #[serde(rename = "type")]
    pub kind: String,
}

/// Everything needed to render one detail page.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WorkPage {
    pub slug: String,

    /// Markdown body without frontmatter
    pub source: String,

    /// Body rendered to HTML
    pub html: String,

    pub meta: Frontmatter,

    pub social: SocialMeta,
}

/// Resolve `path` against the site origin. Absolute URLs pass through and
/// protocol-relative ones take the site's scheme.
pub fn absolute_url(site_url: &str, path: &str) -> String {
    if path.starts_with("http://") || path.starts_with("https://") {
        return path.to_string();
    }

    if path.starts_with("//") {
        let scheme = if site_url.starts_with("http://") {
            "http:"
        } else {
            "https:"
        };
        return format!("{}{}", scheme, path);
    }

    format!(
        "{}/{}",
        site_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

/// Site-relative path of a detail page, without a trailing slash.
pub fn work_path(slug: &str) -> String {
    format!("work/{}", urlencoding::encode(slug))
}

/// Derive social metadata from a parsed page.
pub fn social_meta(slug: &str, doc: &ParsedDoc, site_url: &str) -> SocialMeta {
    let fm = &doc.frontmatter;

    let title = fm.title().unwrap_or_else(|| title_from_slug(slug));
    let description = fm
        .description()
        .or_else(|| first_text_block(&doc.content))
        .unwrap_or_default();
    let image = fm
        .image()
        .or_else(|| first_image(&doc.content).map(|img| img.src))
        .map(|src| absolute_url(site_url, &src));

    SocialMeta {
        title,
        description,
        image,
        url: absolute_url(site_url, &work_path(slug)),
        kind: ARTICLE.to_string(),
    }
}

/// Build a detail page from its source file.
pub fn page_from_source(slug: &str, file: &SourceFile, site_url: &str) -> WorkPage {
    let doc = parse_document(&file.raw);
    let social = social_meta(slug, &doc, site_url);

    WorkPage {
        slug: slug.to_string(),
        html: render_html(&doc.content),
        source: doc.content,
        meta: doc.frontmatter,
        social,
    }
}

/// Load the detail page for `slug`.
///
/// Returns `Ok(None)` when no file matches or the slug is not a plain name.
pub fn load_work_page(
    source: &dyn WorkSource,
    slug: &str,
    site_url: &str,
) -> Result<Option<WorkPage>, ContentError> {
    if !is_valid_slug(slug) {
        tracing::debug!("Rejected slug {:?}", slug);
        return Ok(None);
    }

    let Some(file) = source.find_page(slug)? else {
        return Ok(None);
    };

    Ok(Some(page_from_source(slug, &file, site_url)))
}
