//! Static site builder.

use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Instant;

use rayon::prelude::*;
use walkdir::WalkDir;

use folio_content::{
    absolute_url, is_valid_slug, load_work_list, load_work_page, slug_from_path, work_path,
    ContentError, DirSource, WorkEntry,
};

use crate::assets::AssetPipeline;
use crate::templates::{SiteContext, TemplateEngine};

/// Directory under the content root copied verbatim into the output.
pub const STATIC_DIR: &str = "static";

/// Configuration for building a static site.
#[derive(Debug, Clone)]
pub struct BuildConfig {
    /// Content root with `work/` and standalone pages
    pub content_dir: PathBuf,

    /// Output directory
    pub output_dir: PathBuf,

    /// Minify CSS output
    pub minify: bool,

    /// Base URL for links
    pub base_url: String,

    /// Absolute site origin for social metadata and the sitemap
    pub site_url: String,

    /// Site title
    pub title: String,

    /// Site description
    pub description: String,

    /// Paths to extra CSS stylesheets to include
    pub styles: Vec<String>,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            content_dir: PathBuf::from("content"),
            output_dir: PathBuf::from("dist"),
            minify: true,
            base_url: "/".to_string(),
            site_url: "http://localhost:7777".to_string(),
            title: "Portfolio".to_string(),
            description: String::new(),
            styles: vec![],
        }
    }
}

/// Result of a build operation.
#[derive(Debug)]
pub struct BuildResult {
    /// Number of pages generated, list page included
    pub pages: usize,

    /// Number of work entries listed
    pub works: usize,

    /// Total build time in milliseconds
    pub duration_ms: u64,

    /// Output directory
    pub output_dir: PathBuf,
}

/// Errors that can occur during build.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("Failed to read content: {0}")]
    ReadError(String),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error("Failed to render template: {0}")]
    TemplateError(String),

    #[error("Failed to write output: {0}")]
    WriteError(String),
}

/// Static site builder.
pub struct StaticBuilder {
    config: BuildConfig,
    source: DirSource,
    templates: TemplateEngine,
}

impl StaticBuilder {
    /// Create a new static builder.
    pub fn new(config: BuildConfig) -> Self {
        Self {
            source: DirSource::new(&config.content_dir),
            config,
            templates: TemplateEngine::new(),
        }
    }

    /// Build the static site.
    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        let start = Instant::now();

        if !self.config.content_dir.is_dir() {
            return Err(BuildError::ReadError(format!(
                "Content directory not found: {}",
                self.config.content_dir.display()
            )));
        }

        fs::create_dir_all(&self.config.output_dir)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        let site = self.site_context();
        let works = load_work_list(&self.source)?;

        // List page
        let list_html = self
            .templates
            .render_list(&site, &works)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;
        write_file(&self.config.output_dir.join("index.html"), list_html)?;

        let not_found_html = self
            .templates
            .render_not_found(&site, "")
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;
        write_file(&self.config.output_dir.join("404.html"), not_found_html)?;

        // Detail pages render independently
        let slugs = self.page_slugs(&works);
        let results: Vec<Result<(), BuildError>> = slugs
            .par_iter()
            .map(|slug| self.build_page(slug, &site))
            .collect();

        for result in results {
            result?;
        }

        self.generate_assets()?;
        self.copy_static()?;
        self.generate_works_json(&works)?;
        self.generate_sitemap(&slugs)?;

        let duration = start.elapsed();

        Ok(BuildResult {
            pages: slugs.len() + 1,
            works: works.len(),
            duration_ms: duration.as_millis() as u64,
            output_dir: self.config.output_dir.clone(),
        })
    }

    fn site_context(&self) -> SiteContext {
        SiteContext {
            title: self.config.title.clone(),
            description: self.config.description.clone(),
            base_url: self.config.base_url.clone(),
            site_url: self.config.site_url.clone(),
            styles: self
                .config
                .styles
                .iter()
                .map(|s| format!("{}assets/{}", self.config.base_url, style_file_name(s)))
                .collect(),
            live_reload: false,
        }
    }

    /// Slugs with a detail page: work entries, then standalone pages at the
    /// content root that no work entry shadows.
    fn page_slugs(&self, works: &[WorkEntry]) -> Vec<String> {
        let mut seen: HashSet<String> = works.iter().map(|w| w.slug.clone()).collect();
        let mut slugs: Vec<String> = works.iter().map(|w| w.slug.clone()).collect();

        for entry in WalkDir::new(&self.config.content_dir)
            .min_depth(1)
            .max_depth(1)
            .sort_by_file_name()
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() || path.extension().and_then(|e| e.to_str()) != Some("md") {
                continue;
            }
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };

            let slug = slug_from_path(name);
            if !is_valid_slug(&slug) {
                continue;
            }
            if seen.insert(slug.clone()) {
                slugs.push(slug);
            }
        }

        slugs
    }

    /// Build a single detail page.
    fn build_page(&self, slug: &str, site: &SiteContext) -> Result<(), BuildError> {
        let Some(page) = load_work_page(&self.source, slug, &self.config.site_url)? else {
            tracing::warn!("Page disappeared during build: {}", slug);
            return Ok(());
        };

        let html = self
            .templates
            .render_work(site, &page)
            .map_err(|e| BuildError::TemplateError(e.to_string()))?;

        let output_path = self
            .config
            .output_dir
            .join("work")
            .join(slug)
            .join("index.html");

        tracing::debug!("Writing {}", output_path.display());
        write_file(&output_path, html)
    }

    /// Generate stylesheets.
    fn generate_assets(&self) -> Result<(), BuildError> {
        let assets_dir = self.config.output_dir.join("assets");
        fs::create_dir_all(&assets_dir).map_err(|e| BuildError::WriteError(e.to_string()))?;

        write_file(
            &assets_dir.join("main.css"),
            AssetPipeline::main_css(self.config.minify),
        )?;

        // Copy configured stylesheets
        for style_path in &self.config.styles {
            let source_path = PathBuf::from(style_path);
            if source_path.exists() {
                let content = fs::read_to_string(&source_path).map_err(|e| {
                    BuildError::ReadError(format!("Failed to read stylesheet: {}", e))
                })?;
                write_file(&assets_dir.join(style_file_name(style_path)), content)?;
                tracing::info!("Copied stylesheet from {}", style_path);
            } else {
                tracing::warn!("Stylesheet not found: {}", style_path);
            }
        }

        Ok(())
    }

    /// Copy `<content>/static` into the output.
    fn copy_static(&self) -> Result<usize, BuildError> {
        let static_dir = self.config.content_dir.join(STATIC_DIR);
        if !static_dir.is_dir() {
            return Ok(0);
        }

        let mut copied = 0;

        for entry in WalkDir::new(&static_dir)
            .follow_links(true)
            .into_iter()
            .filter_map(|e| e.ok())
        {
            let path = entry.path();
            if !path.is_file() {
                continue;
            }

            let relative = path.strip_prefix(&static_dir).unwrap_or(path);
            let target = self.config.output_dir.join(STATIC_DIR).join(relative);

            if let Some(parent) = target.parent() {
                fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
            }
            fs::copy(path, &target).map_err(|e| BuildError::WriteError(e.to_string()))?;
            copied += 1;
        }

        tracing::info!("Copied {} static files", copied);
        Ok(copied)
    }

    /// Write the list data as JSON.
    fn generate_works_json(&self, works: &[WorkEntry]) -> Result<(), BuildError> {
        let json = serde_json::to_string_pretty(works)
            .map_err(|e| BuildError::WriteError(e.to_string()))?;

        write_file(&self.config.output_dir.join("works.json"), json)
    }

    /// Generate sitemap.
    fn generate_sitemap(&self, slugs: &[String]) -> Result<(), BuildError> {
        let site = &self.config.site_url;

        let urls: Vec<String> = std::iter::once(absolute_url(site, ""))
            .chain(
                slugs
                    .iter()
                    .map(|slug| absolute_url(site, &format!("{}/", work_path(slug)))),
            )
            .map(|url| format!("  <url>\n    <loc>{}</loc>\n  </url>", xml_escape(&url)))
            .collect();

        let sitemap = format!(
            r#"<?xml version="1.0" encoding="UTF-8"?>
<urlset xmlns="http://www.sitemaps.org/schemas/sitemap/0.9">
{}
</urlset>"#,
            urls.join("\n")
        );

        write_file(&self.config.output_dir.join("sitemap.xml"), sitemap)?;

        // Also generate robots.txt
        let robots = format!(
            "User-agent: *\nAllow: /\nSitemap: {}",
            absolute_url(site, "sitemap.xml")
        );
        write_file(&self.config.output_dir.join("robots.txt"), robots)
    }
}

fn style_file_name(path: &str) -> &str {
    Path::new(path)
        .file_name()
        .and_then(|f| f.to_str())
        .unwrap_or("style.css")
}

fn write_file(path: &Path, contents: impl AsRef<[u8]>) -> Result<(), BuildError> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).map_err(|e| BuildError::WriteError(e.to_string()))?;
    }
    fs::write(path, contents)
        .map_err(|e| BuildError::WriteError(format!("{}: {}", path.display(), e)))
}

fn xml_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
