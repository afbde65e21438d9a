//! Configuration file (folio.toml).

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

use folio_static::{BuildConfig, SiteContext};

#[derive(Debug, Deserialize, Default)]
pub struct ConfigFile {
    #[serde(default)]
    pub site: SiteSettings,
    #[serde(default)]
    pub content: ContentSettings,
    #[serde(default)]
    pub build: BuildSettings,
    #[serde(default)]
    pub server: ServerSettings,
}

#[derive(Debug, Deserialize)]
pub struct SiteSettings {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Absolute origin used in social metadata
    #[serde(default = "default_url")]
    pub url: String,
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Paths to extra CSS stylesheets to include
    #[serde(default)]
    pub styles: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct ContentSettings {
    #[serde(default = "default_content_dir")]
    pub dir: String,
}

#[derive(Debug, Deserialize)]
pub struct BuildSettings {
    #[serde(default = "default_output")]
    pub output: String,
    #[serde(default = "default_minify")]
    pub minify: bool,
}

#[derive(Debug, Deserialize)]
pub struct ServerSettings {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
}

impl Default for SiteSettings {
    fn default() -> Self {
        Self {
            title: default_title(),
            description: String::new(),
            url: default_url(),
            base_url: default_base_url(),
            styles: vec![],
        }
    }
}

impl Default for ContentSettings {
    fn default() -> Self {
        Self {
            dir: default_content_dir(),
        }
    }
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            output: default_output(),
            minify: default_minify(),
        }
    }
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

fn default_title() -> String {
    "Portfolio".to_string()
}
fn default_url() -> String {
    "http://localhost:7777".to_string()
}
fn default_base_url() -> String {
    "/".to_string()
}
fn default_content_dir() -> String {
    "content".to_string()
}
fn default_output() -> String {
    "dist".to_string()
}
fn default_minify() -> bool {
    true
}
fn default_host() -> String {
    "127.0.0.1".to_string()
}
fn default_port() -> u16 {
    7777
}

impl ConfigFile {
    /// Site values for templates.
    pub fn site_context(&self) -> SiteContext {
        SiteContext {
            title: self.site.title.clone(),
            description: self.site.description.clone(),
            base_url: self.site.base_url.clone(),
            site_url: self.site.url.clone(),
            styles: self.site.styles.clone(),
            live_reload: false,
        }
    }

    /// Settings for the static builder.
    pub fn build_config(&self, output: Option<PathBuf>, minify: Option<bool>) -> BuildConfig {
        BuildConfig {
            content_dir: PathBuf::from(&self.content.dir),
            output_dir: output.unwrap_or_else(|| PathBuf::from(&self.build.output)),
            minify: minify.unwrap_or(self.build.minify),
            base_url: self.site.base_url.clone(),
            site_url: self.site.url.clone(),
            title: self.site.title.clone(),
            description: self.site.description.clone(),
            styles: self.site.styles.clone(),
        }
    }
}

/// Load configuration from `path` if it exists.
/// Returns an error if the config file exists but is malformed.
pub fn load_config(path: &Path) -> Result<ConfigFile> {
    if !path.exists() {
        tracing::debug!("No config at {}, using defaults", path.display());
        return Ok(ConfigFile::default());
    }

    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&content)
        .with_context(|| format!("Failed to parse {}", path.display()))?;

    tracing::info!("Loaded config from {}", path.display());
    Ok(config)
}
