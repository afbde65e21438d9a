//! Where markdown sources come from.
//!
//! A content root holds work entries under `work/` and standalone pages at
//! the top level. Sources are read fresh on every call.

use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

/// Subdirectory holding work entries.
pub const WORK_DIR: &str = "work";

/// Whether a file name is a markdown page. Hidden files are not.
fn is_page_name(name: &str) -> bool {
    !name.starts_with('.') && name.ends_with(".md")
}

/// A markdown file read from a source.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Path relative to the content root, `/`-separated
    pub path: String,

    /// Raw file contents, frontmatter included
    pub raw: String,
}

/// Errors that can occur while reading content.
#[derive(Debug, thiserror::Error)]
pub enum ContentError {
    #[error("Failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to scan {path}: {message}")]
    Scan { path: PathBuf, message: String },
}

/// A read-only collection of markdown files.
pub trait WorkSource: Send + Sync {
    /// All markdown files directly inside the work directory.
    fn work_files(&self) -> Result<Vec<SourceFile>, ContentError>;

    /// The file for a page slug, preferring `work/<slug>.md` over `<slug>.md`.
    fn find_page(&self, slug: &str) -> Result<Option<SourceFile>, ContentError>;
}

/// Markdown files on disk.
#[derive(Debug, Clone)]
pub struct DirSource {
    root: PathBuf,
}

impl DirSource {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn read(&self, path: &Path, relative: String) -> Result<SourceFile, ContentError> {
        let raw = fs::read_to_string(path).map_err(|e| ContentError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(SourceFile {
            path: relative,
            raw,
        })
    }
}

impl WorkSource for DirSource {
    fn work_files(&self) -> Result<Vec<SourceFile>, ContentError> {
        let work_dir = self.root.join(WORK_DIR);

        if !work_dir.is_dir() {
            tracing::debug!("No work directory at {}", work_dir.display());
            return Ok(Vec::new());
        }

        let mut files = Vec::new();

        for entry in WalkDir::new(&work_dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(true)
            .sort_by_file_name()
        {
            let entry = match entry {
                Ok(entry) => entry,
                Err(e) if e.depth() == 0 => {
                    return Err(ContentError::Scan {
                        path: work_dir,
                        message: e.to_string(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Skipping unreadable entry: {}", e);
                    continue;
                }
            };
            let path = entry.path();

            if !path.is_file() {
                continue;
            }

            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                tracing::warn!("Skipping non UTF-8 file name: {}", path.display());
                continue;
            };

            if !is_page_name(name) {
                continue;
            }

            match self.read(path, format!("{}/{}", WORK_DIR, name)) {
                Ok(file) => files.push(file),
                Err(e) => tracing::warn!("Skipping work entry: {}", e),
            }
        }

        Ok(files)
    }

    fn find_page(&self, slug: &str) -> Result<Option<SourceFile>, ContentError> {
        let candidates = [
            (
                self.root.join(WORK_DIR).join(format!("{}.md", slug)),
                format!("{}/{}.md", WORK_DIR, slug),
            ),
            (
                self.root.join(format!("{}.md", slug)),
                format!("{}.md", slug),
            ),
        ];

        for (path, relative) in candidates {
            if path.is_file() {
                return self.read(&path, relative).map(Some);
            }
        }

        Ok(None)
    }
}

/// Markdown files held in memory, keyed by path relative to the content root.
#[derive(Debug, Clone, Default)]
pub struct BundleSource {
    files: BTreeMap<String, String>,
}

impl BundleSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a file, builder style.
    pub fn with_file(mut self, path: impl Into<String>, raw: impl Into<String>) -> Self {
        self.insert(path, raw);
        self
    }

    pub fn insert(&mut self, path: impl Into<String>, raw: impl Into<String>) {
        self.files.insert(path.into(), raw.into());
    }

    fn get(&self, path: String) -> Option<SourceFile> {
        self.files.get(&path).map(|raw| SourceFile {
            path,
            raw: raw.clone(),
        })
    }
}

impl WorkSource for BundleSource {
    fn work_files(&self) -> Result<Vec<SourceFile>, ContentError> {
        let prefix = format!("{}/", WORK_DIR);

        Ok(self
            .files
            .iter()
            .filter(|(path, _)| {
                path.strip_prefix(&prefix)
                    .is_some_and(|name| !name.contains('/') && is_page_name(name))
            })
            .map(|(path, raw)| SourceFile {
                path: path.clone(),
                raw: raw.clone(),
            })
            .collect())
    }

    fn find_page(&self, slug: &str) -> Result<Option<SourceFile>, ContentError> {
        Ok(self
            .get(format!("{}/{}.md", WORK_DIR, slug))
            .or_else(|| self.get(format!("{}.md", slug))))
    }
}
