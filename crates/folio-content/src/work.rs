//! Work list loading.

use std::sync::LazyLock;

use chrono::{DateTime, Utc};
use regex::Regex;
use serde::Serialize;

use folio_md::{extract_preview, parse_document, Preview};

use crate::dates::sort_newest_first;
use crate::source::{ContentError, SourceFile, WorkSource};

static SEPARATOR_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-_]+").expect("Invalid separator regex"));

/// Summary of a work entry for the list view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct WorkEntry {
    /// File name without the `.md` extension
    pub slug: String,

    /// Frontmatter title, or one derived from the slug
    pub title: String,

    /// Free-form date or date range, empty when absent
    pub date: String,

    /// Representative content
    pub body: Preview,
}

/// Slug for a source path: the file name without `.md`.
pub fn slug_from_path(path: &str) -> String {
    let name = path.rsplit('/').next().unwrap_or(path);
    name.strip_suffix(".md").unwrap_or(name).to_string()
}

/// Human title for a slug: `weather-station_v2` becomes `Weather Station V2`.
pub fn title_from_slug(slug: &str) -> String {
    let spaced = SEPARATOR_RE.replace_all(slug, " ");

    let mut title = String::with_capacity(spaced.len());
    let mut in_word = false;

    for c in spaced.chars() {
        let is_word = c.is_alphanumeric();
        if is_word && !in_word {
            title.extend(c.to_uppercase());
        } else {
            title.push(c);
        }
        in_word = is_word;
    }

    title
}

/// Whether a requested slug names a single file in the content root.
pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('.')
        && !slug.contains(|c: char| matches!(c, '/' | '\\' | '\0'))
}

/// Build the list summary for one source file.
pub fn entry_from_source(file: &SourceFile) -> WorkEntry {
    let doc = parse_document(&file.raw);
    let slug = slug_from_path(&file.path);

    WorkEntry {
        title: doc
            .frontmatter
            .title()
            .unwrap_or_else(|| title_from_slug(&slug)),
        date: doc.frontmatter.date().unwrap_or_default(),
        body: extract_preview(&doc.content),
        slug,
    }
}

/// Load all work entries, newest first.
pub fn load_work_list(source: &dyn WorkSource) -> Result<Vec<WorkEntry>, ContentError> {
    load_work_list_at(source, Utc::now())
}

/// Load all work entries, newest first, resolving ongoing ranges against `now`.
pub fn load_work_list_at(
    source: &dyn WorkSource,
    now: DateTime<Utc>,
) -> Result<Vec<WorkEntry>, ContentError> {
    let entries: Vec<WorkEntry> = source
        .work_files()?
        .iter()
        .map(entry_from_source)
        .filter(|entry| {
            let valid = is_valid_slug(&entry.slug);
            if !valid {
                tracing::debug!("Skipping work entry with unusable slug {:?}", entry.slug);
            }
            valid
        })
        .collect();

    tracing::debug!("Loaded {} work entries", entries.len());

    Ok(sort_newest_first(entries, |e| e.date.as_str(), now))
}
