//! Frontmatter extraction and parsing.

use serde::{Deserialize, Serialize};
use serde_yaml::{Mapping, Value};

/// Open-ended key-value metadata from the top of a markdown file.
///
/// Keys are read opportunistically; nothing is required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Frontmatter(Mapping);

impl Frontmatter {
    /// Create an empty frontmatter block.
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw YAML value for a key.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Value for a key rendered as a string.
    ///
    /// Numbers and booleans are stringified, sequences are joined with `,`.
    /// `null` and nested mappings count as absent.
    pub fn get_str(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_to_string)
    }

    /// Insert a string value, replacing any previous one.
    pub fn insert(&mut self, key: &str, value: impl Into<String>) {
        self.0
            .insert(Value::String(key.to_string()), Value::String(value.into()));
    }

    pub fn title(&self) -> Option<String> {
        self.get_str("title")
    }

    pub fn date(&self) -> Option<String> {
        self.get_str("date")
    }

    pub fn description(&self) -> Option<String> {
        self.get_str("description")
    }

    pub fn image(&self) -> Option<String> {
        self.get_str("image")
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::Null | Value::Mapping(_) => None,
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::String(s) => Some(s.clone()),
        Value::Sequence(items) => Some(
            items
                .iter()
                .filter_map(scalar_to_string)
                .collect::<Vec<_>>()
                .join(","),
        ),
        Value::Tagged(tagged) => scalar_to_string(&tagged.value),
    }
}

/// Split a source file into its raw frontmatter block and the remaining body.
///
/// Returns `None` for the block when the file does not open with `---`.
pub fn split_frontmatter(source: &str) -> Result<(Option<&str>, &str), FrontmatterError> {
    let trimmed = source.trim_start();

    if !trimmed.starts_with("---") {
        return Ok((None, source));
    }

    // Find the closing ---
    let after_open = &trimmed[3..];
    let Some(close_pos) = after_open.find("\n---") else {
        return Err(FrontmatterError::Unclosed);
    };

    let yaml_content = after_open[..close_pos].trim();
    let remaining = &after_open[close_pos + 4..];

    Ok((Some(yaml_content), remaining.trim_start()))
}

/// Parse the YAML inside a frontmatter block.
pub fn parse_frontmatter(yaml: &str) -> Result<Frontmatter, FrontmatterError> {
    if yaml.trim().is_empty() {
        return Ok(Frontmatter::new());
    }

    let value: Value =
        serde_yaml::from_str(yaml).map_err(|e| FrontmatterError::InvalidYaml(e.to_string()))?;

    match value {
        Value::Mapping(mapping) => Ok(Frontmatter(mapping)),
        Value::Null => Ok(Frontmatter::new()),
        _ => Err(FrontmatterError::NotAMapping),
    }
}

/// Extract frontmatter from markdown content.
///
/// Returns the parsed frontmatter and the remaining content after the frontmatter block.
pub fn extract_frontmatter(source: &str) -> Result<(Option<Frontmatter>, &str), FrontmatterError> {
    let (yaml, body) = split_frontmatter(source)?;

    match yaml {
        Some(yaml) => Ok((Some(parse_frontmatter(yaml)?), body)),
        None => Ok((None, body)),
    }
}

/// Errors that can occur when parsing frontmatter.
#[derive(Debug, thiserror::Error)]
pub enum FrontmatterError {
    #[error("Unclosed frontmatter block - missing closing ---")]
    Unclosed,

    #[error("Invalid YAML in frontmatter: {0}")]
    InvalidYaml(String),

    #[error("Frontmatter must be a key-value mapping")]
    NotAMapping,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_valid_frontmatter() {
        let source = r#"---
title: Weather Station
date: Jan 2020 - Present
description: A solar powered sensor array
---

# Weather Station
"#;

        let (fm, content) = extract_frontmatter(source).unwrap();
        let fm = fm.unwrap();

        assert_eq!(fm.title(), Some("Weather Station".to_string()));
        assert_eq!(fm.date(), Some("Jan 2020 - Present".to_string()));
        assert_eq!(
            fm.description(),
            Some("A solar powered sensor array".to_string())
        );
        assert!(content.starts_with("# Weather Station"));
    }

    #[test]
    fn handles_no_frontmatter() {
        let source = "# Just Markdown\n\nNo frontmatter here.";

        let (fm, content) = extract_frontmatter(source).unwrap();

        assert!(fm.is_none());
        assert_eq!(content, source);
    }

    #[test]
    fn errors_on_unclosed_frontmatter() {
        let source = "---\ntitle: Test\n# No closing";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::Unclosed)));
    }

    #[test]
    fn errors_on_invalid_yaml() {
        let source = "---\ntitle: [invalid yaml\n---\n";

        let result = extract_frontmatter(source);

        assert!(matches!(result, Err(FrontmatterError::InvalidYaml(_))));
    }

    #[test]
    fn errors_on_scalar_yaml() {
        let result = parse_frontmatter("just a string");

        assert!(matches!(result, Err(FrontmatterError::NotAMapping)));
    }

    #[test]
    fn empty_block_is_empty_mapping() {
        let (fm, content) = extract_frontmatter("---\n---\nBody").unwrap();

        assert!(fm.unwrap().is_empty());
        assert_eq!(content, "Body");
    }

    #[test]
    fn stringifies_non_string_scalars() {
        let fm = parse_frontmatter("title: 2048\nfeatured: true\ntags: [rust, web]\nimage: ~")
            .unwrap();

        assert_eq!(fm.title(), Some("2048".to_string()));
        assert_eq!(fm.get_str("featured"), Some("true".to_string()));
        assert_eq!(fm.get_str("tags"), Some("rust,web".to_string()));
        assert_eq!(fm.image(), None);
        assert_eq!(fm.get_str("missing"), None);
    }

    #[test]
    fn nested_mapping_counts_as_absent() {
        let fm = parse_frontmatter("title:\n  en: Hello\n").unwrap();

        assert_eq!(fm.title(), None);
        assert!(fm.get("title").is_some());
    }

    #[test]
    fn serializes_as_plain_object() {
        let mut fm = Frontmatter::new();
        fm.insert("title", "Robot Arm");

        let json = serde_json::to_string(&fm).unwrap();

        assert_eq!(json, r#"{"title":"Robot Arm"}"#);
    }
}
