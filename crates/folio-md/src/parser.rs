//! Markdown document parser.

use pulldown_cmark::{html, Options, Parser};

use crate::frontmatter::{parse_frontmatter, split_frontmatter, Frontmatter, FrontmatterError};

/// A parsed markdown document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ParsedDoc {
    /// Parsed frontmatter, empty when absent or malformed
    pub frontmatter: Frontmatter,

    /// Markdown content (without frontmatter)
    pub content: String,
}

/// Parse a markdown document, tolerating bad frontmatter.
///
/// An unclosed block leaves the whole source as content. Invalid YAML drops
/// the block and keeps the content after it. Both are logged.
pub fn parse_document(source: &str) -> ParsedDoc {
    let (yaml, content) = match split_frontmatter(source) {
        Ok(split) => split,
        Err(e) => {
            tracing::warn!("Ignoring frontmatter: {}", e);
            (None, source)
        }
    };

    let frontmatter = match yaml.map(parse_frontmatter) {
        Some(Ok(fm)) => fm,
        Some(Err(e)) => {
            tracing::warn!("Ignoring frontmatter: {}", e);
            Frontmatter::new()
        }
        None => Frontmatter::new(),
    };

    ParsedDoc {
        frontmatter,
        content: content.to_string(),
    }
}

/// Parse a markdown document, failing on malformed frontmatter.
pub fn parse_document_strict(source: &str) -> Result<ParsedDoc, FrontmatterError> {
    let (yaml, content) = split_frontmatter(source)?;
    let frontmatter = match yaml {
        Some(yaml) => parse_frontmatter(yaml)?,
        None => Frontmatter::new(),
    };

    Ok(ParsedDoc {
        frontmatter,
        content: content.to_string(),
    })
}

/// Render markdown to HTML.
pub fn render_html(content: &str) -> String {
    let options = Options::ENABLE_TABLES
        | Options::ENABLE_FOOTNOTES
        | Options::ENABLE_STRIKETHROUGH
        | Options::ENABLE_TASKLISTS;

    let parser = Parser::new_ext(content, options);

    let mut html_output = String::new();
    html::push_html(&mut html_output, parser);

    html_output
}
