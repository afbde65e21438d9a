//! Markdown parsing for folio.
//!
//! This crate extracts YAML frontmatter from markdown files, derives short
//! previews (thumbnail, bullet list, or text snippet) from the body, and
//! renders bodies to HTML.

pub mod frontmatter;
pub mod parser;
pub mod preview;
pub mod strip;

pub use frontmatter::{Frontmatter, FrontmatterError};
pub use parser::{parse_document, parse_document_strict, render_html, ParsedDoc};
pub use preview::{
    extract_preview, first_image, first_text_block, truncate_snippet, ImageRef, Preview,
};
