//! Preview extraction for work entries.
//!
//! A preview is the short representative content shown for an entry in the
//! list view. Candidates are tried in order: the first thumbnail-eligible
//! image, the first bullet list, then the first paragraph-like block.

use std::sync::LazyLock;

use regex::Regex;
use serde::Serialize;

use crate::strip::{strip_bullet, strip_text};

/// Marker that excludes an image from thumbnail use when it appears in the
/// image title or alt text, e.g. `![Wiring](/wiring.png "no-thumb")`.
pub const NO_THUMB: &str = "no-thumb";

/// Snippets longer than this many characters are truncated.
pub const SNIPPET_MAX_CHARS: usize = 200;

/// Characters kept before the ellipsis when truncating.
const SNIPPET_KEEP_CHARS: usize = 197;

pub const ELLIPSIS: char = '\u{2026}';

static IMAGE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"!\[([^\]]*)\]\(([^)\s]+)(?:\s+"([^"]*)")?\)"#).expect("Invalid image regex")
});

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-*]\s+(.+)").expect("Invalid bullet regex"));

static LIST_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[-*]\s+").expect("Invalid list block regex"));

static BLOCK_SPLIT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\r?\n\s*\r?\n").expect("Invalid block split regex"));

/// An image reference.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageRef {
    pub src: String,
    pub alt: String,
}

/// Representative content for a work entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Preview {
    /// Thumbnail image
    Image(ImageRef),
    /// Contiguous bullet list, markup stripped
    Bullets { items: Vec<String> },
    /// Plain-text snippet, possibly empty
    Text { text: String },
}

impl Preview {
    pub fn text(text: impl Into<String>) -> Self {
        Preview::Text { text: text.into() }
    }

    /// Whether the preview carries nothing to show.
    pub fn is_empty(&self) -> bool {
        matches!(self, Preview::Text { text } if text.is_empty())
    }
}

impl Default for Preview {
    fn default() -> Self {
        Preview::text("")
    }
}

/// Derive a preview from a markdown body.
pub fn extract_preview(content: &str) -> Preview {
    if let Some(image) = first_image(content) {
        return Preview::Image(image);
    }

    let items = first_bullet_list(content);
    if !items.is_empty() {
        return Preview::Bullets { items };
    }

    Preview::Text {
        text: first_text_block(content).unwrap_or_default(),
    }
}

/// First image not marked with [`NO_THUMB`].
pub fn first_image(content: &str) -> Option<ImageRef> {
    IMAGE_RE.captures_iter(content).find_map(|caps| {
        let alt = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        let src = caps.get(2)?.as_str();
        let title = caps.get(3).map(|m| m.as_str()).unwrap_or("");

        let excluded = title.to_lowercase().contains(NO_THUMB)
            || alt.to_lowercase().contains(NO_THUMB);

        (!excluded).then(|| ImageRef {
            src: src.to_string(),
            alt: alt.to_string(),
        })
    })
}

/// Items of the first contiguous bullet list outside fenced code.
pub fn first_bullet_list(content: &str) -> Vec<String> {
    let mut items = Vec::new();
    let mut in_code_block = false;
    let mut collecting = false;

    for raw_line in content.lines() {
        let line = raw_line.trim_end();

        if line.starts_with("```") {
            in_code_block = !in_code_block;
            continue;
        }
        if in_code_block {
            continue;
        }

        if let Some(caps) = BULLET_RE.captures(line) {
            collecting = true;
            let item = strip_bullet(&caps[1]);
            if !item.is_empty() {
                items.push(item);
            }
            continue;
        }

        if collecting {
            break;
        }
    }

    items
}

/// Plain text of the first paragraph-like block, truncated.
///
/// Skips headings, images, raw HTML, lists and blockquotes.
pub fn first_text_block(content: &str) -> Option<String> {
    let block = BLOCK_SPLIT_RE
        .split(content)
        .map(str::trim)
        .filter(|b| !b.is_empty())
        .find(|b| is_paragraph_like(b))?;

    Some(truncate_snippet(&strip_text(block)))
}

fn is_paragraph_like(block: &str) -> bool {
    !block.starts_with('#')
        && !block.starts_with("![")
        && !block.starts_with('<')
        && !LIST_BLOCK_RE.is_match(block)
        && !block.starts_with("> ")
}

/// Shorten text to at most [`SNIPPET_MAX_CHARS`] characters, ending in an
/// ellipsis when cut.
pub fn truncate_snippet(text: &str) -> String {
    if text.chars().count() <= SNIPPET_MAX_CHARS {
        return text.to_string();
    }

    let mut out: String = text.chars().take(SNIPPET_KEEP_CHARS).collect();
    out.push(ELLIPSIS);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn prefers_first_image() {
        let body = "Intro text.\n\n- a bullet\n\n![Board layout](/img/board.png)\n";

        assert_eq!(
            extract_preview(body),
            Preview::Image(ImageRef {
                src: "/img/board.png".to_string(),
                alt: "Board layout".to_string(),
            })
        );
    }

    #[test]
    fn skips_images_marked_no_thumb_in_title() {
        let body = r#"![Wiring](/wiring.png "No-Thumb please")

![Final build](/final.jpg "The result")"#;

        assert_eq!(
            first_image(body),
            Some(ImageRef {
                src: "/final.jpg".to_string(),
                alt: "Final build".to_string(),
            })
        );
    }

    #[test]
    fn skips_images_marked_no_thumb_in_alt() {
        let body = "![diagram no-thumb](/d.png)\n\n- only bullets remain";

        assert_eq!(
            extract_preview(body),
            Preview::Bullets {
                items: vec!["only bullets remain".to_string()]
            }
        );
    }

    #[test]
    fn image_with_empty_alt() {
        assert_eq!(
            first_image("![](/a.png)"),
            Some(ImageRef {
                src: "/a.png".to_string(),
                alt: String::new(),
            })
        );
    }

    #[test]
    fn collects_contiguous_bullets_only() {
        let body = "# Highlights\n\n- Led the **firmware** rewrite\n* Shipped [v2](https://example.com/v2)\n  - Nested `detail`\nNot a bullet\n- Second list\n";

        assert_eq!(
            extract_preview(body),
            Preview::Bullets {
                items: vec![
                    "Led the firmware rewrite".to_string(),
                    "Shipped v2".to_string(),
                    "Nested detail".to_string(),
                ]
            }
        );
    }

    #[test]
    fn blank_line_ends_bullet_run() {
        let body = "- one\n- two\n\n- three";

        assert_eq!(first_bullet_list(body), vec!["one", "two"]);
    }

    #[test]
    fn ignores_bullets_inside_code_fences() {
        let body = "```yaml\n- not: a bullet\n```\n\n- real bullet\n";

        assert_eq!(first_bullet_list(body), vec!["real bullet"]);
    }

    #[test]
    fn fence_does_not_end_a_run() {
        let body = "- before\n```\ncode\n```\n- after\n";

        assert_eq!(first_bullet_list(body), vec!["before", "after"]);
    }

    #[test]
    fn drops_items_that_strip_to_nothing() {
        let body = "- ![only an image](/x.png \"no-thumb\")\n- kept";

        assert_eq!(
            extract_preview(body),
            Preview::Bullets {
                items: vec!["kept".to_string()]
            }
        );
    }

    #[test]
    fn horizontal_rule_is_not_a_bullet() {
        assert!(first_bullet_list("---\n\nText").is_empty());
    }

    #[test]
    fn falls_back_to_first_paragraph() {
        let body = "# Title\n\n> A quote\n\n<div>raw</div>\n\nA **small** tool for [sorting](/s) photos.\n\nSecond paragraph.";

        assert_eq!(
            extract_preview(body),
            Preview::text("A small tool for sorting photos.")
        );
    }

    #[test]
    fn paragraph_split_handles_crlf_and_whitespace_lines() {
        let body = "## Heading\r\n  \r\nFirst real text\r\nstill first";

        assert_eq!(
            first_text_block(body),
            Some("First real text\r\nstill first".to_string())
        );
    }

    #[test]
    fn truncates_long_paragraphs() {
        let body = "word ".repeat(100);

        let Preview::Text { text } = extract_preview(&body) else {
            panic!("expected text preview");
        };

        assert!(text.chars().count() <= SNIPPET_MAX_CHARS);
        assert_eq!(text.chars().count(), SNIPPET_KEEP_CHARS + 1);
        assert!(text.ends_with(ELLIPSIS));
    }

    #[test]
    fn truncation_counts_characters_not_bytes() {
        let text = "é".repeat(250);

        let out = truncate_snippet(&text);

        assert_eq!(out.chars().count(), 198);
        assert!(out.ends_with('…'));
    }

    #[test]
    fn exactly_max_length_is_untouched() {
        let text = "x".repeat(SNIPPET_MAX_CHARS);

        assert_eq!(truncate_snippet(&text), text);
    }

    #[test]
    fn empty_when_nothing_matches() {
        let body = "# Only a heading\n\n## And another";

        let preview = extract_preview(body);

        assert_eq!(preview, Preview::text(""));
        assert!(preview.is_empty());
    }

    #[test]
    fn empty_body() {
        assert!(extract_preview("").is_empty());
    }

    #[test]
    fn serializes_with_kind_tag() {
        let json = serde_json::to_value(Preview::Bullets {
            items: vec!["a".to_string()],
        })
        .unwrap();

        assert_eq!(json["kind"], "bullets");
        assert_eq!(json["items"][0], "a");

        let json = serde_json::to_value(Preview::Image(ImageRef {
            src: "/a.png".to_string(),
            alt: "A".to_string(),
        }))
        .unwrap();

        assert_eq!(json["kind"], "image");
        assert_eq!(json["src"], "/a.png");
    }
}
