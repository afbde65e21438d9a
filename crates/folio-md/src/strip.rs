//! Inline markdown stripping for plain-text previews.

use std::sync::LazyLock;

use regex::Regex;

static IMAGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"!\[[^\]]*\]\([^)]+\)").expect("Invalid image regex"));

static LINK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[([^\]]+)\]\([^)]+\)").expect("Invalid link regex"));

/// Characters dropped from bullet items.
const BULLET_MARKUP: &[char] = &['`', '*', '_', '>', '#'];

/// Characters dropped from paragraph snippets. Hyphens go too.
const TEXT_MARKUP: &[char] = &['`', '*', '_', '>', '#', '-'];

/// Remove images and unwrap links, keeping the link text.
fn strip_images_and_links(text: &str) -> String {
    let without_images = IMAGE_RE.replace_all(text, "");
    LINK_RE.replace_all(&without_images, "$1").into_owned()
}

fn strip_with(text: &str, markup: &[char]) -> String {
    strip_images_and_links(text)
        .chars()
        .filter(|c| !markup.contains(c))
        .collect::<String>()
        .trim()
        .to_string()
}

/// Plain text for a single bullet item.
pub fn strip_bullet(item: &str) -> String {
    strip_with(item, BULLET_MARKUP)
}

/// Plain text for a paragraph block.
pub fn strip_text(block: &str) -> String {
    strip_with(block, TEXT_MARKUP)
}
