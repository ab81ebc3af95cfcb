#![warn(missing_docs)]
//! `rich-editor-schema` - data-driven element classification for `rich-editor-core`.
//!
//! This crate does **not** depend on any markup parser or
//! tree model. It provides a small struct that hosts can use to tell the editing kernel which
//! tags start a new block, which ones can never have children, and which ones must be retyped
//! before block content is inserted into them.

use std::collections::BTreeSet;

const HTML_BLOCK_TAGS: &[&str] = &[
    "address",
    "article",
    "aside",
    "blockquote",
    "canvas",
    "dd",
    "div",
    "dl",
    "dt",
    "fieldset",
    "figcaption",
    "figure",
    "footer",
    "form",
    "h1",
    "h2",
    "h3",
    "h4",
    "h5",
    "h6",
    "header",
    "hr",
    "li",
    "main",
    "nav",
    "noscript",
    "ol",
    "output",
    "p",
    "pre",
    "section",
    "table",
    "tbody",
    "td",
    "tfoot",
    "th",
    "thead",
    "tr",
    "ul",
    "video",
];

const HTML_VOID_TAGS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

const BLOCK_DISPLAY_VALUES: &[&str] = &["block", "list-item", "table", "table-cell", "flex"];

/// Tag classification used by the editing kernel.
///
/// All tag names are compared in ASCII lowercase.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementSchema {
    block_tags: BTreeSet<String>,
    void_tags: BTreeSet<String>,
    paragraph_tags: BTreeSet<String>,
    atomic_inline_tags: BTreeSet<String>,
    default_block_tag: String,
}

impl ElementSchema {
    /// The HTML classification used by browsers' `contenteditable` hosts.
    pub fn html() -> Self {
        Self {
            block_tags: to_set(HTML_BLOCK_TAGS),
            void_tags: to_set(HTML_VOID_TAGS),
            paragraph_tags: to_set(&["p"]),
            atomic_inline_tags: to_set(&["a"]),
            default_block_tag: "div".to_string(),
        }
    }

    /// Returns `true` if `tag` starts a new block.
    pub fn is_block_tag(&self, tag: &str) -> bool {
        self.block_tags.contains(&tag.to_ascii_lowercase())
    }

    /// Returns `true` if `tag` can never have children (`br`, `img`, ...).
    pub fn is_void_tag(&self, tag: &str) -> bool {
        self.void_tags.contains(&tag.to_ascii_lowercase())
    }

    /// Returns `true` if `tag` is a paragraph-like container that must not receive nested blocks.
    pub fn is_paragraph_like(&self, tag: &str) -> bool {
        self.paragraph_tags.contains(&tag.to_ascii_lowercase())
    }

    /// Returns `true` if `tag` is an inline container traversed as a single unit (links).
    pub fn is_atomic_inline(&self, tag: &str) -> bool {
        self.atomic_inline_tags.contains(&tag.to_ascii_lowercase())
    }

    /// Returns `true` if a CSS `display` value lays an element out as a block.
    pub fn is_block_display(&self, display: &str) -> bool {
        let display = display.trim().to_ascii_lowercase();
        BLOCK_DISPLAY_VALUES.contains(&display.as_str())
    }

    /// Tag used when content has to be wrapped in, or retyped to, a generic block.
    pub fn default_block_tag(&self) -> &str {
        &self.default_block_tag
    }

    /// Treat `tag` as block-level.
    pub fn with_block_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.block_tags.insert(tag.as_ref().to_ascii_lowercase());
        self
    }

    /// Treat `tag` as a void element.
    pub fn with_void_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.void_tags.insert(tag.as_ref().to_ascii_lowercase());
        self
    }

    /// Treat `tag` as paragraph-like.
    pub fn with_paragraph_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.paragraph_tags.insert(tag.as_ref().to_ascii_lowercase());
        self
    }

    /// Treat `tag` as an atomic inline container.
    pub fn with_atomic_inline_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.atomic_inline_tags.insert(tag.as_ref().to_ascii_lowercase());
        self
    }

    /// Override the generic block tag (defaults to `div`).
    pub fn with_default_block_tag(mut self, tag: impl AsRef<str>) -> Self {
        self.default_block_tag = tag.as_ref().to_ascii_lowercase();
        self
    }
}

impl Default for ElementSchema {
    fn default() -> Self {
        Self::html()
    }
}

fn to_set(tags: &[&str]) -> BTreeSet<String> {
    tags.iter().map(|t| t.to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_html_classification() {
        let schema = ElementSchema::html();
        assert!(schema.is_block_tag("DIV"));
        assert!(schema.is_block_tag("p"));
        assert!(!schema.is_block_tag("span"));
        assert!(schema.is_void_tag("br"));
        assert!(schema.is_void_tag("IMG"));
        assert!(!schema.is_void_tag("div"));
        assert!(schema.is_paragraph_like("P"));
        assert!(!schema.is_paragraph_like("div"));
        assert!(schema.is_atomic_inline("a"));
        assert_eq!(schema.default_block_tag(), "div");
    }

    #[test]
    fn test_hr_is_block_and_void() {
        let schema = ElementSchema::default();
        assert!(schema.is_block_tag("hr"));
        assert!(schema.is_void_tag("hr"));
    }

    #[test]
    fn test_block_display_values() {
        let schema = ElementSchema::html();
        assert!(schema.is_block_display("block"));
        assert!(schema.is_block_display(" Flex "));
        assert!(!schema.is_block_display("inline"));
        assert!(!schema.is_block_display("inline-block"));
    }

    #[test]
    fn test_builder_overrides() {
        let schema = ElementSchema::html()
            .with_block_tag("x-card")
            .with_paragraph_tag("H1")
            .with_void_tag("x-embed")
            .with_default_block_tag("P");

        assert!(schema.is_block_tag("x-card"));
        assert!(schema.is_paragraph_like("h1"));
        assert!(schema.is_void_tag("X-EMBED"));
        assert_eq!(schema.default_block_tag(), "p");
    }
}
