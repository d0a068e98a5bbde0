//! Markdown document tree.
//!
//! Block and inline nodes are separate enums, so inline spans can only ever
//! appear inside the blocks that carry text. Text is stored decoded; escaping
//! happens when the tree is rendered.

use crate::MarkdownError;
use serde::{Deserialize, Serialize};

/// Root of a parsed document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Document {
    /// Top-level blocks in reading order.
    pub children: Vec<Block>,
}

impl Document {
    /// Create a document from its top-level blocks.
    pub fn new(children: Vec<Block>) -> Self {
        Self { children }
    }

    /// Returns true when the document has no blocks.
    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }
}

/// A block-level node.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Block {
    /// ATX heading (`# Title`).
    Heading(Heading),
    /// Paragraph of inline content.
    Paragraph(Vec<Inline>),
    /// Fenced code block; content is literal.
    CodeBlock(CodeBlock),
    /// Ordered or unordered list.
    List(List),
    /// Thematic break (`---`).
    HorizontalRule,
}

/// Heading depth, always within `1..=6`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct HeadingLevel(u8);

impl HeadingLevel {
    /// Validate a heading level.
    pub fn new(level: u8) -> Result<Self, MarkdownError> {
        if (1..=6).contains(&level) {
            Ok(Self(level))
        } else {
            Err(MarkdownError::InvalidHeadingLevel(level))
        }
    }

    /// The numeric level.
    pub fn get(self) -> u8 {
        self.0
    }
}

impl TryFrom<u8> for HeadingLevel {
    type Error = MarkdownError;

    fn try_from(level: u8) -> Result<Self, Self::Error> {
        Self::new(level)
    }
}

impl From<HeadingLevel> for u8 {
    fn from(level: HeadingLevel) -> Self {
        level.0
    }
}

/// Heading with level and inline content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    pub level: HeadingLevel,
    pub content: Vec<Inline>,
}

impl Heading {
    /// Build a heading, rejecting levels outside `1..=6`.
    pub fn new(level: u8, content: Vec<Inline>) -> Result<Self, MarkdownError> {
        Ok(Self {
            level: HeadingLevel::new(level)?,
            content,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CodeBlock {
    /// Language tag from the opening fence.
    pub language: Option<String>,
    /// Literal content, one `\n` per source line.
    pub code: String,
}

/// Whether a list is numbered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ListKind {
    /// `1.` style list starting at `start`.
    Ordered { start: u32 },
    /// `-`, `*` or `+` bulleted list.
    Unordered,
}

impl ListKind {
    /// Returns true for numbered lists.
    pub fn is_ordered(self) -> bool {
        matches!(self, ListKind::Ordered { .. })
    }

    /// Two kinds continue the same list when both are ordered or both are not.
    pub fn same_family(self, other: ListKind) -> bool {
        self.is_ordered() == other.is_ordered()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct List {
    pub kind: ListKind,
    pub items: Vec<ListItem>,
}

/// A list item: its own line of inline content plus any nested lists.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListItem {
    pub content: Vec<Inline>,
    pub children: Vec<List>,
}

impl ListItem {
    /// An item with no nested lists.
    pub fn new(content: Vec<Inline>) -> Self {
        Self {
            content,
            children: Vec::new(),
        }
    }
}

/// An inline span inside a heading, paragraph, or list item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data", rename_all = "camelCase")]
pub enum Inline {
    /// Plain text, stored unescaped.
    Text(String),
    /// `**strong**` or `__strong__`.
    Bold(Vec<Inline>),
    /// `*emphasis*` or `_emphasis_`.
    Italic(Vec<Inline>),
    /// `***both***`.
    BoldItalic(Vec<Inline>),
    /// `` `code` ``; never parsed further.
    InlineCode(String),
    /// `[label](href "title")`.
    Link {
        href: String,
        title: Option<String>,
        children: Vec<Inline>,
    },
    /// `![alt](src "title")`.
    Image {
        src: String,
        alt: String,
        title: Option<String>,
    },
}

impl Inline {
    /// Shorthand for a text node.
    pub fn text(value: impl Into<String>) -> Self {
        Inline::Text(value.into())
    }

    /// Collects the visible text of this span, dropping markup.
    pub fn plain_text(&self, buffer: &mut String) {
        match self {
            Inline::Text(text) | Inline::InlineCode(text) => buffer.push_str(text),
            Inline::Bold(children)
            | Inline::Italic(children)
            | Inline::BoldItalic(children)
            | Inline::Link { children, .. } => {
                for child in children {
                    child.plain_text(buffer);
                }
            }
            Inline::Image { alt, .. } => buffer.push_str(alt),
        }
    }
}

/// Extracts plain text from a sequence of inline nodes.
pub fn plain_text(inlines: &[Inline]) -> String {
    let mut text = String::new();
    for inline in inlines {
        inline.plain_text(&mut text);
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heading_level_rejects_out_of_range() {
        assert!(HeadingLevel::new(0).is_err());
        assert_eq!(
            HeadingLevel::new(7),
            Err(MarkdownError::InvalidHeadingLevel(7))
        );
        assert_eq!(HeadingLevel::new(6).map(HeadingLevel::get), Ok(6));
        assert!(Heading::new(9, vec![Inline::text("x")]).is_err());
    }

    #[test]
    fn plain_text_drops_markup() {
        let inlines = vec![
            Inline::text("a "),
            Inline::Bold(vec![Inline::Italic(vec![Inline::text("b")])]),
            Inline::Link {
                href: "/x".to_string(),
                title: None,
                children: vec![Inline::InlineCode("c".to_string())],
            },
        ];
        assert_eq!(plain_text(&inlines), "a bc");
    }

    #[test]
    fn serializes_with_type_tags() {
        let doc = Document::new(vec![Block::Heading(
            Heading::new(2, vec![Inline::text("Hi")]).unwrap(),
        )]);
        let json = serde_json::to_value(&doc).unwrap();
        assert_eq!(json["children"][0]["type"], "heading");
        assert_eq!(json["children"][0]["data"]["level"], 2);
        assert_eq!(json["children"][0]["data"]["content"][0]["type"], "text");
    }

    #[test]
    fn deserialize_validates_heading_level() {
        let json = r#"{"children":[{"type":"heading","data":{"level":9,"content":[]}}]}"#;
        assert!(serde_json::from_str::<Document>(json).is_err());

        let json = r#"{"children":[{"type":"heading","data":{"level":3,"content":[]}}]}"#;
        let doc: Document = serde_json::from_str(json).unwrap();
        assert!(matches!(&doc.children[0], Block::Heading(h) if h.level.get() == 3));
    }

    #[test]
    fn list_kind_family() {
        let ordered = ListKind::Ordered { start: 3 };
        assert!(ordered.same_family(ListKind::Ordered { start: 1 }));
        assert!(!ordered.same_family(ListKind::Unordered));
    }
}
