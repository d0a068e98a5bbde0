//! Parsing entry points.

use crate::block::{RawBlock, RawItem, RawList, assemble};
use crate::error::ParseDiagnostics;
use crate::inline::InlineParser;
use crate::lines::classify;
use crate::node::{Block, Document, Heading, List, ListItem};
use crate::options::ParseOptions;

/// A parsed document together with the problems recovered along the way.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Parsed {
    pub document: Document,
    pub diagnostics: ParseDiagnostics,
}

/// Parse markdown into a document tree using default options.
///
/// Parsing never fails: malformed input degrades to literal text.
///
/// # Examples
///
/// ```
/// use golb_md_core::{Block, parse};
///
/// let doc = parse("# Title\n\nSome *text*.");
/// assert_eq!(doc.children.len(), 2);
/// assert!(matches!(doc.children[0], Block::Heading(_)));
/// ```
pub fn parse(input: &str) -> Document {
    parse_with_options(input, &ParseOptions::default()).document
}

/// Parse markdown with explicit options, keeping diagnostics.
pub fn parse_with_options(input: &str, options: &ParseOptions) -> Parsed {
    let mut diagnostics = ParseDiagnostics::new();
    let lines = classify(input);
    let raw = assemble(&lines, options, &mut diagnostics);

    let mut inline = InlineParser::new(options, &mut diagnostics);
    let children = raw
        .into_iter()
        .map(|block| resolve_block(block, &mut inline))
        .collect();

    let document = Document::new(children);
    log::trace!(
        "parsed {} lines into {} blocks",
        lines.len(),
        document.children.len()
    );
    Parsed {
        document,
        diagnostics,
    }
}

fn resolve_block(block: RawBlock, inline: &mut InlineParser<'_, '_>) -> Block {
    match block {
        RawBlock::Heading { level, text, line } => Block::Heading(Heading {
            level,
            content: inline.parse(&text, line),
        }),
        RawBlock::Paragraph { text, line } => Block::Paragraph(inline.parse(&text, line)),
        RawBlock::CodeBlock(code) => Block::CodeBlock(code),
        RawBlock::List(list) => Block::List(resolve_list(list, inline)),
        RawBlock::HorizontalRule => Block::HorizontalRule,
    }
}

fn resolve_list(list: RawList, inline: &mut InlineParser<'_, '_>) -> List {
    List {
        kind: list.kind,
        items: list
            .items
            .into_iter()
            .map(|item| resolve_item(item, inline))
            .collect(),
    }
}

fn resolve_item(item: RawItem, inline: &mut InlineParser<'_, '_>) -> ListItem {
    ListItem {
        content: inline.parse(&item.text, item.line),
        children: item
            .children
            .into_iter()
            .map(|list| resolve_list(list, inline))
            .collect(),
    }
}
