//! Markdown tree to HTML renderer.
//!
//! # Module Structure
//!
//! - `context` - Output buffer with escaping helpers
//! - `render` - Per-node rendering functions

mod context;
pub mod render;

pub use context::Context;

use golb_md_core::{Document, ParseDiagnostics, ParseOptions, parse_with_options};
use render::render_document;
use serde::{Deserialize, Serialize};

/// Rendering options.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Options {
    /// Whether to add loading="lazy" to images.
    #[serde(default)]
    pub enable_lazy_images: bool,
    /// Whether to emit a newline after each block-level tag.
    #[serde(default)]
    pub enable_block_newlines: bool,
}

/// Result of converting markdown with diagnostics kept.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Converted {
    /// Rendered HTML.
    pub html: String,
    /// Problems the parser recovered from.
    pub diagnostics: ParseDiagnostics,
}

/// Renders a document with default options.
///
/// Rendering is pure: the tree is only read, and the same tree always
/// produces the same string.
pub fn render(document: &Document) -> String {
    render_with_options(document, &Options::default())
}

/// Renders a document with explicit options.
pub fn render_with_options(document: &Document, options: &Options) -> String {
    let mut ctx = Context::new(options, 4096);
    render_document(document, &mut ctx);
    ctx.finish()
}

/// Converts markdown to HTML (entry point).
///
/// # Examples
///
/// ```
/// use golb_md_html::convert;
///
/// assert_eq!(convert("# A"), "<h1>A</h1>");
/// assert_eq!(convert("Hello, **world**!"), "<p>Hello, <strong>world</strong>!</p>");
/// ```
pub fn convert(input: &str) -> String {
    convert_with_options(input, &ParseOptions::default(), &Options::default()).html
}

/// Converts markdown to HTML with explicit options, keeping diagnostics.
pub fn convert_with_options(
    input: &str,
    parse_options: &ParseOptions,
    options: &Options,
) -> Converted {
    let parsed = parse_with_options(input, parse_options);
    let html = render_with_options(&parsed.document, options);
    log::trace!(
        "converted {} bytes of markdown into {} bytes of html ({} diagnostics)",
        input.len(),
        html.len(),
        parsed.diagnostics.count()
    );
    Converted {
        html,
        diagnostics: parsed.diagnostics,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use golb_md_core::{Block, Heading, Inline, ParseErrorKind};

    #[test]
    fn test_paragraph() {
        assert_eq!(
            convert("This is a paragraph."),
            "<p>This is a paragraph.</p>"
        );
    }

    #[test]
    fn test_heading_levels() {
        assert_eq!(convert("# A"), "<h1>A</h1>");
        assert_eq!(convert("###### A"), "<h6>A</h6>");
        assert_eq!(convert("####### A"), "<p>####### A</p>");
    }

    #[test]
    fn test_link() {
        let html = convert("[Rust](https://www.rust-lang.org/)");
        assert_eq!(
            html,
            r#"<p><a href="https://www.rust-lang.org/">Rust</a></p>"#
        );
    }

    #[test]
    fn test_link_with_title() {
        let html = convert(r#"[a](/b "c")"#);
        assert_eq!(html, r#"<p><a href="/b" title="c">a</a></p>"#);
    }

    #[test]
    fn test_image() {
        let html = convert(r#"![A cat](/cat.png "Cat")"#);
        assert_eq!(
            html,
            r#"<p><img src="/cat.png" alt="A cat" title="Cat" /></p>"#
        );
    }

    #[test]
    fn test_lazy_images() {
        let options = Options {
            enable_lazy_images: true,
            ..Default::default()
        };
        let converted = convert_with_options("![x](/y.png)", &ParseOptions::default(), &options);
        assert_eq!(
            converted.html,
            r#"<p><img src="/y.png" alt="x" loading="lazy" /></p>"#
        );
    }

    #[test]
    fn test_bold_italic() {
        assert_eq!(
            convert("***both***"),
            "<p><em><strong>both</strong></em></p>"
        );
    }

    #[test]
    fn test_code_block_with_language() {
        assert_eq!(
            convert("```rust\nfn main() {}\n```"),
            "<pre><code class=\"language-rust\">fn main() {}\n</code></pre>"
        );
    }

    #[test]
    fn test_ordered_list_start() {
        assert_eq!(
            convert("3. c\n4. d"),
            r#"<ol start="3"><li>c</li><li>d</li></ol>"#
        );
        assert_eq!(convert("1. a"), "<ol><li>a</li></ol>");
    }

    #[test]
    fn test_nested_list() {
        assert_eq!(
            convert("- a\n  - b\n- c"),
            "<ul><li>a<ul><li>b</li></ul></li><li>c</li></ul>"
        );
    }

    #[test]
    fn test_block_newlines() {
        let options = Options {
            enable_block_newlines: true,
            ..Default::default()
        };
        let converted = convert_with_options(
            "# T\n\n- a\n  - b\n\n---",
            &ParseOptions::default(),
            &options,
        );
        assert_eq!(
            converted.html,
            "<h1>T</h1>\n<ul>\n<li>a\n<ul>\n<li>b</li>\n</ul>\n</li>\n</ul>\n<hr />\n"
        );
    }

    #[test]
    fn test_render_does_not_need_parser() {
        let document = Document::new(vec![
            Block::Heading(Heading::new(3, vec![Inline::text("<T>")]).unwrap()),
            Block::HorizontalRule,
        ]);
        assert_eq!(render(&document), "<h3>&lt;T&gt;</h3><hr />");
    }

    #[test]
    fn test_diagnostics_are_returned() {
        let converted = convert_with_options(
            "```\nno end",
            &ParseOptions::default(),
            &Options::default(),
        );
        assert_eq!(converted.html, "<pre><code>no end\n</code></pre>");
        let diagnostics = &converted.diagnostics;
        assert!(diagnostics.contains(ParseErrorKind::UnterminatedCodeFence));
    }

    #[test]
    fn test_options_deserialize_with_defaults() {
        let options: Options = serde_json::from_str(r#"{"enable_lazy_images": true}"#).unwrap();
        assert!(options.enable_lazy_images);
        assert!(!options.enable_block_newlines);
    }
}
