#![deny(missing_docs)]
//! golb markdown core: line classification, block assembly, inline parsing,
//! and the document tree they produce.
//!
//! Data flows strictly forward: text → classified lines → blocks with raw
//! text → blocks with inline nodes. HTML rendering lives in `golb-md-html`.

/// Block assembly from classified lines.
#[allow(missing_docs)]
pub mod block;
/// Error and diagnostic types.
pub mod error;
/// Inline span parsing.
pub mod inline;
/// Line splitting and classification.
#[allow(missing_docs)]
pub mod lines;
/// Document tree types.
#[allow(missing_docs)]
pub mod node;
/// Parser configuration.
pub mod options;
/// Parsing entry points.
#[allow(missing_docs)]
pub mod parse;

pub use error::{MarkdownError, ParseDiagnostics, ParseError, ParseErrorKind};
pub use inline::{InlineParser, parse_inlines};
pub use lines::{Classifier, FencePhase, FenceState, Line, LineKind, classify};
pub use node::{
    Block, CodeBlock, Document, Heading, HeadingLevel, Inline, List, ListItem, ListKind, plain_text,
};
pub use options::{DEFAULT_MAX_INLINE_DEPTH, DEFAULT_MAX_LIST_DEPTH, ParseOptions};
pub use parse::{Parsed, parse, parse_with_options};
