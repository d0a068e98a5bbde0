#![deny(missing_docs)]
//! golb markdown HTML engine: tree rendering, one-shot conversion, and
//! parallel batch conversion.
//!
//! ```
//! use golb_md_html::{convert, parse, render};
//!
//! let document = parse("- a\n- b");
//! assert_eq!(render(&document), "<ul><li>a</li><li>b</li></ul>");
//! assert_eq!(convert("- a\n- b"), render(&document));
//! ```

/// Parallel conversion of independent documents.
pub mod batch;
/// Rendering layer (tree to HTML).
pub mod renderer;

pub use batch::{BatchInput, BatchOptions, BatchOutput, BatchResult, BatchStats, convert_batch};
pub use golb_md_core::{Document, ParseDiagnostics, ParseOptions, Parsed, parse, parse_with_options};
pub use renderer::{Converted, Options, convert, convert_with_options, render, render_with_options};
