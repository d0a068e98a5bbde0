use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised when a tree is built by hand with values the model forbids.
///
/// Parsing never produces these; they guard programmatic construction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MarkdownError {
    /// Heading level outside `1..=6`.
    #[error("heading level {0} is outside 1..=6")]
    InvalidHeadingLevel(u8),
}

/// Kind of problem the parser recovered from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ParseErrorKind {
    /// Nesting went past a configured cap; the excess was flattened.
    #[error("nesting limit of {limit} exceeded")]
    StructuralLimitExceeded {
        /// The configured cap that was hit.
        limit: usize,
    },
    /// Code fence opened but never closed; closed at end of input.
    #[error("unterminated code fence")]
    UnterminatedCodeFence,
    /// `[`/`![` without the closing bracket or paren; kept as literal text.
    #[error("malformed link or image")]
    MalformedLinkOrImage,
}

/// A recovered parse problem with the line it was found on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("{kind} at line {line}")]
pub struct ParseError {
    /// What went wrong.
    pub kind: ParseErrorKind,
    /// Line number (1-indexed).
    pub line: usize,
}

impl ParseError {
    /// Create a new parse error at the given line.
    pub fn new(kind: ParseErrorKind, line: usize) -> Self {
        Self { kind, line }
    }
}

/// Collection of problems recovered while parsing one document.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseDiagnostics {
    /// Recovered problems in the order they were found.
    pub warnings: Vec<ParseError>,
}

impl ParseDiagnostics {
    /// Create a new empty diagnostics collection
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a recovered problem.
    pub fn add(&mut self, kind: ParseErrorKind, line: usize) {
        let warning = ParseError::new(kind, line);
        log::debug!("markdown parse recovered: {}", warning);
        self.warnings.push(warning);
    }

    /// Check if there are any diagnostics
    pub fn has_any(&self) -> bool {
        !self.warnings.is_empty()
    }

    /// Get total count of all diagnostics
    pub fn count(&self) -> usize {
        self.warnings.len()
    }

    /// Iterate over the recorded problems.
    pub fn iter(&self) -> impl Iterator<Item = &ParseError> {
        self.warnings.iter()
    }

    /// Check whether a problem of the given kind was recorded.
    pub fn contains(&self, kind: ParseErrorKind) -> bool {
        self.warnings.iter().any(|w| w.kind == kind)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_line() {
        let err = ParseError::new(ParseErrorKind::UnterminatedCodeFence, 4);
        assert_eq!(err.to_string(), "unterminated code fence at line 4");

        let err = ParseError::new(ParseErrorKind::StructuralLimitExceeded { limit: 64 }, 9);
        assert_eq!(err.to_string(), "nesting limit of 64 exceeded at line 9");
    }

    #[test]
    fn diagnostics_collect_in_order() {
        let mut diagnostics = ParseDiagnostics::new();
        assert!(!diagnostics.has_any());

        diagnostics.add(ParseErrorKind::MalformedLinkOrImage, 2);
        diagnostics.add(ParseErrorKind::UnterminatedCodeFence, 5);

        assert_eq!(diagnostics.count(), 2);
        assert!(diagnostics.contains(ParseErrorKind::UnterminatedCodeFence));
        let lines: Vec<usize> = diagnostics.iter().map(|w| w.line).collect();
        assert_eq!(lines, vec![2, 5]);
    }

    #[test]
    fn heading_level_error_message() {
        assert_eq!(
            MarkdownError::InvalidHeadingLevel(7).to_string(),
            "heading level 7 is outside 1..=6"
        );
    }
}
