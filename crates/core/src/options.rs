//! Parser configuration.

use serde::{Deserialize, Serialize};

/// Default cap on nested list depth.
pub const DEFAULT_MAX_LIST_DEPTH: usize = 64;
/// Default cap on nested emphasis depth.
pub const DEFAULT_MAX_INLINE_DEPTH: usize = 32;

/// Limits applied while building the tree.
///
/// Markdown input is untrusted; both limits bound recursion when the tree is
/// later rendered or dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ParseOptions {
    /// Deepest list nesting kept as structure. Deeper items are flattened
    /// into the text of the deepest permitted item.
    pub max_list_depth: usize,
    /// Deepest emphasis nesting. Pairs past this stay literal.
    pub max_inline_depth: usize,
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            max_list_depth: DEFAULT_MAX_LIST_DEPTH,
            max_inline_depth: DEFAULT_MAX_INLINE_DEPTH,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_fields_use_defaults() {
        let options: ParseOptions = serde_json::from_str(r#"{"maxListDepth": 4}"#).unwrap();
        assert_eq!(options.max_list_depth, 4);
        assert_eq!(options.max_inline_depth, DEFAULT_MAX_INLINE_DEPTH);
    }
}
