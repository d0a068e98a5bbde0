//! Block assembly.
//!
//! Folds classified lines into a block tree whose text leaves are still raw
//! strings. Line classification is never revisited here.

use crate::error::{ParseDiagnostics, ParseErrorKind};
use crate::lines::{Line, LineKind, strip_indent};
use crate::node::{CodeBlock, HeadingLevel, ListKind};
use crate::options::ParseOptions;

/// A block whose text has not been parsed for inline spans yet.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawBlock {
    Heading {
        level: HeadingLevel,
        text: String,
        line: usize,
    },
    /// Consecutive text lines joined with single spaces.
    Paragraph {
        text: String,
        line: usize,
    },
    CodeBlock(CodeBlock),
    List(RawList),
    HorizontalRule,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawList {
    pub kind: ListKind,
    pub items: Vec<RawItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawItem {
    pub text: String,
    /// Line the item marker was on.
    pub line: usize,
    pub children: Vec<RawList>,
}

impl RawItem {
    fn new(text: &str, line: usize) -> Self {
        Self {
            text: text.to_string(),
            line,
            children: Vec::new(),
        }
    }
}

/// Assemble classified lines into raw blocks.
pub fn assemble(
    lines: &[Line<'_>],
    options: &ParseOptions,
    diagnostics: &mut ParseDiagnostics,
) -> Vec<RawBlock> {
    let mut assembler = Assembler::new(options, diagnostics);
    for line in lines {
        assembler.push_line(line);
    }
    assembler.finish()
}

struct OpenList {
    kind: ListKind,
    /// Indentation of this list's item markers.
    indent: usize,
    items: Vec<RawItem>,
}

struct OpenCode {
    language: Option<String>,
    indent: usize,
    code: String,
    line: usize,
}

struct Paragraph {
    text: String,
    line: usize,
}

struct Assembler<'o, 'd> {
    options: &'o ParseOptions,
    diagnostics: &'d mut ParseDiagnostics,
    blocks: Vec<RawBlock>,
    paragraph: Option<Paragraph>,
    /// Open lists, outermost first.
    lists: Vec<OpenList>,
    code: Option<OpenCode>,
}

impl<'o, 'd> Assembler<'o, 'd> {
    fn new(options: &'o ParseOptions, diagnostics: &'d mut ParseDiagnostics) -> Self {
        Self {
            options,
            diagnostics,
            blocks: Vec::new(),
            paragraph: None,
            lists: Vec::new(),
            code: None,
        }
    }

    fn push_line(&mut self, line: &Line<'_>) {
        if let Some(code) = self.code.as_mut() {
            if matches!(line.kind, LineKind::CodeFence(_)) {
                self.close_code();
            } else {
                code.code.push_str(strip_indent(line.raw, code.indent));
                code.code.push('\n');
            }
            return;
        }

        match line.kind {
            LineKind::Blank => {
                self.flush_paragraph();
                self.flush_lists();
            }
            LineKind::Heading(level) => match HeadingLevel::new(level) {
                Ok(level) => {
                    self.flush_all();
                    self.blocks.push(RawBlock::Heading {
                        level,
                        text: line.content.to_string(),
                        line: line.number,
                    });
                }
                Err(_) => self.push_text(line.raw.trim(), line.number),
            },
            LineKind::OrderedItem(digits) => {
                let start = digits.parse().unwrap_or(1);
                self.flush_paragraph();
                self.push_item(ListKind::Ordered { start }, line);
            }
            LineKind::UnorderedItem(_) => {
                self.flush_paragraph();
                self.push_item(ListKind::Unordered, line);
            }
            LineKind::CodeFence(language) => {
                self.flush_all();
                self.code = Some(OpenCode {
                    language: language.map(str::to_string),
                    indent: line.indent,
                    code: String::new(),
                    line: line.number,
                });
            }
            LineKind::HorizontalRule => {
                self.flush_all();
                self.blocks.push(RawBlock::HorizontalRule);
            }
            LineKind::PlainText => self.push_text(line.content, line.number),
        }
    }

    fn finish(mut self) -> Vec<RawBlock> {
        if let Some(code) = &self.code {
            self.diagnostics
                .add(ParseErrorKind::UnterminatedCodeFence, code.line);
            self.close_code();
        }
        self.flush_all();
        self.blocks
    }

    fn push_text(&mut self, text: &str, line: usize) {
        self.flush_lists();
        match self.paragraph.as_mut() {
            Some(paragraph) => {
                paragraph.text.push(' ');
                paragraph.text.push_str(text);
            }
            None => {
                self.paragraph = Some(Paragraph {
                    text: text.to_string(),
                    line,
                });
            }
        }
    }

    fn push_item(&mut self, kind: ListKind, line: &Line<'_>) {
        let indent = line.indent;
        while self.lists.len() > 1 && self.lists.last().is_some_and(|top| top.indent > indent) {
            self.close_list();
        }

        let depth = self.lists.len();
        let limit = self.options.max_list_depth.max(1);
        let item = RawItem::new(line.content, line.number);

        let Some(top) = self.lists.last_mut() else {
            self.lists.push(OpenList {
                kind,
                indent,
                items: vec![item],
            });
            return;
        };

        if indent > top.indent {
            if depth >= limit {
                // Too deep: keep the line as text of the deepest item.
                if let Some(last) = top.items.last_mut() {
                    last.text.push(' ');
                    last.text.push_str(line.raw.trim());
                }
                self.diagnostics.add(
                    ParseErrorKind::StructuralLimitExceeded { limit },
                    line.number,
                );
                return;
            }
            self.lists.push(OpenList {
                kind,
                indent,
                items: vec![item],
            });
        } else if top.kind.same_family(kind) {
            top.items.push(item);
        } else {
            self.close_list();
            self.lists.push(OpenList {
                kind,
                indent,
                items: vec![item],
            });
        }
    }

    /// Close the innermost open list, attaching it to its parent item.
    fn close_list(&mut self) {
        let Some(open) = self.lists.pop() else {
            return;
        };
        let list = RawList {
            kind: open.kind,
            items: open.items,
        };
        match self
            .lists
            .last_mut()
            .and_then(|parent| parent.items.last_mut())
        {
            Some(parent_item) => parent_item.children.push(list),
            None => self.blocks.push(RawBlock::List(list)),
        }
    }

    fn close_code(&mut self) {
        if let Some(code) = self.code.take() {
            self.blocks.push(RawBlock::CodeBlock(CodeBlock {
                language: code.language,
                code: code.code,
            }));
        }
    }

    fn flush_paragraph(&mut self) {
        if let Some(paragraph) = self.paragraph.take() {
            self.blocks.push(RawBlock::Paragraph {
                text: paragraph.text,
                line: paragraph.line,
            });
        }
    }

    fn flush_lists(&mut self) {
        while !self.lists.is_empty() {
            self.close_list();
        }
    }

    fn flush_all(&mut self) {
        self.flush_paragraph();
        self.flush_lists();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lines::classify;

    fn blocks(input: &str) -> Vec<RawBlock> {
        let mut diagnostics = ParseDiagnostics::new();
        assemble(&classify(input), &ParseOptions::default(), &mut diagnostics)
    }

    fn item_texts(list: &RawList) -> Vec<&str> {
        list.items.iter().map(|item| item.text.as_str()).collect()
    }

    #[test]
    fn joins_paragraph_lines_with_spaces() {
        let result = blocks("first line\n  second line\n\nnext");
        assert_eq!(
            result,
            vec![
                RawBlock::Paragraph {
                    text: "first line second line".to_string(),
                    line: 1,
                },
                RawBlock::Paragraph {
                    text: "next".to_string(),
                    line: 4,
                },
            ]
        );
    }

    #[test]
    fn heading_interrupts_paragraph() {
        let result = blocks("text\n## Title\nmore");
        assert_eq!(result.len(), 3);
        assert!(matches!(
            &result[1],
            RawBlock::Heading { level, text, .. } if level.get() == 2 && text == "Title"
        ));
    }

    #[test]
    fn consecutive_items_group_into_one_list() {
        let result = blocks("- a\n- b\n- c");
        assert_eq!(result.len(), 1);
        let RawBlock::List(list) = &result[0] else {
            panic!("expected list, got {:?}", result[0]);
        };
        assert_eq!(list.kind, ListKind::Unordered);
        assert_eq!(item_texts(list), vec!["a", "b", "c"]);
    }

    #[test]
    fn blank_line_splits_lists() {
        let result = blocks("- a\n- b\n\n- c");
        assert_eq!(result.len(), 2);
        assert!(matches!(&result[0], RawBlock::List(l) if l.items.len() == 2));
        assert!(matches!(&result[1], RawBlock::List(l) if l.items.len() == 1));
    }

    #[test]
    fn kind_change_starts_new_list() {
        let result = blocks("- a\n1. b\n2. c\n* d");
        assert_eq!(result.len(), 3);
        assert!(matches!(&result[0], RawBlock::List(l) if l.kind == ListKind::Unordered));
        assert!(matches!(
            &result[1],
            RawBlock::List(l) if l.kind == ListKind::Ordered { start: 1 } && l.items.len() == 2
        ));
        assert!(matches!(&result[2], RawBlock::List(l) if l.kind == ListKind::Unordered));
    }

    #[test]
    fn ordered_list_keeps_start_number() {
        let result = blocks("7. seven\n8. eight");
        assert!(matches!(
            &result[0],
            RawBlock::List(l) if l.kind == ListKind::Ordered { start: 7 }
        ));
    }

    #[test]
    fn indentation_nests_and_dedent_returns() {
        let result = blocks("- a\n  - a1\n    1. a1x\n  - a2\n- b");
        assert_eq!(result.len(), 1);
        let RawBlock::List(list) = &result[0] else {
            panic!("expected list");
        };
        assert_eq!(item_texts(list), vec!["a", "b"]);
        let nested = &list.items[0].children[0];
        assert_eq!(item_texts(nested), vec!["a1", "a2"]);
        let deepest = &nested.items[0].children[0];
        assert_eq!(deepest.kind, ListKind::Ordered { start: 1 });
        assert_eq!(item_texts(deepest), vec!["a1x"]);
        assert!(list.items[1].children.is_empty());
    }

    #[test]
    fn dedent_below_first_item_stays_in_list() {
        let result = blocks("  - a\n- b");
        assert_eq!(result.len(), 1);
        assert!(matches!(&result[0], RawBlock::List(l) if l.items.len() == 2));
    }

    #[test]
    fn plain_text_closes_list() {
        let result = blocks("- a\ncontinued");
        assert_eq!(result.len(), 2);
        assert!(matches!(&result[1], RawBlock::Paragraph { text, .. } if text == "continued"));
    }

    #[test]
    fn list_depth_is_capped() {
        let options = ParseOptions {
            max_list_depth: 2,
            ..ParseOptions::default()
        };
        let mut diagnostics = ParseDiagnostics::new();
        let input = "- a\n  - b\n    - c\n      - d";
        let result = assemble(&classify(input), &options, &mut diagnostics);

        let RawBlock::List(list) = &result[0] else {
            panic!("expected list");
        };
        let second = &list.items[0].children[0];
        assert_eq!(second.items[0].text, "b - c - d");
        assert!(second.items[0].children.is_empty());
        assert_eq!(diagnostics.count(), 2);
        assert!(diagnostics.contains(ParseErrorKind::StructuralLimitExceeded { limit: 2 }));
    }

    #[test]
    fn code_block_keeps_content_verbatim() {
        let result = blocks("```rust\nlet a = 1;\n\n# not heading\n```\nafter");
        assert_eq!(
            result[0],
            RawBlock::CodeBlock(CodeBlock {
                language: Some("rust".to_string()),
                code: "let a = 1;\n\n# not heading\n".to_string(),
            })
        );
        assert!(matches!(&result[1], RawBlock::Paragraph { text, .. } if text == "after"));
    }

    #[test]
    fn code_block_strips_fence_indent() {
        let result = blocks("  ```\n    indented\n x\n  ```");
        assert_eq!(
            result[0],
            RawBlock::CodeBlock(CodeBlock {
                language: None,
                code: "  indented\nx\n".to_string(),
            })
        );
    }

    #[test]
    fn unterminated_fence_closes_at_end() {
        let mut diagnostics = ParseDiagnostics::new();
        let input = "intro\n\n```\nline one\nline two";
        let result = assemble(&classify(input), &ParseOptions::default(), &mut diagnostics);
        assert_eq!(result.len(), 2);
        assert_eq!(
            result[1],
            RawBlock::CodeBlock(CodeBlock {
                language: None,
                code: "line one\nline two\n".to_string(),
            })
        );
        let warning = diagnostics.iter().next().unwrap();
        assert_eq!(warning.kind, ParseErrorKind::UnterminatedCodeFence);
        assert_eq!(warning.line, 3);
    }

    #[test]
    fn rules_and_blank_lines() {
        let result = blocks("\n\n---\n\n");
        assert_eq!(result, vec![RawBlock::HorizontalRule]);
        assert!(blocks("").is_empty());
    }
}
