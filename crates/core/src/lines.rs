//! Line splitting and block-role classification.
//!
//! Each line is classified on its own, except for code fences: the
//! classifier carries a [`FenceState`] so that everything between an opening
//! fence and its closer comes out as [`LineKind::PlainText`].

/// Fence parsing phases tracked across lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FencePhase {
    /// Not currently inside a fence.
    #[default]
    Outside,
    /// Within fence contents.
    InsideFence,
}

/// Current fence state (phase, marker, indent, and length).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FenceState {
    /// Current fence phase.
    pub phase: FencePhase,
    /// Fence marker character (``` or ~~~).
    pub marker: Option<char>,
    /// Leading whitespace count captured at opening.
    pub indent: usize,
    /// Length of the opening fence (number of ` or ~ characters).
    pub length: usize,
}

/// Block-level role of a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// Empty or whitespace-only line.
    Blank,
    /// `#` to `######` followed by whitespace.
    Heading(u8),
    /// Digits followed by `.` and whitespace; carries the digits.
    OrderedItem(&'a str),
    /// `-`, `*` or `+` followed by whitespace; carries the marker.
    UnorderedItem(char),
    /// Opening or closing fence; an opener may carry a language tag.
    CodeFence(Option<&'a str>),
    /// Three or more of the same `-`, `*` or `_`, nothing else.
    HorizontalRule,
    /// Anything else, including every line inside an open fence.
    PlainText,
}

/// A classified source line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Line<'a> {
    /// Line number (1-indexed).
    pub number: usize,
    /// The line as written, without its line terminator.
    pub raw: &'a str,
    /// Leading whitespace in columns (tabs stop every 4 columns).
    pub indent: usize,
    pub kind: LineKind<'a>,
    /// Text after the block marker: heading title, item text, or the
    /// trimmed line for plain text outside fences.
    pub content: &'a str,
}

/// Stateful line classifier.
#[derive(Debug, Default)]
pub struct Classifier {
    fence: FenceState,
}

impl Classifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Current fence state, e.g. to detect an unterminated fence at the end.
    pub fn fence_state(&self) -> FenceState {
        self.fence
    }

    /// Classify one line and advance fence state.
    pub fn classify_line<'a>(&mut self, number: usize, raw: &'a str) -> Line<'a> {
        let (indent, byte_offset) = leading_whitespace_info(raw);
        let after_indent = &raw[byte_offset..];

        let (kind, content) = if matches!(self.fence.phase, FencePhase::InsideFence) {
            self.classify_inside_fence(indent, after_indent)
        } else {
            self.classify_outside_fence(indent, after_indent)
        };

        Line {
            number,
            raw,
            indent,
            kind,
            content,
        }
    }

    fn classify_inside_fence<'a>(
        &mut self,
        indent: usize,
        after_indent: &'a str,
    ) -> (LineKind<'a>, &'a str) {
        // Closing fence can have 0-3 spaces of indentation
        if indent <= 3
            && is_closing_fence(after_indent)
            && let Some((marker, closer_len)) = detect_fence_marker_with_length(after_indent)
            && Some(marker) == self.fence.marker
            && closer_len >= self.fence.length
        {
            self.fence = FenceState::default();
            return (LineKind::CodeFence(None), "");
        }
        (LineKind::PlainText, after_indent)
    }

    fn classify_outside_fence<'a>(
        &mut self,
        indent: usize,
        after_indent: &'a str,
    ) -> (LineKind<'a>, &'a str) {
        let trimmed = after_indent.trim_end();
        if trimmed.is_empty() {
            return (LineKind::Blank, "");
        }

        if indent <= 3 {
            if let Some((marker, length)) = detect_fence_marker_with_length(trimmed) {
                let info = trimmed[length * marker.len_utf8()..].trim();
                // A backtick fence's info string may not contain backticks.
                if marker != '`' || !info.contains('`') {
                    self.fence = FenceState {
                        phase: FencePhase::InsideFence,
                        marker: Some(marker),
                        indent,
                        length,
                    };
                    return (LineKind::CodeFence(info.split_whitespace().next()), "");
                }
            }
            if let Some((level, title)) = parse_heading(trimmed) {
                return (LineKind::Heading(level), title);
            }
            if is_horizontal_rule(trimmed) {
                return (LineKind::HorizontalRule, "");
            }
        }

        if let Some((marker, text)) = parse_unordered_marker(trimmed) {
            return (LineKind::UnorderedItem(marker), text);
        }
        if let Some((digits, text)) = parse_ordered_marker(trimmed) {
            return (LineKind::OrderedItem(digits), text);
        }

        (LineKind::PlainText, trimmed)
    }
}

/// Split markdown into lines and classify each one.
pub fn classify(input: &str) -> Vec<Line<'_>> {
    let mut classifier = Classifier::new();
    input
        .lines()
        .enumerate()
        .map(|(idx, raw)| classifier.classify_line(idx + 1, raw))
        .collect()
}

/// Returns (visual_columns, byte_offset) for leading whitespace.
/// Visual columns expand tabs to 4-column boundaries.
fn leading_whitespace_info(line: &str) -> (usize, usize) {
    let mut col = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        match b {
            b' ' => {
                col += 1;
                bytes += 1;
            }
            b'\t' => {
                col += 4 - (col % 4);
                bytes += 1;
            }
            _ => break,
        }
    }
    (col, bytes)
}

/// Remove up to `columns` columns of leading whitespace.
pub(crate) fn strip_indent(line: &str, columns: usize) -> &str {
    let mut col = 0;
    let mut bytes = 0;
    for b in line.bytes() {
        let next = match b {
            b' ' => col + 1,
            b'\t' => col + 4 - (col % 4),
            _ => break,
        };
        if next > columns {
            break;
        }
        col = next;
        bytes += 1;
    }
    &line[bytes..]
}

fn detect_fence_marker_with_length(after_indent: &str) -> Option<(char, usize)> {
    let mut chars = after_indent.chars();
    let first = chars.next()?;
    if first != '`' && first != '~' {
        return None;
    }
    let run_len = 1 + chars.take_while(|c| *c == first).count();
    if run_len >= 3 {
        Some((first, run_len))
    } else {
        None
    }
}

/// A closing fence has only fence markers followed by optional whitespace.
fn is_closing_fence(after_indent: &str) -> bool {
    let mut chars = after_indent.chars();
    let first = match chars.next() {
        Some(c) if c == '`' || c == '~' => c,
        _ => return false,
    };
    let mut count = 1;
    for c in chars.by_ref() {
        if c == first {
            count += 1;
        } else {
            return count >= 3 && c.is_whitespace() && chars.all(|c| c.is_whitespace());
        }
    }
    count >= 3
}

/// Returns the level and title of an ATX heading, without any closing `#`s.
fn parse_heading(line: &str) -> Option<(u8, &str)> {
    let level = line.bytes().take_while(|b| *b == b'#').count();
    if !(1..=6).contains(&level) {
        return None;
    }
    let rest = &line[level..];
    if !rest.starts_with([' ', '\t']) {
        return None;
    }
    let title = rest.trim();
    let without_closer = title.trim_end_matches('#');
    let title = if without_closer.is_empty() {
        without_closer
    } else if without_closer.ends_with([' ', '\t']) {
        without_closer.trim_end()
    } else {
        title
    };
    Some((level as u8, title))
}

fn is_horizontal_rule(line: &str) -> bool {
    let mut marks = line.chars().filter(|c| !c.is_whitespace());
    let Some(first) = marks.next() else {
        return false;
    };
    if !matches!(first, '-' | '*' | '_') {
        return false;
    }
    let mut count = 1;
    for c in marks {
        if c != first {
            return false;
        }
        count += 1;
    }
    count >= 3
}

fn parse_unordered_marker(line: &str) -> Option<(char, &str)> {
    let marker = line.chars().next()?;
    if !matches!(marker, '-' | '*' | '+') {
        return None;
    }
    item_text(&line[1..]).map(|text| (marker, text))
}

fn parse_ordered_marker(line: &str) -> Option<(&str, &str)> {
    let digits = line.bytes().take_while(u8::is_ascii_digit).count();
    if !(1..=9).contains(&digits) || line.as_bytes().get(digits) != Some(&b'.') {
        return None;
    }
    item_text(&line[digits + 1..]).map(|text| (&line[..digits], text))
}

/// Text after a list marker; the marker must be followed by whitespace or
/// end the line.
fn item_text(after_marker: &str) -> Option<&str> {
    if after_marker.is_empty() {
        return Some("");
    }
    if after_marker.starts_with([' ', '\t']) {
        Some(after_marker.trim())
    } else {
        None
    }
}
