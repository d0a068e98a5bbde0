//! Inline span parsing.
//!
//! Text is scanned once into tokens: literal text, finished nodes (code
//! spans, links, images), and runs of `*`/`_`. Emphasis is then resolved by
//! walking closers left to right and pairing each with the nearest opener of
//! the same character. Whatever stays unpaired is emitted as literal text.

use crate::error::{ParseDiagnostics, ParseErrorKind};
use crate::node::{Inline, plain_text};
use crate::options::ParseOptions;
use std::collections::HashMap;

/// Parentheses a bare link destination may nest before it is rejected.
const MAX_DESTINATION_PARENS: usize = 32;

/// A run of `*` or `_` and which sides it may act on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Delimiter {
    ch: char,
    count: usize,
    can_open: bool,
    can_close: bool,
}

impl Delimiter {
    /// Flanking rule: open only when followed by non-whitespace, close only
    /// when preceded by non-whitespace. `_` never opens or closes intraword.
    fn new(ch: char, count: usize, prev: Option<char>, next: Option<char>) -> Self {
        let mut can_open = next.is_some_and(|c| !c.is_whitespace());
        let mut can_close = prev.is_some_and(|c| !c.is_whitespace());
        if ch == '_' {
            can_open &= !prev.is_some_and(char::is_alphanumeric);
            can_close &= !next.is_some_and(char::is_alphanumeric);
        }
        Self {
            ch,
            count,
            can_open,
            can_close,
        }
    }
}

#[derive(Debug)]
enum Token {
    Text(String),
    /// A finished node and the nesting depth of its subtree.
    Node {
        inline: Inline,
        depth: usize,
    },
    Delim(Delimiter),
}

impl Token {
    fn depth(&self) -> usize {
        match self {
            Token::Node { depth, .. } => *depth,
            _ => 0,
        }
    }

    fn delimiter(&self) -> Option<Delimiter> {
        match self {
            Token::Delim(delimiter) => Some(*delimiter),
            _ => None,
        }
    }

    fn consume(&mut self, used: usize) {
        if let Token::Delim(delimiter) = self {
            delimiter.count -= used;
        }
    }

    fn is_spent(&self) -> bool {
        matches!(self, Token::Delim(delimiter) if delimiter.count == 0)
    }
}

/// Code span and bracket positions of one span of text, found up front so
/// the scanner never searches ahead from every candidate.
struct SpanIndex {
    /// Starts of maximal backtick runs, keyed by run length.
    backticks: HashMap<usize, Vec<usize>>,
    /// Offset of each `[` mapped to the offset of its matching `]`.
    labels: HashMap<usize, usize>,
}

impl SpanIndex {
    fn new(text: &str) -> Self {
        let mut backticks: HashMap<usize, Vec<usize>> = HashMap::new();
        let mut search = 0;
        while let Some(offset) = text[search..].find('`') {
            let start = search + offset;
            let len = run_length(text, start, '`');
            backticks.entry(len).or_default().push(start);
            search = start + len;
        }

        let mut index = Self {
            backticks,
            labels: HashMap::new(),
        };
        index.match_brackets(text);
        index
    }

    /// Start of the first backtick run of exactly `len` at or after `from`.
    fn closing_run(&self, from: usize, len: usize) -> Option<usize> {
        let starts = self.backticks.get(&len)?;
        starts
            .get(starts.partition_point(|&start| start < from))
            .copied()
    }

    fn label_end(&self, open: usize) -> Option<usize> {
        self.labels.get(&open).copied()
    }

    /// Pair brackets with a stack. Escaped brackets and brackets inside
    /// code spans do not count.
    fn match_brackets(&mut self, text: &str) {
        let mut open = Vec::new();
        let mut pos = 0;
        while let Some(c) = text[pos..].chars().next() {
            match c {
                '\\' => {
                    pos += 1;
                    if let Some(next) = text[pos..].chars().next() {
                        pos += next.len_utf8();
                    }
                    continue;
                }
                '`' => {
                    let run = run_length(text, pos, '`');
                    pos = match self.closing_run(pos + run, run) {
                        Some(close) => close + run,
                        None => pos + run,
                    };
                    continue;
                }
                '[' => open.push(pos),
                ']' => {
                    if let Some(start) = open.pop() {
                        self.labels.insert(start, pos);
                    }
                }
                _ => {}
            }
            pos += c.len_utf8();
        }
    }
}

/// Target part of a link or image: `(destination "title")`.
struct Target {
    destination: String,
    title: Option<String>,
    /// Byte offset just past the closing `)`.
    end: usize,
}

/// Inline parser bound to one document's options and diagnostics.
pub struct InlineParser<'o, 'd> {
    options: &'o ParseOptions,
    diagnostics: &'d mut ParseDiagnostics,
    line: usize,
}

impl<'o, 'd> InlineParser<'o, 'd> {
    /// Create a parser that records problems into `diagnostics`.
    pub fn new(options: &'o ParseOptions, diagnostics: &'d mut ParseDiagnostics) -> Self {
        Self {
            options,
            diagnostics,
            line: 1,
        }
    }

    /// Parse one block's raw text. `line` is used for diagnostics.
    pub fn parse(&mut self, text: &str, line: usize) -> Vec<Inline> {
        self.line = line;
        self.parse_span(text, 0, false).0
    }

    fn parse_span(&mut self, text: &str, nesting: usize, in_link: bool) -> (Vec<Inline>, usize) {
        let mut tokens = self.scan(text, nesting, in_link);
        self.process_emphasis(&mut tokens);
        let depth = tokens.iter().map(Token::depth).max().unwrap_or(0);
        (into_inlines(tokens), depth)
    }

    fn scan(&mut self, text: &str, nesting: usize, in_link: bool) -> Vec<Token> {
        let index = SpanIndex::new(text);
        let mut tokens = Vec::new();
        let mut buffer = String::new();
        let mut pos = 0;

        while let Some(c) = text[pos..].chars().next() {
            match c {
                '\\' => match text[pos + 1..].chars().next() {
                    Some(next) if next.is_ascii_punctuation() => {
                        buffer.push(next);
                        pos += 1 + next.len_utf8();
                    }
                    _ => {
                        buffer.push('\\');
                        pos += 1;
                    }
                },
                '`' => {
                    let run = run_length(text, pos, '`');
                    match find_code_span(text, pos, run, &index) {
                        Some((code, end)) => {
                            flush_text(&mut buffer, &mut tokens);
                            tokens.push(Token::Node {
                                inline: Inline::InlineCode(code),
                                depth: 1,
                            });
                            pos = end;
                        }
                        None => {
                            buffer.push_str(&text[pos..pos + run]);
                            pos += run;
                        }
                    }
                }
                '*' | '_' => {
                    let run = run_length(text, pos, c);
                    let prev = text[..pos].chars().next_back();
                    let next = text[pos + run..].chars().next();
                    flush_text(&mut buffer, &mut tokens);
                    tokens.push(Token::Delim(Delimiter::new(c, run, prev, next)));
                    pos += run;
                }
                '!' if text[pos + 1..].starts_with('[') => {
                    match self.parse_link_or_image(text, &index, pos + 1, nesting, true) {
                        Some((token, end)) => {
                            flush_text(&mut buffer, &mut tokens);
                            tokens.push(token);
                            pos = end;
                        }
                        None => {
                            buffer.push_str("![");
                            pos += 2;
                        }
                    }
                }
                '[' if !in_link => {
                    let parsed = self.parse_link_or_image(text, &index, pos, nesting, false);
                    match parsed {
                        Some((token, end)) => {
                            flush_text(&mut buffer, &mut tokens);
                            tokens.push(token);
                            pos = end;
                        }
                        None => {
                            buffer.push('[');
                            pos += 1;
                        }
                    }
                }
                _ => {
                    buffer.push(c);
                    pos += c.len_utf8();
                }
            }
        }

        flush_text(&mut buffer, &mut tokens);
        tokens
    }

    /// Parse `[label](target)` starting at the `[` at `open`.
    fn parse_link_or_image(
        &mut self,
        text: &str,
        index: &SpanIndex,
        open: usize,
        nesting: usize,
        image: bool,
    ) -> Option<(Token, usize)> {
        let limit = self.options.max_inline_depth;
        if nesting >= limit {
            self.diagnostics
                .add(ParseErrorKind::StructuralLimitExceeded { limit }, self.line);
            return None;
        }

        let Some(close) = index.label_end(open) else {
            if image {
                self.malformed();
            }
            return None;
        };
        let after_label = close + 1;
        if !text[after_label..].starts_with('(') {
            if image {
                self.malformed();
            }
            return None;
        }
        let Some(target) = parse_target(text, after_label + 1) else {
            self.malformed();
            return None;
        };

        let (children, depth) = self.parse_span(&text[open + 1..close], nesting + 1, true);
        let token = if image {
            Token::Node {
                inline: Inline::Image {
                    src: target.destination,
                    alt: plain_text(&children),
                    title: target.title,
                },
                depth: 1,
            }
        } else {
            Token::Node {
                inline: Inline::Link {
                    href: target.destination,
                    title: target.title,
                    children,
                },
                depth: depth + 1,
            }
        };
        Some((token, target.end))
    }

    fn malformed(&mut self) {
        self.diagnostics
            .add(ParseErrorKind::MalformedLinkOrImage, self.line);
    }

    fn process_emphasis(&mut self, tokens: &mut Vec<Token>) {
        let limit = self.options.max_inline_depth;
        // Per delimiter character, the lowest index that can still hold an
        // opener. Nothing below it pairs with any later closer.
        let mut floors = [0usize; 2];
        let slot = |ch: char| usize::from(ch == '_');
        let mut closer = 0;

        while closer < tokens.len() {
            let Some(close) = tokens[closer].delimiter() else {
                closer += 1;
                continue;
            };
            if !close.can_close || close.count == 0 {
                closer += 1;
                continue;
            }

            let floor = floors[slot(close.ch)];
            let opener = tokens[floor..closer]
                .iter()
                .rposition(|token| {
                    token
                        .delimiter()
                        .is_some_and(|d| d.ch == close.ch && d.can_open && d.count > 0)
                })
                .map(|offset| floor + offset);
            let Some(opener) = opener else {
                floors[slot(close.ch)] = closer;
                closer += 1;
                continue;
            };
            let Some(open) = tokens[opener].delimiter() else {
                closer += 1;
                continue;
            };

            let depth = 1 + tokens[opener + 1..closer]
                .iter()
                .map(Token::depth)
                .max()
                .unwrap_or(0);
            if depth > limit {
                // Every earlier opener would enclose the same content.
                self.diagnostics
                    .add(ParseErrorKind::StructuralLimitExceeded { limit }, self.line);
                floors[slot(close.ch)] = closer;
                closer += 1;
                continue;
            }

            let used = open.count.min(close.count).min(3);
            let children = into_inlines(tokens.drain(opener + 1..closer).collect());
            let inline = match used {
                3 => Inline::BoldItalic(children),
                2 => Inline::Bold(children),
                _ => Inline::Italic(children),
            };
            tokens.insert(opener + 1, Token::Node { inline, depth });

            let mut node = opener + 1;
            let mut next = opener + 2;
            tokens[next].consume(used);
            tokens[opener].consume(used);
            if tokens[next].is_spent() {
                tokens.remove(next);
            }
            if tokens[opener].is_spent() {
                tokens.remove(opener);
                node -= 1;
                next -= 1;
            }
            for floor in &mut floors {
                *floor = (*floor).min(node);
            }
            closer = next;
        }
    }
}

/// Parse inline spans with default options, discarding diagnostics.
pub fn parse_inlines(text: &str) -> Vec<Inline> {
    let options = ParseOptions::default();
    let mut diagnostics = ParseDiagnostics::new();
    InlineParser::new(&options, &mut diagnostics).parse(text, 1)
}

fn flush_text(buffer: &mut String, tokens: &mut Vec<Token>) {
    if !buffer.is_empty() {
        tokens.push(Token::Text(std::mem::take(buffer)));
    }
}

fn push_text(out: &mut Vec<Inline>, text: String) {
    if text.is_empty() {
        return;
    }
    match out.last_mut() {
        Some(Inline::Text(last)) => last.push_str(&text),
        _ => out.push(Inline::Text(text)),
    }
}

/// Unpaired delimiters become literal text; adjacent text is merged.
fn into_inlines(tokens: Vec<Token>) -> Vec<Inline> {
    let mut out = Vec::with_capacity(tokens.len());
    for token in tokens {
        match token {
            Token::Text(text) => push_text(&mut out, text),
            Token::Node { inline, .. } => out.push(inline),
            Token::Delim(delimiter) => {
                push_text(&mut out, delimiter.ch.to_string().repeat(delimiter.count));
            }
        }
    }
    out
}

fn run_length(text: &str, pos: usize, ch: char) -> usize {
    text[pos..].chars().take_while(|c| *c == ch).count() * ch.len_utf8()
}

/// Find the backtick run of exactly `run` characters closing the span that
/// opens at `pos`. Returns the normalized code and the end offset.
fn find_code_span(
    text: &str,
    pos: usize,
    run: usize,
    index: &SpanIndex,
) -> Option<(String, usize)> {
    let content_start = pos + run;
    let start = index.closing_run(content_start, run)?;
    let code = &text[content_start..start];
    let code = if code.len() >= 2
        && code.starts_with(' ')
        && code.ends_with(' ')
        && !code.trim().is_empty()
    {
        &code[1..code.len() - 1]
    } else {
        code
    };
    Some((code.to_string(), start + run))
}

/// Parse `destination "title")` starting just after the `(`.
fn parse_target(text: &str, start: usize) -> Option<Target> {
    let mut chars = text[start..].char_indices().peekable();
    let mut destination = String::new();

    skip_whitespace(&mut chars);
    if chars.next_if(|(_, c)| *c == '<').is_some() {
        loop {
            let (_, c) = chars.next()?;
            match c {
                '>' => break,
                '<' => return None,
                '\\' => push_escaped(&mut chars, &mut destination),
                _ => destination.push(c),
            }
        }
    } else {
        let mut parens = 0usize;
        while let Some(&(_, c)) = chars.peek() {
            if c.is_whitespace() || (c == ')' && parens == 0) {
                break;
            }
            chars.next();
            match c {
                '(' => {
                    if parens == MAX_DESTINATION_PARENS {
                        return None;
                    }
                    parens += 1;
                    destination.push(c);
                }
                ')' => {
                    parens -= 1;
                    destination.push(c);
                }
                '\\' => push_escaped(&mut chars, &mut destination),
                _ => destination.push(c),
            }
        }
    }

    skip_whitespace(&mut chars);
    let mut title = None;
    if let Some((_, quote)) = chars.next_if(|(_, c)| *c == '"' || *c == '\'') {
        let mut value = String::new();
        loop {
            let (_, c) = chars.next()?;
            match c {
                '\\' => push_escaped(&mut chars, &mut value),
                c if c == quote => break,
                _ => value.push(c),
            }
        }
        title = Some(value);
        skip_whitespace(&mut chars);
    }

    let (idx, c) = chars.next()?;
    if c != ')' {
        return None;
    }
    Some(Target {
        destination,
        title,
        end: start + idx + 1,
    })
}

type CharIndices<'a> = std::iter::Peekable<std::str::CharIndices<'a>>;

fn skip_whitespace(chars: &mut CharIndices<'_>) {
    while chars.next_if(|(_, c)| c.is_whitespace()).is_some() {}
}

/// Handle the character after a backslash: escaped punctuation is pushed
/// alone, anything else keeps the backslash.
fn push_escaped(chars: &mut CharIndices<'_>, out: &mut String) {
    match chars.next_if(|(_, c)| c.is_ascii_punctuation()) {
        Some((_, escaped)) => out.push(escaped),
        None => out.push('\\'),
    }
}
