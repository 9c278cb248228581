//! Regex-driven markdown tokenizer.
//!
//! Recognition runs as a fixed sequence of passes, one pattern class per
//! pass: headers, list items, bold, italic, inline code, fenced code, then
//! the half-typed marker scans. Every match after the first pass is checked
//! against the spans already claimed and dropped on overlap, so earlier
//! passes win without the patterns themselves excluding each other. The
//! result is sorted by start offset and pairwise disjoint.
//!
//! This is deliberately not a nesting-aware parser. Malformed input like
//! `**a*b**` resolves to whatever the non-greedy patterns match first, and
//! a pass can claim a span a later pass would have read differently. Those
//! resolutions are stable and documented by the tests below.
//!
//! Token offsets are character indices into the scanned text.

use crate::error::EngineError;
use crate::stylesheet::BULLET;
use crate::token::{Token, TokenKind};
use regex::{Match, Regex};
use std::ops::Range;

/// Stateless tokenizer holding the compiled recognition patterns.
///
/// Construction compiles every pattern once; [`Tokenizer::tokenize`] borrows
/// a text snapshot and allocates only the output. List patterns accept the
/// bullet glyph alongside `-`, `*`, and `+` so that lines whose marker has
/// been visually substituted still tokenize as list items.
#[derive(Debug, Clone)]
pub struct Tokenizer {
    header: Regex,
    list_item: Regex,
    bold: Regex,
    italic: Regex,
    inline_code: Regex,
    fenced_code: Regex,
    bare_header: Regex,
    bare_list: Regex,
}

impl Tokenizer {
    /// Compile the recognition patterns.
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self {
            header: Regex::new(r"(?m)^(#{1,6})\s+(.+)")?,
            list_item: Regex::new(&format!(r"(?m)^([-*+{BULLET}])\s+(.+)"))?,
            bold: Regex::new(r"\*\*(.+?)\*\*")?,
            italic: Regex::new(r"\*(.+?)\*")?,
            inline_code: Regex::new(r"`(.+?)`")?,
            fenced_code: Regex::new(r"(?s)```(.+?)```")?,
            bare_header: Regex::new(r"(?m)^(#{1,6})\s*$")?,
            bare_list: Regex::new(&format!(r"(?m)^[-*+{BULLET}]\s*$"))?,
        })
    }

    /// Tokenize the whole text.
    ///
    /// Returns tokens sorted by ascending start offset with pairwise
    /// disjoint ranges. Identical input yields identical output.
    pub fn tokenize(&self, text: &str) -> Vec<Token> {
        if text.is_empty() {
            return Vec::new();
        }
        let index = CharIndex::new(text);
        let mut tokens = Vec::new();

        for caps in self.header.captures_iter(text) {
            let (Some(m), Some(level)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            tokens.push(token_at(&index, TokenKind::Header(level.len() as u8), &m));
        }
        for m in self.list_item.find_iter(text) {
            push_unclaimed(&index, &mut tokens, TokenKind::List, &m);
        }
        for m in self.bold.find_iter(text) {
            push_unclaimed(&index, &mut tokens, TokenKind::Bold, &m);
        }
        for m in self.italic.find_iter(text) {
            push_unclaimed(&index, &mut tokens, TokenKind::Italic, &m);
        }
        for m in self.inline_code.find_iter(text) {
            push_unclaimed(&index, &mut tokens, TokenKind::InlineCode, &m);
        }
        for m in self.fenced_code.find_iter(text) {
            push_unclaimed(&index, &mut tokens, TokenKind::CodeBlock, &m);
        }

        scan_unpaired_double_asterisks(&index, &mut tokens);
        scan_lone_asterisks(&index, &mut tokens);
        for caps in self.bare_header.captures_iter(text) {
            let (Some(m), Some(level)) = (caps.get(0), caps.get(1)) else {
                continue;
            };
            let kind = TokenKind::IncompleteHeader(level.len() as u8);
            push_unclaimed(&index, &mut tokens, kind, &m);
        }
        for m in self.bare_list.find_iter(text) {
            push_unclaimed(&index, &mut tokens, TokenKind::IncompleteList, &m);
        }
        scan_lone_backticks(&index, &mut tokens);
        scan_unpaired_fences(&index, &mut tokens);

        tokens.sort_by_key(|t| t.start);
        tokens
    }

    /// Tokenize only `range` (character offsets), shifting the resulting
    /// token offsets back into whole-text coordinates.
    ///
    /// The range is clamped to the text; a zero-length range produces no
    /// tokens. Matches are found against the slice in isolation, which is
    /// exactly what paragraph-local reformatting wants.
    pub fn tokenize_range(&self, text: &str, range: Range<usize>) -> Vec<Token> {
        let char_len = text.chars().count();
        let start = range.start.min(char_len);
        let end = range.end.clamp(start, char_len);
        if start == end {
            return Vec::new();
        }
        let slice = &text[byte_at(text, start)..byte_at(text, end)];
        let mut tokens = self.tokenize(slice);
        for token in &mut tokens {
            token.start += start;
        }
        tokens
    }
}

/// Byte offset of the `char_pos`-th character, or the text length past the
/// end.
fn byte_at(text: &str, char_pos: usize) -> usize {
    text.char_indices()
        .nth(char_pos)
        .map_or(text.len(), |(byte, _)| byte)
}

/// Byte-to-character offset translation for one tokenizer call.
struct CharIndex {
    chars: Vec<char>,
    /// Byte offset of each character, plus a final sentinel at the text
    /// length so match ends translate too.
    byte_of_char: Vec<usize>,
}

impl CharIndex {
    fn new(text: &str) -> Self {
        let mut chars = Vec::with_capacity(text.len());
        let mut byte_of_char = Vec::with_capacity(text.len() + 1);
        for (byte, ch) in text.char_indices() {
            byte_of_char.push(byte);
            chars.push(ch);
        }
        byte_of_char.push(text.len());
        Self {
            chars,
            byte_of_char,
        }
    }

    fn len(&self) -> usize {
        self.chars.len()
    }

    fn char_at(&self, pos: usize) -> Option<char> {
        self.chars.get(pos).copied()
    }

    /// Character offset for a byte offset on a character boundary.
    fn to_char(&self, byte: usize) -> usize {
        self.byte_of_char.partition_point(|&b| b < byte)
    }
}

fn token_at(index: &CharIndex, kind: TokenKind, m: &Match<'_>) -> Token {
    let start = index.to_char(m.start());
    let end = index.to_char(m.end());
    Token::new(kind, start, end - start, m.as_str())
}

/// Whether `[start, end)` intersects any already-claimed token range.
fn claimed(tokens: &[Token], start: usize, end: usize) -> bool {
    tokens.iter().any(|t| t.start < end && start < t.end())
}

fn push_unclaimed(index: &CharIndex, tokens: &mut Vec<Token>, kind: TokenKind, m: &Match<'_>) {
    let start = index.to_char(m.start());
    let end = index.to_char(m.end());
    if !claimed(tokens, start, end) {
        tokens.push(Token::new(kind, start, end - start, m.as_str()));
    }
}

/// `**` not followed by a third `*`. A successful probe consumes both
/// asterisks before the scan resumes, so `***` yields one candidate at
/// offset 1, not two.
fn scan_unpaired_double_asterisks(index: &CharIndex, tokens: &mut Vec<Token>) {
    let mut i = 0;
    while i + 1 < index.len() {
        if index.char_at(i) == Some('*')
            && index.char_at(i + 1) == Some('*')
            && index.char_at(i + 2) != Some('*')
        {
            if !claimed(tokens, i, i + 2) {
                tokens.push(Token::new(TokenKind::IncompleteBold, i, 2, "**"));
            }
            i += 2;
        } else {
            i += 1;
        }
    }
}

/// A `*` with no `*` on either side.
fn scan_lone_asterisks(index: &CharIndex, tokens: &mut Vec<Token>) {
    for i in 0..index.len() {
        if index.char_at(i) != Some('*') {
            continue;
        }
        let preceded = i > 0 && index.char_at(i - 1) == Some('*');
        let followed = index.char_at(i + 1) == Some('*');
        if !preceded && !followed && !claimed(tokens, i, i + 1) {
            tokens.push(Token::new(TokenKind::IncompleteItalic, i, 1, "*"));
        }
    }
}

/// A `` ` `` not followed by another backtick. Backticks opening a pair or
/// triple were claimed by the earlier passes, so only the stragglers
/// survive the overlap check.
fn scan_lone_backticks(index: &CharIndex, tokens: &mut Vec<Token>) {
    for i in 0..index.len() {
        if index.char_at(i) == Some('`')
            && index.char_at(i + 1) != Some('`')
            && !claimed(tokens, i, i + 1)
        {
            tokens.push(Token::new(TokenKind::IncompleteInlineCode, i, 1, "`"));
        }
    }
}

/// A ``` run not followed by a fourth backtick, consumed whole on a probe.
fn scan_unpaired_fences(index: &CharIndex, tokens: &mut Vec<Token>) {
    let mut i = 0;
    while i + 2 < index.len() {
        if index.char_at(i) == Some('`')
            && index.char_at(i + 1) == Some('`')
            && index.char_at(i + 2) == Some('`')
            && index.char_at(i + 3) != Some('`')
        {
            if !claimed(tokens, i, i + 3) {
                tokens.push(Token::new(TokenKind::IncompleteCodeBlock, i, 3, "```"));
            }
            i += 3;
        } else {
            i += 1;
        }
    }
}
