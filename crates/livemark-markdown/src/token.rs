//! Markdown token model.
//!
//! Tokens are ephemeral: the tokenizer recomputes them on every formatting
//! pass and nothing stores them across edits. A token records which span of
//! the scanned text matched which construct; the engine turns that into
//! style runs and forgets the token.

use std::ops::Range;

/// The markdown construct a token represents.
///
/// `Incomplete*` variants mark half-typed syntax (a lone `*`, a bare `#`
/// line) that should be dimmed rather than rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// `**text**`
    Bold,
    /// `*text*`
    Italic,
    /// `# text` through `###### text`; the payload is the level (1..=6).
    Header(u8),
    /// `- text`, `* text`, or `+ text` at the start of a line.
    List,
    /// `` `text` ``
    InlineCode,
    /// ` ```text``` ` spanning any number of lines.
    CodeBlock,
    /// Text matched by no markdown pattern.
    Plain,
    /// A `**` pair with nothing closing it.
    IncompleteBold,
    /// A lone `*` with no partner.
    IncompleteItalic,
    /// A `#` run on an otherwise blank line; the payload is the level.
    IncompleteHeader(u8),
    /// A list marker on an otherwise blank line.
    IncompleteList,
    /// A lone backtick.
    IncompleteInlineCode,
    /// A ``` fence with nothing closing it.
    IncompleteCodeBlock,
}

impl TokenKind {
    /// Whether this kind represents fully formed syntax.
    pub fn is_complete(self) -> bool {
        !matches!(
            self,
            TokenKind::IncompleteBold
                | TokenKind::IncompleteItalic
                | TokenKind::IncompleteHeader(_)
                | TokenKind::IncompleteList
                | TokenKind::IncompleteInlineCode
                | TokenKind::IncompleteCodeBlock
        )
    }
}

/// One matched span of markdown syntax.
///
/// Offsets are character indices into the text the tokenizer scanned.
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    /// The construct matched.
    pub kind: TokenKind,
    /// Start offset of the match.
    pub start: usize,
    /// Length of the match in characters.
    pub len: usize,
    /// The matched substring, including its markers.
    pub text: String,
}

impl Token {
    /// Create a token for the given span.
    pub fn new(kind: TokenKind, start: usize, len: usize, text: impl Into<String>) -> Self {
        Self {
            kind,
            start,
            len,
            text: text.into(),
        }
    }

    /// Offset one past the last character of the match.
    pub fn end(&self) -> usize {
        self.start + self.len
    }

    /// The matched span as a range.
    pub fn range(&self) -> Range<usize> {
        self.start..self.end()
    }

    /// Whether this token represents fully formed syntax.
    pub fn is_complete(&self) -> bool {
        self.kind.is_complete()
    }

    /// Whether a cursor at `pos` sits inside this token.
    ///
    /// A cursor exactly at the token start is outside; one just past the
    /// last character is still inside. This is the boundary rule the
    /// visibility state machine keys off.
    pub fn encloses(&self, pos: usize) -> bool {
        self.start < pos && pos <= self.end()
    }

    /// The span between symmetric delimiters of `marker_width` characters.
    ///
    /// Collapses to an empty range at the midpoint when the token is too
    /// short to hold both delimiters.
    pub fn content_range(&self, marker_width: usize) -> Range<usize> {
        let start = (self.start + marker_width).min(self.end());
        let end = self.end().saturating_sub(marker_width).max(start);
        start..end
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_completeness() {
        assert!(TokenKind::Bold.is_complete());
        assert!(TokenKind::Header(3).is_complete());
        assert!(TokenKind::Plain.is_complete());
        assert!(!TokenKind::IncompleteBold.is_complete());
        assert!(!TokenKind::IncompleteHeader(2).is_complete());
        assert!(!TokenKind::IncompleteCodeBlock.is_complete());
    }

    #[test]
    fn test_encloses_excludes_start_includes_end() {
        let token = Token::new(TokenKind::Bold, 5, 7, "**abc**");
        assert!(!token.encloses(4));
        assert!(!token.encloses(5));
        assert!(token.encloses(6));
        assert!(token.encloses(12));
        assert!(!token.encloses(13));
    }

    #[test]
    fn test_content_range_strips_symmetric_markers() {
        let bold = Token::new(TokenKind::Bold, 5, 7, "**abc**");
        assert_eq!(bold.content_range(2), 7..10);

        let italic = Token::new(TokenKind::Italic, 0, 3, "*a*");
        assert_eq!(italic.content_range(1), 1..2);

        // Degenerate span: collapses instead of inverting.
        let tiny = Token::new(TokenKind::IncompleteBold, 0, 2, "**");
        assert!(tiny.content_range(2).is_empty());
    }
}
