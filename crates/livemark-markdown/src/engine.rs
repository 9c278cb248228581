//! The live formatting engine.
//!
//! [`MarkdownEngine`] owns the document, the cursor, and the focus flag,
//! and keeps the style overlay in sync with the text through two kinds of
//! passes:
//!
//! - a text edit reformats only the paragraph containing the edit;
//! - a cursor move or focus change reformats the whole document, because
//!   any block the cursor left needs its markers hidden again and the block
//!   it entered needs them revealed.
//!
//! Each pass resets the range to the base style, tokenizes it, then styles
//! token content and conceals markers. Concealing never deletes characters:
//! hidden markers keep their offsets and get a transparent foreground plus
//! a collapsed font size. List markers are the one exception to "text never
//! changes during formatting": the marker character is swapped for a bullet
//! glyph (and back) in the live buffer only, under a re-entrancy guard so
//! the swap's own change notification cannot restart formatting.

use crate::error::EngineError;
use crate::interceptor::EditInterceptor;
use crate::stylesheet::{BULLET, StyleSheet};
use crate::token::{Token, TokenKind};
use crate::tokenizer::Tokenizer;
use livemark_core::{
    BufferChange, Color, Document, FontFamily, FontSlant, FontSpec, FontWeight, HIDDEN_FONT_SIZE,
    MutationMode, StylePatch,
};
use std::cell::Cell;
use std::collections::HashMap;
use std::ops::Range;
use tracing::debug;

/// Holds the re-entrancy flag for one marker swap, releasing it on every
/// exit path.
struct ReplaceScope<'a> {
    flag: &'a Cell<bool>,
}

impl<'a> ReplaceScope<'a> {
    fn enter(flag: &'a Cell<bool>) -> Option<Self> {
        if flag.get() {
            return None;
        }
        flag.set(true);
        Some(Self { flag })
    }
}

impl Drop for ReplaceScope<'_> {
    fn drop(&mut self) {
        self.flag.set(false);
    }
}

/// Markdown-aware formatting engine over a [`Document`].
///
/// The host forwards its edit, selection, and focus events; the engine
/// intercepts or applies edits, restyles the affected text, and exposes the
/// resulting style runs back to the host for rendering.
#[derive(Debug)]
pub struct MarkdownEngine {
    doc: Document,
    tokenizer: Tokenizer,
    interceptor: EditInterceptor,
    styles: StyleSheet,
    /// Current cursor offset, clamped to `[0, len]`.
    cursor: usize,
    /// Whether the host view has focus; without it no block counts as
    /// cursor-entered and everything renders concealed.
    focused: bool,
    /// Re-entrancy guard for marker swaps.
    replacing: Cell<bool>,
    /// Original marker characters recorded at substitution time, keyed by
    /// marker offset. Restoration reads the shadow buffer instead, which
    /// stays correct across undo; this table is introspection only.
    substituted: HashMap<usize, char>,
}

impl MarkdownEngine {
    /// Build an engine over `text` with the default style sheet and run the
    /// initial formatting pass.
    pub fn new(text: &str) -> Result<Self, EngineError> {
        Self::with_styles(text, StyleSheet::default())
    }

    /// Build an engine with a caller-provided style sheet.
    ///
    /// Fails only if a recognition pattern does not compile, which makes
    /// the engine unusable and is surfaced instead of tolerated.
    pub fn with_styles(text: &str, styles: StyleSheet) -> Result<Self, EngineError> {
        let mut engine = Self {
            doc: Document::new(text, styles.base_style()),
            tokenizer: Tokenizer::new()?,
            interceptor: EditInterceptor::new()?,
            styles,
            cursor: 0,
            focused: false,
            replacing: Cell::new(false),
            substituted: HashMap::new(),
        };
        engine.format_document();
        Ok(engine)
    }

    /// Offer a proposed edit to the interceptor.
    ///
    /// Returns `true` when the edit was handled: the engine has performed
    /// the replacement mutations and moved the cursor, and the host must
    /// not apply the original edit on top.
    pub fn on_proposed_edit(&mut self, range: Range<usize>, replacement: &str) -> bool {
        let Some(plan) = self.interceptor.plan(&self.doc, range, replacement) else {
            return false;
        };
        for edit in &plan.edits {
            self.mutate_text(edit.range.clone(), &edit.text);
        }
        self.on_cursor_moved(plan.cursor);
        true
    }

    /// Drive one host edit end to end: offer it for interception, and if
    /// declined apply it directly with the cursor placed after the inserted
    /// text. Returns whether the edit was intercepted.
    pub fn apply_edit(&mut self, range: Range<usize>, replacement: &str) -> bool {
        if self.on_proposed_edit(range.clone(), replacement) {
            return true;
        }
        let start = range.start.min(self.doc.len());
        self.mutate_text(range, replacement);
        self.on_cursor_moved(start + replacement.chars().count());
        false
    }

    /// Replace `range` with `text` in both buffers and reformat the edited
    /// paragraph. Returns the signed length delta.
    ///
    /// This is the single mutation primitive: host edits and interceptor
    /// plan edits both land here.
    pub fn mutate_text(&mut self, range: Range<usize>, text: &str) -> isize {
        let range = self.doc.clamp(range);
        let start = range.start;
        let delta = self.doc.replace(range, text, MutationMode::Synced);
        self.cursor = self.cursor.min(self.doc.len());
        self.text_did_change(start..start + text.chars().count());
        delta
    }

    /// React to an already-applied text edit by reformatting the paragraph
    /// containing `edited`.
    ///
    /// No-op while a marker swap is in flight: the swap's own mutation must
    /// not restart formatting.
    pub fn text_did_change(&mut self, edited: Range<usize>) {
        if self.replacing.get() {
            return;
        }
        let paragraph = self.doc.paragraph_range(edited);
        self.format_range(paragraph);
    }

    /// Record a cursor or selection change and reformat the whole document.
    ///
    /// The full pass is deliberate: leaving a block must re-conceal its
    /// markers, and only a document-wide pass sees every block the cursor
    /// is no longer in.
    pub fn on_cursor_moved(&mut self, pos: usize) {
        self.cursor = pos.min(self.doc.len());
        self.format_document();
    }

    /// The host view gained focus; cursor-entered blocks reveal markers.
    pub fn on_focus_gained(&mut self) {
        self.focused = true;
        self.format_document();
    }

    /// The host view lost focus; every block renders concealed.
    pub fn on_focus_lost(&mut self) {
        self.focused = false;
        self.format_document();
    }

    /// Update the baseline font and color. Takes effect on the next
    /// formatting pass.
    pub fn set_default_style(&mut self, font: FontSpec, color: Color) {
        self.styles.base_font = font;
        self.styles.text_color = color;
        self.doc.set_base_style(self.styles.base_style());
    }

    /// Reformat the entire document.
    pub fn format_document(&mut self) {
        self.format_range(0..self.doc.len());
    }

    /// Reset `range` to the base style, retokenize it, and restyle its
    /// tokens. Announces one attribute change for the whole range.
    fn format_range(&mut self, range: Range<usize>) {
        let range = self.doc.clamp(range);
        self.doc.set_style(range.clone(), self.styles.base_style());

        let text = self.doc.text();
        let tokens = self.tokenizer.tokenize_range(&text, range.clone());
        debug!(
            start = range.start,
            end = range.end,
            tokens = tokens.len(),
            cursor = self.cursor,
            "format pass"
        );
        for token in &tokens {
            self.apply_token(token);
        }
        self.doc.notify_attributes_changed(range);
    }

    fn apply_token(&mut self, token: &Token) {
        let inside = self.focused && token.encloses(self.cursor);
        match token.kind {
            TokenKind::Bold => {
                self.doc.apply_attributes(
                    token.content_range(2),
                    &StylePatch::new().weight(FontWeight::Bold),
                );
                if !inside {
                    self.conceal(token.start..token.start + 2);
                    self.conceal(token.end() - 2..token.end());
                }
            }
            TokenKind::Italic => {
                self.doc.apply_attributes(
                    token.content_range(1),
                    &StylePatch::new().slant(FontSlant::Italic),
                );
                if !inside {
                    self.conceal(token.start..token.start + 1);
                    self.conceal(token.end() - 1..token.end());
                }
            }
            TokenKind::Header(level) => {
                // Marker prefix is the hashes plus the separating space.
                let marker = usize::from(level) + 1;
                let content_start = (token.start + marker).min(token.end());
                self.doc.apply_attributes(
                    content_start..token.end(),
                    &StylePatch::new()
                        .weight(FontWeight::Bold)
                        .size(self.styles.header_size(level)),
                );
                if !inside {
                    self.conceal(token.start..content_start);
                }
            }
            TokenKind::List => self.sync_list_marker(token, inside),
            TokenKind::InlineCode => self.style_code(token, inside, 1),
            TokenKind::CodeBlock => self.style_code(token, inside, 3),
            TokenKind::Plain => {}
            TokenKind::IncompleteBold
            | TokenKind::IncompleteItalic
            | TokenKind::IncompleteHeader(_)
            | TokenKind::IncompleteList
            | TokenKind::IncompleteInlineCode
            | TokenKind::IncompleteCodeBlock => {
                // Dimmed, never concealed: half-typed syntax stays visible.
                self.doc.apply_attributes(
                    token.range(),
                    &StylePatch::new().foreground(self.styles.incomplete_foreground),
                );
            }
        }
    }

    fn style_code(&mut self, token: &Token, inside: bool, marker_width: usize) {
        self.doc.apply_attributes(
            token.content_range(marker_width),
            &StylePatch::new()
                .family(FontFamily::Monospace)
                .foreground(self.styles.code_foreground)
                .background(self.styles.code_background),
        );
        if !inside {
            self.conceal(token.start..token.start + marker_width);
            self.conceal(token.end() - marker_width..token.end());
        }
    }

    /// Hide the characters in `range` without removing them: transparent
    /// foreground and a collapsed font size keep offsets and navigation
    /// intact.
    fn conceal(&mut self, range: Range<usize>) {
        self.doc.apply_attributes(
            range,
            &StylePatch::new()
                .foreground(Color::TRANSPARENT)
                .size(HIDDEN_FONT_SIZE),
        );
    }

    /// Drive the marker of a list token toward the state the cursor calls
    /// for: bullet glyph while the cursor is elsewhere, the original
    /// character while the cursor is in the block.
    fn sync_list_marker(&mut self, token: &Token, inside: bool) {
        let pos = token.start;
        let current = self.doc.char_at(pos);
        if !inside {
            if current == Some(BULLET) {
                return;
            }
            let Some(original) = current else { return };
            if self.swap_marker(pos, BULLET) {
                self.substituted.insert(pos, original);
                debug!(pos, %original, "list marker bulleted");
            }
        } else {
            if current != Some(BULLET) {
                return;
            }
            // The shadow buffer, not the table: it survives undo.
            let Some(original) = self.doc.shadow_char_at(pos) else {
                return;
            };
            if self.swap_marker(pos, original) {
                self.substituted.remove(&pos);
                debug!(pos, %original, "list marker restored");
            }
        }
    }

    /// Swap the single character at `pos` for `glyph` in the live buffer
    /// only, under the re-entrancy guard. Marker and following space are
    /// re-asserted to the base style. Returns whether the swap ran.
    fn swap_marker(&mut self, pos: usize, glyph: char) -> bool {
        let Some(_scope) = ReplaceScope::enter(&self.replacing) else {
            return false;
        };
        let delta = self
            .doc
            .replace(pos..pos + 1, &glyph.to_string(), MutationMode::PresentationOnly);
        let span = pos..(pos + 2).min(self.doc.len());
        self.doc.set_style(span, self.styles.base_style());
        // A one-for-one swap leaves the cursor alone; keep the bookkeeping
        // correct should the glyph ever grow wider.
        if delta != 0 && self.cursor >= pos {
            self.cursor = self
                .cursor
                .saturating_add_signed(delta)
                .min(self.doc.len());
        }
        true
    }

    /// The live text as an owned string.
    pub fn text(&self) -> String {
        self.doc.text()
    }

    /// The shadow text: what the user actually typed.
    pub fn shadow_text(&self) -> String {
        self.doc.shadow_text()
    }

    /// Current cursor offset.
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Whether the host view has focus.
    pub fn is_focused(&self) -> bool {
        self.focused
    }

    /// The underlying document, for style and text queries.
    pub fn document(&self) -> &Document {
        &self.doc
    }

    /// The style sheet in effect.
    pub fn styles(&self) -> &StyleSheet {
        &self.styles
    }

    /// Offsets and original characters of currently substituted markers,
    /// sorted by offset.
    pub fn substituted_markers(&self) -> Vec<(usize, char)> {
        let mut markers: Vec<_> = self.substituted.iter().map(|(&p, &c)| (p, c)).collect();
        markers.sort_unstable_by_key(|&(p, _)| p);
        markers
    }

    /// Tokenize the current live text and return the tokens.
    pub fn tokens(&self) -> Vec<Token> {
        self.tokenizer.tokenize(&self.doc.text())
    }

    /// Register a callback observing every buffer change.
    pub fn subscribe(&mut self, callback: impl FnMut(&BufferChange) + Send + 'static) {
        self.doc.subscribe(callback);
    }
}
