//! Dual-buffer document model.
//!
//! A [`Document`] holds two rope buffers: the *live* text that a view renders
//! and edits, and a *shadow* copy that only receives semantic edits. Cosmetic
//! rewrites (marker glyph swaps and the like) go to the live buffer alone, so
//! the shadow always answers "what did the user actually type" even while the
//! live text is dressed up for presentation.
//!
//! All offsets are character (Unicode scalar value) indices.

use crate::attrs::{AttributeOverlay, StyleRun};
use crate::style::{StylePatch, TextStyle};
use ropey::Rope;
use std::fmt;
use std::ops::Range;
use tracing::trace;

/// How a text replacement propagates across the two buffers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MutationMode {
    /// Apply the edit to both the live and the shadow buffer.
    Synced,
    /// Apply the edit to the live buffer only; the shadow keeps the
    /// original characters.
    PresentationOnly,
}

/// A change notification delivered to [`Document::subscribe`] callbacks.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BufferChange {
    /// Text was replaced.
    TextEdited {
        /// The replaced range, in pre-edit coordinates (already clamped).
        range: Range<usize>,
        /// Number of characters inserted in place of the range.
        inserted: usize,
        /// Which buffers received the edit.
        mode: MutationMode,
    },
    /// Style runs changed within a range; the text itself is untouched.
    AttributesChanged {
        /// The reformatted range, in current coordinates.
        range: Range<usize>,
    },
}

/// Callback invoked for every [`BufferChange`].
pub type ChangeCallback = Box<dyn FnMut(&BufferChange) + Send>;

/// Editable text document with live/shadow buffers and a style overlay.
pub struct Document {
    live: Rope,
    shadow: Rope,
    overlay: AttributeOverlay,
    callbacks: Vec<ChangeCallback>,
    version: u64,
}

impl Document {
    /// Create a document with identical live and shadow content, fully
    /// covered by `base_style`.
    pub fn new(text: &str, base_style: TextStyle) -> Self {
        let live = Rope::from_str(text);
        let len = live.len_chars();
        Self {
            shadow: live.clone(),
            live,
            overlay: AttributeOverlay::new(len, base_style),
            callbacks: Vec::new(),
            version: 0,
        }
    }

    /// Length of the live buffer in characters.
    pub fn len(&self) -> usize {
        self.live.len_chars()
    }

    /// Whether the live buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.live.len_chars() == 0
    }

    /// Monotonic edit counter, bumped once per [`Document::replace`].
    pub fn version(&self) -> u64 {
        self.version
    }

    /// The live text as an owned string.
    pub fn text(&self) -> String {
        self.live.to_string()
    }

    /// The shadow text as an owned string.
    pub fn shadow_text(&self) -> String {
        self.shadow.to_string()
    }

    /// Clamp a range to the live buffer bounds.
    pub fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let len = self.live.len_chars();
        let start = range.start.min(len);
        start..range.end.clamp(start, len)
    }

    /// Live text in `range`, clamped.
    pub fn slice(&self, range: Range<usize>) -> String {
        self.live.slice(self.clamp(range)).to_string()
    }

    /// Character at `pos` in the live buffer.
    pub fn char_at(&self, pos: usize) -> Option<char> {
        self.live.get_char(pos)
    }

    /// Character at `pos` in the shadow buffer.
    pub fn shadow_char_at(&self, pos: usize) -> Option<char> {
        self.shadow.get_char(pos)
    }

    /// Replace `range` with `text`, returning the signed length delta.
    ///
    /// The range is clamped to the buffer before the edit. In
    /// [`MutationMode::Synced`] the shadow receives the same replacement,
    /// clamped to its own bounds. Style runs are rebased either way, and
    /// subscribers get a [`BufferChange::TextEdited`].
    pub fn replace(&mut self, range: Range<usize>, text: &str, mode: MutationMode) -> isize {
        let range = self.clamp(range);
        let removed = range.len();
        let inserted = text.chars().count();

        self.live.remove(range.clone());
        self.live.insert(range.start, text);

        if mode == MutationMode::Synced {
            let shadow_len = self.shadow.len_chars();
            let start = range.start.min(shadow_len);
            let end = range.end.clamp(start, shadow_len);
            self.shadow.remove(start..end);
            self.shadow.insert(start, text);
        }

        self.overlay.edited(range.start, removed, inserted);
        self.version += 1;
        trace!(
            start = range.start,
            removed,
            inserted,
            ?mode,
            version = self.version,
            "replace"
        );

        self.notify(&BufferChange::TextEdited {
            range,
            inserted,
            mode,
        });
        inserted as isize - removed as isize
    }

    /// Overwrite the style of `range` with a single uniform style.
    pub fn set_style(&mut self, range: Range<usize>, style: TextStyle) {
        self.overlay.set(range, style);
    }

    /// Merge a partial attribute patch over `range`.
    pub fn apply_attributes(&mut self, range: Range<usize>, patch: &StylePatch) {
        self.overlay.apply(range, patch);
    }

    /// Style at `pos`, or `None` at or past the end.
    pub fn style_at(&self, pos: usize) -> Option<TextStyle> {
        self.overlay.style_at(pos)
    }

    /// Style runs overlapping `range`, clipped to it.
    pub fn runs_in(&self, range: Range<usize>) -> Vec<StyleRun> {
        self.overlay.runs_in(range)
    }

    /// All style runs, sorted by start offset.
    pub fn runs(&self) -> &[StyleRun] {
        self.overlay.runs()
    }

    /// The base style inherited by text inserted into an empty document.
    pub fn base_style(&self) -> TextStyle {
        self.overlay.base_style()
    }

    /// Replace the base style. Existing runs are untouched.
    pub fn set_base_style(&mut self, style: TextStyle) {
        self.overlay.set_base_style(style);
    }

    /// Smallest whole-line range enclosing `range` in the live buffer.
    ///
    /// The result starts at the first character of the line containing
    /// `range.start` and ends just past the newline of the line containing
    /// the last character of `range` (or at the buffer end). An empty input
    /// range yields the single line containing it.
    pub fn paragraph_range(&self, range: Range<usize>) -> Range<usize> {
        let range = self.clamp(range);
        let start_line = self.live.char_to_line(range.start);
        let end_probe = if range.end > range.start {
            range.end - 1
        } else {
            range.end
        };
        let end_line = self.live.char_to_line(end_probe);
        let start = self.live.line_to_char(start_line);
        let end = self.live.line_to_char(end_line + 1);
        start..end
    }

    /// Range of the line containing `pos`, excluding its trailing newline.
    pub fn line_content_range(&self, pos: usize) -> Range<usize> {
        let pos = pos.min(self.live.len_chars());
        let line = self.live.char_to_line(pos);
        let start = self.live.line_to_char(line);
        let mut end = self.live.line_to_char(line + 1);
        if end > start && self.live.get_char(end - 1) == Some('\n') {
            end -= 1;
        }
        start..end
    }

    /// Register a callback invoked for every subsequent [`BufferChange`].
    pub fn subscribe(&mut self, callback: impl FnMut(&BufferChange) + Send + 'static) {
        self.callbacks.push(Box::new(callback));
    }

    /// Announce that styles in `range` were rewritten.
    ///
    /// The document itself does not track which runs changed; callers batch
    /// their overlay edits and emit one notification per formatting pass.
    pub fn notify_attributes_changed(&mut self, range: Range<usize>) {
        let range = self.clamp(range);
        self.notify(&BufferChange::AttributesChanged { range });
    }

    fn notify(&mut self, change: &BufferChange) {
        for callback in &mut self.callbacks {
            callback(change);
        }
    }
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Document")
            .field("len", &self.live.len_chars())
            .field("shadow_len", &self.shadow.len_chars())
            .field("version", &self.version)
            .field("runs", &self.overlay.runs().len())
            .field("callbacks", &self.callbacks.len())
            .finish()
    }
}
