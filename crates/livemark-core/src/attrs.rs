//! Style-run overlay.
//!
//! The overlay partitions the document into maximal runs of identical
//! [`TextStyle`], kept sorted by start offset. Unlike a sparse interval set,
//! every position in `[0, len)` is covered by exactly one run; `set`/`apply`
//! split and re-merge runs at the edit boundaries, and
//! [`AttributeOverlay::edited`] rebases offsets across text edits.
//!
//! All offsets are Unicode scalar values.

use crate::style::{StylePatch, TextStyle};
use std::ops::Range;

/// A maximal run of identically styled text.
#[derive(Debug, Clone, PartialEq)]
pub struct StyleRun {
    /// Character range covered by this run.
    pub range: Range<usize>,
    /// Style applied over the whole range.
    pub style: TextStyle,
}

/// Covering style overlay: a sorted run vector partitioning `[0, len)`.
#[derive(Debug, Clone)]
pub struct AttributeOverlay {
    /// Runs sorted by start; contiguous, jointly covering `[0, len)`.
    runs: Vec<StyleRun>,
    len: usize,
    /// Style inherited by text inserted into an empty overlay.
    base: TextStyle,
}

impl AttributeOverlay {
    /// Create an overlay covering `len` characters with a single base run.
    pub fn new(len: usize, base: TextStyle) -> Self {
        let mut runs = Vec::new();
        if len > 0 {
            runs.push(StyleRun {
                range: 0..len,
                style: base,
            });
        }
        Self { runs, len, base }
    }

    /// Number of characters covered.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the overlay covers no text.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The base style used for insertions into an empty overlay.
    pub fn base_style(&self) -> TextStyle {
        self.base
    }

    /// Replace the base style. Existing runs are untouched.
    pub fn set_base_style(&mut self, style: TextStyle) {
        self.base = style;
    }

    /// All runs, sorted by start offset.
    pub fn runs(&self) -> &[StyleRun] {
        &self.runs
    }

    fn clamp(&self, range: Range<usize>) -> Range<usize> {
        let start = range.start.min(self.len);
        start..range.end.clamp(start, self.len)
    }

    /// Index of the run containing `pos`, located by binary search.
    fn run_index_at(&self, pos: usize) -> Option<usize> {
        let idx = self.runs.partition_point(|r| r.range.start <= pos);
        (idx > 0 && pos < self.runs[idx - 1].range.end).then(|| idx - 1)
    }

    /// Ensure a run boundary exists at `pos`.
    fn split_at(&mut self, pos: usize) {
        if pos == 0 || pos >= self.len {
            return;
        }
        if let Some(idx) = self.run_index_at(pos) {
            if self.runs[idx].range.start == pos {
                return;
            }
            let tail = StyleRun {
                range: pos..self.runs[idx].range.end,
                style: self.runs[idx].style,
            };
            self.runs[idx].range.end = pos;
            self.runs.insert(idx + 1, tail);
        }
    }

    /// Merge adjacent runs whose styles compare equal.
    fn coalesce(&mut self) {
        self.runs.dedup_by(|later, earlier| {
            if earlier.style == later.style && earlier.range.end == later.range.start {
                earlier.range.end = later.range.end;
                true
            } else {
                false
            }
        });
    }

    /// Overwrite `range` with a single uniform style.
    pub fn set(&mut self, range: Range<usize>, style: TextStyle) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        self.split_at(range.start);
        self.split_at(range.end);
        let first = self.runs.partition_point(|r| r.range.start < range.start);
        let after = self.runs.partition_point(|r| r.range.start < range.end);
        self.runs.splice(first..after, [StyleRun { range, style }]);
        self.coalesce();
    }

    /// Merge a partial attribute patch over `range`.
    pub fn apply(&mut self, range: Range<usize>, patch: &StylePatch) {
        let range = self.clamp(range);
        if range.is_empty() {
            return;
        }
        self.split_at(range.start);
        self.split_at(range.end);
        let first = self.runs.partition_point(|r| r.range.start < range.start);
        let after = self.runs.partition_point(|r| r.range.start < range.end);
        for run in &mut self.runs[first..after] {
            patch.apply_to(&mut run.style);
        }
        self.coalesce();
    }

    /// Style at `pos`, or `None` at or past the end.
    pub fn style_at(&self, pos: usize) -> Option<TextStyle> {
        self.run_index_at(pos).map(|idx| self.runs[idx].style)
    }

    /// Runs overlapping `range`, clipped to it.
    pub fn runs_in(&self, range: Range<usize>) -> Vec<StyleRun> {
        let range = self.clamp(range);
        if range.is_empty() {
            return Vec::new();
        }
        let mut idx = self.runs.partition_point(|r| r.range.end <= range.start);
        let mut out = Vec::new();
        while idx < self.runs.len() && self.runs[idx].range.start < range.end {
            let run = &self.runs[idx];
            out.push(StyleRun {
                range: run.range.start.max(range.start)..run.range.end.min(range.end),
                style: run.style,
            });
            idx += 1;
        }
        out
    }

    /// Rebase run offsets across a text edit that replaced `removed`
    /// characters at `start` with `inserted` characters.
    ///
    /// Inserted text inherits the style of the character before it; at offset
    /// zero the first run absorbs the insertion instead. Insertions into an
    /// empty overlay take the base style.
    pub fn edited(&mut self, start: usize, removed: usize, inserted: usize) {
        let start = start.min(self.len);
        let removed = removed.min(self.len - start);
        if removed > 0 {
            let end = start + removed;
            self.runs.retain_mut(|run| {
                if run.range.end <= start {
                    true
                } else if run.range.start >= end {
                    run.range.start -= removed;
                    run.range.end -= removed;
                    true
                } else if run.range.start >= start && run.range.end <= end {
                    false
                } else if run.range.start < start && run.range.end > end {
                    run.range.end -= removed;
                    true
                } else if run.range.start < start {
                    run.range.end = start;
                    true
                } else {
                    run.range.start = start;
                    run.range.end -= removed;
                    true
                }
            });
            self.len -= removed;
        }
        if inserted > 0 {
            if self.len == 0 {
                self.runs.push(StyleRun {
                    range: 0..inserted,
                    style: self.base,
                });
            } else {
                let pos = start.min(self.len);
                let idx = if pos == 0 {
                    Some(0)
                } else {
                    self.run_index_at(pos - 1)
                };
                if let Some(idx) = idx {
                    self.runs[idx].range.end += inserted;
                    for run in &mut self.runs[idx + 1..] {
                        run.range.start += inserted;
                        run.range.end += inserted;
                    }
                }
            }
            self.len += inserted;
        }
        self.coalesce();
    }
}
