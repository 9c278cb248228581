//! Keystroke interception.
//!
//! The interceptor inspects a proposed edit before the host applies it and
//! either declines (the host proceeds normally) or answers with an
//! [`EditPlan`]: the buffer mutations to perform instead, plus where the
//! cursor lands. It never mutates anything itself; the engine routes plan
//! edits through the same mutation path host edits take.
//!
//! Rules are checked in order and the first hit wins: paired-symbol
//! deletion, `*` auto-pairing and wrapping, `#` at line starts, and list
//! continuation or break-out on Return. Everything else is declined.

use crate::error::EngineError;
use livemark_core::Document;
use regex::Regex;
use std::ops::Range;

/// How far the paired-asterisk deletion searches for a partner, in
/// characters, each direction.
pub const PAIR_SCAN_WINDOW: usize = 50;

/// One buffer mutation of an [`EditPlan`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEdit {
    /// Range to replace, in coordinates current when the plan was made.
    /// Multi-edit plans order later ranges first so earlier offsets stay
    /// valid.
    pub range: Range<usize>,
    /// Replacement text; empty for deletions.
    pub text: String,
}

/// The mutations replacing an intercepted edit, and the final cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditPlan {
    /// Mutations to apply in order.
    pub edits: Vec<TextEdit>,
    /// Cursor position after all edits, in post-edit coordinates.
    pub cursor: usize,
}

fn single(range: Range<usize>, text: impl Into<String>, cursor: usize) -> EditPlan {
    EditPlan {
        edits: vec![TextEdit {
            range,
            text: text.into(),
        }],
        cursor,
    }
}

/// Decides whether a proposed edit gets rewritten before it reaches the
/// buffer.
#[derive(Debug, Clone)]
pub struct EditInterceptor {
    list_line: Regex,
}

impl EditInterceptor {
    /// Compile the line-classification pattern.
    pub fn new() -> Result<Self, EngineError> {
        Ok(Self {
            list_line: Regex::new(r"^([-*+])\s+(.*)$")?,
        })
    }

    /// Inspect a proposed replacement of `range` by `replacement`.
    ///
    /// `None` means not handled: the caller applies the original edit.
    /// `Some(plan)` means the caller applies the plan instead and must not
    /// additionally apply the original edit. Out-of-range input is declined
    /// rather than clamped so the host's own bounds handling stays in
    /// charge.
    pub fn plan(
        &self,
        doc: &Document,
        range: Range<usize>,
        replacement: &str,
    ) -> Option<EditPlan> {
        if range.start > range.end || range.end > doc.len() {
            return None;
        }
        if replacement.is_empty() && range.len() == 1 {
            return plan_deletion(doc, range.start);
        }
        match replacement {
            "*" => plan_asterisk(doc, range),
            "#" => plan_hash(doc, range),
            "\n" => self.plan_newline(doc, range),
            _ => None,
        }
    }

    fn plan_newline(&self, doc: &Document, range: Range<usize>) -> Option<EditPlan> {
        let line = doc.line_content_range(range.start);
        let content = doc.slice(line.clone());
        let caps = self.list_line.captures(&content)?;
        let marker = caps.get(1)?.as_str();
        let body = caps.get(2).map_or("", |m| m.as_str());

        if body.trim().is_empty() {
            // Return on an empty item: drop the marker remnant instead of
            // starting another one.
            return Some(single(line.start..line.end, "", line.start));
        }
        // Continue the list with the same marker the user typed.
        Some(single(range.start..range.end, format!("\n{marker} "), range.start + 3))
    }
}

fn at_line_start(doc: &Document, pos: usize) -> bool {
    pos == 0 || doc.char_at(pos - 1) == Some('\n')
}

fn plan_deletion(doc: &Document, pos: usize) -> Option<EditPlan> {
    match doc.char_at(pos)? {
        '*' => {
            if pos > 0
                && doc.char_at(pos - 1) == Some('*')
                && doc.char_at(pos + 1) == Some('*')
            {
                // Deleting the middle of a flanked triple removes all
                // three as one mutation.
                return Some(single(pos - 1..pos + 2, "", pos - 1));
            }
            let partner = find_partner_asterisk(doc, pos)?;
            let (earlier, later) = if partner < pos {
                (partner, pos)
            } else {
                (pos, partner)
            };
            Some(EditPlan {
                edits: vec![
                    TextEdit {
                        range: later..later + 1,
                        text: String::new(),
                    },
                    TextEdit {
                        range: earlier..earlier + 1,
                        text: String::new(),
                    },
                ],
                cursor: earlier,
            })
        }
        '#' if at_line_start(doc, pos) && doc.char_at(pos + 1) == Some(' ') => {
            Some(single(pos..pos + 2, "", pos))
        }
        '-' | '+' if at_line_start(doc, pos) && doc.char_at(pos + 1) == Some(' ') => {
            Some(single(pos..pos + 2, "", pos))
        }
        _ => None,
    }
}

/// Nearest other `*` within the scan window: backward candidates win over
/// forward ones.
fn find_partner_asterisk(doc: &Document, pos: usize) -> Option<usize> {
    let low = pos.saturating_sub(PAIR_SCAN_WINDOW);
    if let Some(i) = (low..pos).rev().find(|&i| doc.char_at(i) == Some('*')) {
        return Some(i);
    }
    let high = (pos + 1 + PAIR_SCAN_WINDOW).min(doc.len());
    (pos + 1..high).find(|&i| doc.char_at(i) == Some('*'))
}

fn plan_asterisk(doc: &Document, range: Range<usize>) -> Option<EditPlan> {
    let pos = range.start;
    if pos > 0 && doc.char_at(pos - 1) == Some('*') {
        // Completing a pair: suppress the typed `*` and auto-close.
        return Some(single(pos..pos, "**", pos + 1));
    }
    if !range.is_empty() {
        let selection = doc.slice(range.clone());
        let cursor = pos + selection.chars().count() + 2;
        return Some(single(range, format!("*{selection}*"), cursor));
    }
    Some(single(pos..pos, "**", pos + 1))
}

fn plan_hash(doc: &Document, range: Range<usize>) -> Option<EditPlan> {
    let pos = range.start;
    if !at_line_start(doc, pos) {
        return None;
    }
    if !range.is_empty() {
        let selection = doc.slice(range.clone());
        let text = format!("# {selection}");
        let cursor = pos + text.chars().count();
        return Some(single(range, text, cursor));
    }
    Some(single(pos..pos, "#", pos + 1))
}

#[cfg(test)]
mod tests {
    use super::*;
    use livemark_core::{Color, FontSpec, TextStyle};
    use pretty_assertions::assert_eq;

    fn doc(text: &str) -> Document {
        Document::new(
            text,
            TextStyle::new(FontSpec::default(), Color::rgb(0, 0, 0)),
        )
    }

    fn interceptor() -> EditInterceptor {
        EditInterceptor::new().unwrap()
    }

    #[test]
    fn test_deleting_flanked_asterisk_removes_all_three() {
        let plan = interceptor().plan(&doc("a***b"), 2..3, "").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 1..4, text: String::new() }]);
        assert_eq!(plan.cursor, 1);
    }

    #[test]
    fn test_deleting_asterisk_takes_backward_partner() {
        let plan = interceptor().plan(&doc("*bold*"), 5..6, "").unwrap();
        // Later position first so the earlier offset stays valid.
        assert_eq!(
            plan.edits,
            vec![
                TextEdit { range: 5..6, text: String::new() },
                TextEdit { range: 0..1, text: String::new() },
            ]
        );
        assert_eq!(plan.cursor, 0);
    }

    #[test]
    fn test_deleting_asterisk_falls_forward_when_nothing_behind() {
        let plan = interceptor().plan(&doc("b*old*"), 1..2, "").unwrap();
        assert_eq!(
            plan.edits,
            vec![
                TextEdit { range: 5..6, text: String::new() },
                TextEdit { range: 1..2, text: String::new() },
            ]
        );
        assert_eq!(plan.cursor, 1);
    }

    #[test]
    fn test_partner_search_window_is_bounded() {
        let text = format!("*{}*", "x".repeat(60));
        assert!(interceptor().plan(&doc(&text), 0..1, "").is_none());
    }

    #[test]
    fn test_deleting_lone_asterisk_not_handled() {
        assert!(interceptor().plan(&doc("a*b"), 1..2, "").is_none());
    }

    #[test]
    fn test_deleting_hash_takes_following_space() {
        let plan = interceptor().plan(&doc("# Title"), 0..1, "").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 0..2, text: String::new() }]);
        assert_eq!(plan.cursor, 0);
    }

    #[test]
    fn test_deleting_hash_mid_line_not_handled() {
        assert!(interceptor().plan(&doc("a # b"), 2..3, "").is_none());
        // A `#` with no following space is plain deletion too.
        assert!(interceptor().plan(&doc("#Title"), 0..1, "").is_none());
    }

    #[test]
    fn test_deleting_list_marker_takes_following_space() {
        let plan = interceptor().plan(&doc("x\n- item"), 2..3, "").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 2..4, text: String::new() }]);
        assert_eq!(plan.cursor, 2);

        let plan = interceptor().plan(&doc("+ item"), 0..1, "").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 0..2, text: String::new() }]);
    }

    #[test]
    fn test_deleting_star_list_marker_uses_asterisk_rule() {
        // `*` at a line start goes through the partner search, not the
        // marker rule; with no partner in range the deletion is declined.
        assert!(interceptor().plan(&doc("* item"), 0..1, "").is_none());
    }

    #[test]
    fn test_multi_character_deletion_not_handled() {
        assert!(interceptor().plan(&doc("**ab**"), 0..4, "").is_none());
    }

    #[test]
    fn test_typing_asterisk_inserts_pair() {
        let plan = interceptor().plan(&doc(""), 0..0, "*").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 0..0, text: "**".into() }]);
        assert_eq!(plan.cursor, 1);
    }

    #[test]
    fn test_typing_asterisk_after_asterisk_autocloses() {
        // Cursor between an auto-inserted pair; the second keystroke grows
        // it into a bold pair with the cursor centered.
        let plan = interceptor().plan(&doc("**"), 1..1, "*").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 1..1, text: "**".into() }]);
        assert_eq!(plan.cursor, 2);
    }

    #[test]
    fn test_typing_asterisk_wraps_selection() {
        let plan = interceptor().plan(&doc("hello"), 0..5, "*").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 0..5, text: "*hello*".into() }]);
        assert_eq!(plan.cursor, 7);
    }

    #[test]
    fn test_typing_hash_at_line_start() {
        let plan = interceptor().plan(&doc("text"), 0..0, "#").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 0..0, text: "#".into() }]);
        assert_eq!(plan.cursor, 1);

        let plan = interceptor().plan(&doc("a\nb"), 2..2, "#").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 2..2, text: "#".into() }]);
        assert_eq!(plan.cursor, 3);
    }

    #[test]
    fn test_typing_hash_with_selection_prefixes_it() {
        let plan = interceptor().plan(&doc("Title"), 0..5, "#").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 0..5, text: "# Title".into() }]);
        assert_eq!(plan.cursor, 7);
    }

    #[test]
    fn test_typing_hash_mid_line_not_handled() {
        assert!(interceptor().plan(&doc("ab"), 1..1, "#").is_none());
    }

    #[test]
    fn test_return_continues_list_with_same_marker() {
        let plan = interceptor().plan(&doc("- item"), 6..6, "\n").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 6..6, text: "\n- ".into() }]);
        assert_eq!(plan.cursor, 9);

        let plan = interceptor().plan(&doc("+ x"), 3..3, "\n").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 3..3, text: "\n+ ".into() }]);

        let plan = interceptor().plan(&doc("* item"), 6..6, "\n").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 6..6, text: "\n* ".into() }]);
    }

    #[test]
    fn test_return_on_empty_item_deletes_remnant() {
        let plan = interceptor().plan(&doc("- item\n- "), 9..9, "\n").unwrap();
        assert_eq!(plan.edits, vec![TextEdit { range: 7..9, text: String::new() }]);
        assert_eq!(plan.cursor, 7);
    }

    #[test]
    fn test_return_on_plain_line_not_handled() {
        assert!(interceptor().plan(&doc("plain text"), 10..10, "\n").is_none());
        // A marker with no following space is not a list item.
        assert!(interceptor().plan(&doc("-item"), 5..5, "\n").is_none());
    }

    #[test]
    fn test_out_of_range_probes_are_declined() {
        let d = doc("abc");
        assert!(interceptor().plan(&d, 10..11, "").is_none());
        assert!(interceptor().plan(&d, 0..10, "*").is_none());
        assert!(interceptor().plan(&d, 2..1, "\n").is_none());
    }

    #[test]
    fn test_unhandled_replacement_text() {
        assert!(interceptor().plan(&doc("abc"), 1..1, "x").is_none());
        assert!(interceptor().plan(&doc("abc"), 1..1, "**").is_none());
    }
}
