//! Live/shadow buffer synchronization tests
//!
//! Exercises the dual-buffer contract across mixed edit sequences: synced
//! edits keep both buffers identical, presentation-only edits diverge them,
//! and the shadow always preserves what was typed.

use livemark_core::{
    BufferChange, Color, Document, FontSpec, MutationMode, StylePatch, TextStyle,
};
use pretty_assertions::assert_eq;
use std::sync::{Arc, Mutex};

fn doc(text: &str) -> Document {
    Document::new(
        text,
        TextStyle::new(FontSpec::default(), Color::rgb(20, 20, 20)),
    )
}

/// Synced edits keep both buffers byte-identical through a whole session.
#[test]
fn test_buffers_stay_identical_under_synced_edits() {
    let mut d = doc("# Title\n\nBody text");

    d.replace(2..7, "Heading", MutationMode::Synced);
    d.replace(10..11, "New paragraph.\n", MutationMode::Synced);
    d.replace(0..1, "##", MutationMode::Synced);

    assert_eq!(d.text(), d.shadow_text());
    assert_eq!(d.text(), "## Heading\nNew paragraph.\nBody text");
}

#[test]
fn test_presentation_edit_diverges_then_shadow_recovers() {
    let mut d = doc("- alpha\n- beta");

    // Cosmetic marker swaps touch only the live buffer.
    d.replace(0..1, "\u{2022}", MutationMode::PresentationOnly);
    d.replace(8..9, "\u{2022}", MutationMode::PresentationOnly);
    assert_eq!(d.text(), "\u{2022} alpha\n\u{2022} beta");
    assert_eq!(d.shadow_text(), "- alpha\n- beta");

    // The shadow still knows the typed character at each marker position.
    assert_eq!(d.shadow_char_at(0), Some('-'));
    assert_eq!(d.shadow_char_at(8), Some('-'));

    // Restoring from the shadow brings the buffers back in line.
    let original = d.shadow_char_at(0).unwrap();
    d.replace(0..1, &original.to_string(), MutationMode::PresentationOnly);
    let original = d.shadow_char_at(8).unwrap();
    d.replace(8..9, &original.to_string(), MutationMode::PresentationOnly);
    assert_eq!(d.text(), d.shadow_text());
}

/// Synced edits after a divergence apply to both buffers at the same offsets
/// as long as the divergence was character-for-character.
#[test]
fn test_synced_edit_after_cosmetic_swap() {
    let mut d = doc("- item");
    d.replace(0..1, "\u{2022}", MutationMode::PresentationOnly);

    // User types at the end of the line.
    d.replace(6..6, "s", MutationMode::Synced);
    assert_eq!(d.text(), "\u{2022} items");
    assert_eq!(d.shadow_text(), "- items");
}

#[test]
fn test_change_stream_reports_edits_and_attribute_passes() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&events);

    let mut d = doc("hello");
    d.subscribe(move |change| sink.lock().unwrap().push(change.clone()));

    d.replace(5..5, " world", MutationMode::Synced);
    d.apply_attributes(0..5, &StylePatch::new().foreground(Color::rgb(200, 0, 0)));
    d.notify_attributes_changed(0..11);

    let events = events.lock().unwrap();
    assert_eq!(events.len(), 2);
    assert_eq!(
        events[0],
        BufferChange::TextEdited {
            range: 5..5,
            inserted: 6,
            mode: MutationMode::Synced,
        }
    );
    // Attribute rewrites are announced once per pass, not per run touched.
    assert_eq!(events[1], BufferChange::AttributesChanged { range: 0..11 });
}

#[test]
fn test_out_of_bounds_ranges_never_panic() {
    let mut d = doc("abc");

    assert_eq!(d.replace(100..200, "x", MutationMode::Synced), 1);
    assert_eq!(d.text(), "abcx");

    // Inverted-looking ranges collapse at the clamped start.
    assert_eq!(d.replace(2..1, "y", MutationMode::Synced), 1);
    assert_eq!(d.text(), "abycx");

    assert_eq!(d.slice(3..999), "cx");
    assert_eq!(d.style_at(999), None);
    d.notify_attributes_changed(50..60);
}

#[test]
fn test_version_tracks_every_replace() {
    let mut d = doc("");
    for i in 0..10 {
        d.replace(0..0, "x", MutationMode::Synced);
        assert_eq!(d.version(), i + 1);
    }
}

#[test]
fn test_unicode_offsets_are_character_based() {
    let mut d = doc("caf\u{e9} \u{2022} na\u{ef}ve");
    assert_eq!(d.len(), 12);
    assert_eq!(d.char_at(3), Some('\u{e9}'));
    assert_eq!(d.char_at(5), Some('\u{2022}'));

    let delta = d.replace(5..6, "-", MutationMode::Synced);
    assert_eq!(delta, 0);
    assert_eq!(d.text(), "caf\u{e9} - na\u{ef}ve");
}
