//! Typing session example
//!
//! Drives the engine the way a host text view would: keystrokes through
//! `apply_edit`, cursor and focus events, and after each step a dump of the
//! style runs a renderer would draw.

use livemark_core::{FontFamily, FontSlant, FontWeight, TextStyle};
use livemark_markdown::MarkdownEngine;

fn describe(style: &TextStyle) -> String {
    if style.is_hidden() {
        return "hidden".into();
    }
    let mut parts = vec![format!("{}pt", style.font.size)];
    if style.font.weight == FontWeight::Bold {
        parts.push("bold".into());
    }
    if style.font.slant == FontSlant::Italic {
        parts.push("italic".into());
    }
    if style.font.family == FontFamily::Monospace {
        parts.push("mono".into());
    }
    if style.background.is_some() {
        parts.push("code background".into());
    }
    parts.join(" ")
}

fn show(engine: &MarkdownEngine, label: &str) {
    println!("{label}");
    println!("  live:   {:?}", engine.text());
    println!("  shadow: {:?}", engine.shadow_text());
    println!("  cursor: {}", engine.cursor());
    for run in engine.document().runs() {
        println!(
            "  {:>3}..{:<3} {:?} {}",
            run.range.start,
            run.range.end,
            engine.document().slice(run.range.clone()),
            describe(&run.style)
        );
    }
    println!();
}

fn type_chars(engine: &mut MarkdownEngine, chars: &[&str]) {
    for ch in chars {
        let at = engine.cursor();
        engine.apply_edit(at..at, ch);
    }
}

fn main() {
    let mut engine = MarkdownEngine::new("").unwrap();
    engine.on_focus_gained();

    println!("=== Live markdown typing session ===\n");

    // 1. A header, character by character.
    type_chars(&mut engine, &["#", " ", "N", "o", "t", "e", "s"]);
    show(&engine, "1. typed '# Notes'; cursor in the block keeps the prefix visible:");

    engine.on_cursor_moved(0);
    show(&engine, "   cursor moved away; the prefix conceals, content stays large:");

    // 2. Bold through the auto-pairing interceptor.
    let end = engine.text().chars().count();
    engine.apply_edit(end..end, "\n");
    let at = engine.cursor();
    engine.apply_edit(at..at, "*");
    println!(
        "2. typed '*' once: live {:?}, cursor {} sits in the auto-closed pair\n",
        engine.text(),
        engine.cursor()
    );
    type_chars(&mut engine, &["*", "b", "o", "l", "d"]);
    show(&engine, "   second '*' grew the pair, then 'bold' filled it in:");

    // End key, then Return: position len is still within the pair, so the
    // markers only conceal once the newline moves the cursor past it.
    engine.on_cursor_moved(engine.text().chars().count());
    let at = engine.cursor();
    engine.apply_edit(at..at, "\n");
    show(&engine, "   Return on a fresh line; the pair the cursor left conceals:");

    // 3. A list: Return continues it, Return on an empty item exits.
    type_chars(&mut engine, &["-", " ", "o", "n", "e"]);
    let at = engine.cursor();
    engine.apply_edit(at..at, "\n");
    type_chars(&mut engine, &["t", "w", "o"]);
    show(&engine, "3. Return continued the list; the item the cursor left is bulleted:");

    let at = engine.cursor();
    engine.apply_edit(at..at, "\n");
    let at = engine.cursor();
    engine.apply_edit(at..at, "\n");
    show(&engine, "   Return twice more: the empty item is removed, the list exits:");

    println!("substituted markers: {:?}", engine.substituted_markers());
    println!("the shadow buffer still holds every character as typed.");
}
