#![warn(missing_docs)]
//! Live markdown formatting engine.
//!
//! # Overview
//!
//! `livemark-markdown` turns a plain text buffer into a live-rendered
//! markdown surface: as the user types, recognized syntax is styled in
//! place, markers are concealed, and moving the cursor into a block brings
//! its raw syntax back. The crate is headless; a host view renders the
//! style runs and forwards edit, selection, and focus events.
//!
//! # Core Features
//!
//! - **Regex tokenizer**: bold, italic, headers, list items, inline and
//!   fenced code, plus dimmed half-typed markers, with fixed pass
//!   precedence and per-match overlap rejection
//! - **Cursor-aware concealment**: markers are hidden by style (transparent
//!   foreground, collapsed size), never deleted, and reappear for the block
//!   the cursor is in
//! - **List bullets**: `-`/`*`/`+` markers render as `•` while the cursor
//!   is elsewhere; the original character is recovered from a shadow buffer
//! - **Edit interception**: typing `*` auto-pairs or wraps the selection,
//!   `#` binds to line starts, Return continues or breaks out of lists,
//!   and deleting one half of a pair removes both
//!
//! # Quick Start
//!
//! ```rust
//! use livemark_markdown::MarkdownEngine;
//!
//! let mut engine = MarkdownEngine::new("**bold** text").unwrap();
//!
//! // Markers are concealed while the cursor is elsewhere.
//! assert!(engine.document().style_at(0).unwrap().is_hidden());
//!
//! // Moving the cursor into the block reveals them.
//! engine.on_focus_gained();
//! engine.on_cursor_moved(4);
//! assert!(!engine.document().style_at(0).unwrap().is_hidden());
//!
//! // Keystrokes route through the interceptor.
//! let mut engine = MarkdownEngine::new("").unwrap();
//! engine.on_focus_gained();
//! engine.apply_edit(0..0, "*");
//! assert_eq!(engine.text(), "**");
//! assert_eq!(engine.cursor(), 1);
//! ```
//!
//! # Module Description
//!
//! - [`engine`] - the formatting engine: passes, concealment, marker swaps
//! - [`tokenizer`] - regex recognition passes over a text snapshot
//! - [`token`] - the token model
//! - [`interceptor`] - keystroke rewriting rules
//! - [`stylesheet`] - visual defaults and header sizing
//! - [`error`] - startup errors

pub mod engine;
pub mod error;
pub mod interceptor;
pub mod stylesheet;
pub mod token;
pub mod tokenizer;

pub use engine::MarkdownEngine;
pub use error::EngineError;
pub use interceptor::{EditInterceptor, EditPlan, PAIR_SCAN_WINDOW, TextEdit};
pub use stylesheet::{BULLET, StyleSheet};
pub use token::{Token, TokenKind};
pub use tokenizer::Tokenizer;
