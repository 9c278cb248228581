#![warn(missing_docs)]
//! Headless document model for live-formatted text.
//!
//! # Overview
//!
//! `livemark-core` provides the storage layer for editors that restyle text
//! as it is typed: a [`Document`] with two rope buffers (the *live* text a
//! view renders and a *shadow* copy of what the user actually typed), plus a
//! covering [`AttributeOverlay`] of style runs. It knows nothing about any
//! particular markup language; a formatting layer decides which ranges get
//! which styles and in which buffer a replacement lands.
//!
//! # Core Features
//!
//! - **Dual buffers**: semantic edits hit both buffers, cosmetic rewrites
//!   only the live one, so the original characters are always recoverable
//! - **Covering style runs**: every position carries exactly one
//!   [`TextStyle`]; edits rebase run offsets automatically
//! - **Change notifications**: subscribers observe text edits and attribute
//!   rewrites as [`BufferChange`] values
//!
//! # Quick Start
//!
//! ```rust
//! use livemark_core::{Color, Document, FontSpec, MutationMode, StylePatch, TextStyle};
//!
//! let base = TextStyle::new(FontSpec::default(), Color::rgb(20, 20, 20));
//! let mut doc = Document::new("hello world", base);
//!
//! // A semantic edit updates both buffers.
//! doc.replace(0..5, "goodbye", MutationMode::Synced);
//! assert_eq!(doc.text(), doc.shadow_text());
//!
//! // A cosmetic rewrite leaves the shadow alone.
//! doc.replace(0..7, "*", MutationMode::PresentationOnly);
//! assert_eq!(doc.text(), "* world");
//! assert_eq!(doc.shadow_text(), "goodbye world");
//!
//! // Styles are patched per range and queried per position.
//! doc.apply_attributes(0..1, &StylePatch::new().foreground(Color::TRANSPARENT));
//! assert!(doc.style_at(0).unwrap().foreground.is_transparent());
//! ```
//!
//! # Module Description
//!
//! - [`buffer`] - dual-buffer [`Document`] and change notifications
//! - [`attrs`] - covering style-run overlay
//! - [`style`] - font, color, and attribute-patch types

pub mod attrs;
pub mod buffer;
pub mod style;

pub use attrs::{AttributeOverlay, StyleRun};
pub use buffer::{BufferChange, ChangeCallback, Document, MutationMode};
pub use style::{
    Color, DEFAULT_FONT_SIZE, FontFamily, FontSlant, FontSpec, FontWeight, HIDDEN_FONT_SIZE,
    StylePatch, TextStyle,
};
