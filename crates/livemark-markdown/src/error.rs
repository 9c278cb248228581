//! Engine error types.

use thiserror::Error;

#[derive(Debug, Error)]
/// Errors produced while constructing the formatting engine.
///
/// Tokenizer and interceptor patterns are compiled once at startup; a
/// pattern that fails to compile is a build defect, so constructors surface
/// it instead of limping along with partial recognition.
pub enum EngineError {
    #[error("invalid pattern: {0}")]
    /// A markdown recognition pattern failed to compile.
    Pattern(#[from] regex::Error),
}
