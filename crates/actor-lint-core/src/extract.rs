//! Interface to the syntax-extraction service.
//!
//! Turning file content into a structural tree and token map is an
//! external concern; the pipeline only depends on this trait. The
//! reference implementation lives in the `actor-lint-syntax` crate.

use thiserror::Error;

use crate::syntax::{SyntaxTree, TokenMap};

/// Failures the extraction service may report for one file. All of
/// them are local to that file; the pipeline logs and drops the file.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// Opening and closing braces do not balance.
    #[error("unbalanced braces at byte offset {offset}")]
    UnbalancedBraces {
        /// Offset of the unmatched brace, or of end-of-file when an
        /// opening brace is never closed.
        offset: usize,
    },

    /// A string literal is never terminated.
    #[error("unterminated string literal at byte offset {offset}")]
    UnterminatedString {
        /// Offset of the opening quote.
        offset: usize,
    },

    /// A block comment is never terminated.
    #[error("unterminated block comment at byte offset {offset}")]
    UnterminatedComment {
        /// Offset of the comment opener.
        offset: usize,
    },
}

/// The syntax-extraction service: file content in, structural tree and
/// token classification map out.
pub trait SyntaxExtractor: Send + Sync {
    /// Extracts the structural tree and token map for `content`.
    ///
    /// # Errors
    ///
    /// Returns an [`ExtractError`] when the content cannot be turned
    /// into a tree; the caller drops the file and continues.
    fn extract(&self, content: &str) -> Result<(SyntaxTree, TokenMap), ExtractError>;
}
