//! Source model extraction trait.
//!
//! `SourceExtractor` is the extension point for adding new languages.
//! Implement it to teach ood-lint how to turn source text into
//! [`Declaration`]s.

use crate::model::Declaration;
use miette::Diagnostic;

/// Source text that cannot be structurally decomposed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error, Diagnostic)]
#[error("line {line}:{column}: {message}")]
#[diagnostic(code(ood_lint::parse_error))]
pub struct ParseError {
    /// Line of the first offending node (1-indexed, 0 when unknown).
    pub line: usize,
    /// Column of the first offending node (1-indexed, 0 when unknown).
    pub column: usize,
    /// What went wrong.
    pub message: String,
}

impl ParseError {
    /// Creates a parse error at a known position.
    #[must_use]
    pub fn new(line: usize, column: usize, message: impl Into<String>) -> Self {
        Self {
            line,
            column,
            message: message.into(),
        }
    }

    /// Creates a parse error with no position information.
    #[must_use]
    pub fn unpositioned(message: impl Into<String>) -> Self {
        Self::new(0, 0, message)
    }
}

/// Trait for language-specific declaration extraction.
///
/// Extraction is a pure transform: no I/O, no state carried between calls.
pub trait SourceExtractor: Send + Sync {
    /// Language identifier (e.g., `"typescript"`).
    fn language_id(&self) -> &'static str;

    /// File extensions this extractor handles (e.g., `&[".ts", ".mts"]`).
    fn extensions(&self) -> &'static [&'static str];

    /// Extracts every class, constructor, method and function declaration.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] when the text has unbalanced delimiters or
    /// syntax the extractor does not understand.
    fn extract(&self, source: &str) -> Result<Vec<Declaration>, ParseError>;

    /// Whether this extractor handles the given file extension (without dot).
    fn handles_extension(&self, ext: &str) -> bool {
        self.extensions()
            .iter()
            .any(|e| e.trim_start_matches('.').eq_ignore_ascii_case(ext))
    }
}
