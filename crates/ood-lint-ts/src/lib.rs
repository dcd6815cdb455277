//! # ood-lint-ts
//!
//! Tree-sitter based TypeScript front end for ood-lint.
//!
//! [`TypeScriptExtractor`] implements [`ood_lint_core::SourceExtractor`]: it
//! parses one file and decomposes it into classes, interfaces,
//! constructors, methods and functions with their parameters, return types
//! and a lexical summary of each body. Files with syntax errors are
//! rejected with a positioned [`ood_lint_core::ParseError`].

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod body;
mod syntax;
pub mod typescript;

pub use typescript::TypeScriptExtractor;
