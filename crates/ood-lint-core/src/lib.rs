//! # ood-lint-core
//!
//! Core framework for checking object-oriented design conventions.
//!
//! This crate provides the language-agnostic half of the linter:
//!
//! - [`Declaration`] and friends, the structural model extractors produce
//! - [`SourceExtractor`] for plugging in a language front end
//! - [`Rule`] and [`RuleRegistry`] for the closed set of convention checks
//! - [`evaluate`] for applying rules to one declaration
//! - [`Analyzer`] for orchestrating file discovery and parallel checking
//! - [`report`] for rendering violations
//!
//! ## Example
//!
//! ```ignore
//! use ood_lint_core::{Analyzer, RuleRegistry};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .extractor(TypeScriptExtractor::new())
//!     .registry(registry)
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! print!("{}", ood_lint_core::report::format_result(&result));
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod allowance;
mod analyzer;
mod config;
mod evaluator;
mod extractor;
mod model;
mod rule;
mod types;

pub mod report;

pub use allowance::{check_allow_with_reason, AllowCheck};
pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{
    AnalyzerConfig, CheckSettings, Config, ConfigError, ConventionsConfig,
    DEFAULT_SERVICE_TYPE_PATTERN, DEFAULT_SYSTEM_BOUNDARY_PATTERN,
};
pub use evaluator::{evaluate, evaluate_all};
pub use extractor::{ParseError, SourceExtractor};
pub use model::{
    base_name, Accessor, BodySummary, CallSite, CallSiteKind, DeclKind, Declaration, FieldInfo,
    Owner, Parameter, TypeRef, NULL_MARKERS,
};
pub use rule::{Predicate, Rule, RuleRegistry};
pub use types::{LintResult, Location, ParseFailure, Severity, Suggestion, Violation};
