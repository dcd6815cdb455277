//! # ood-lint-rules
//!
//! Built-in object-oriented design convention rules for ood-lint.
//!
//! Every rule is a plain [`Rule`] record with a pure predicate over one
//! [`ood_lint_core::Declaration`].
//!
//! ## Available Rules
//!
//! | Code | Name | Default severity |
//! |------|------|------------------|
//! | OOD001 | `no-optional-constructor-dependency` | error |
//! | OOD002 | `no-setter-dependency-injection` | error |
//! | OOD003 | `no-direct-system-call-in-method-body` | error |
//! | OOD004 | `return-type-must-be-single-shape` | warning |
//! | OOD005 | `constructor-must-be-side-effect-free` | warning |
//!
//! ## Usage
//!
//! ```ignore
//! use ood_lint_core::{Analyzer, Config};
//!
//! let config = Config::default();
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .registry(ood_lint_rules::registry(&config)?)
//!     .config(config)
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod no_direct_system_call;
pub mod no_optional_constructor_dependency;
pub mod no_setter_dependency_injection;
pub mod side_effect_free_constructor;
pub mod single_shape_return;

mod presets;

pub use presets::{all_rules, registry, Preset};

/// Re-export core types for convenience.
pub use ood_lint_core::{Rule, RuleRegistry, Severity, Violation};
