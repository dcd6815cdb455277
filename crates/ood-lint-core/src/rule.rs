//! Rule records and the rule registry.
//!
//! The rule set is closed and rarely changes, so a rule is a plain record
//! holding its metadata and a pure predicate function rather than a trait
//! object.

use crate::config::{CheckSettings, ConfigError};
use crate::model::Declaration;
use crate::types::{Location, Severity, Suggestion, Violation};
use std::collections::BTreeMap;
use std::path::Path;

/// A rule predicate: `None` when the declaration passes, otherwise the
/// failure message.
///
/// Predicates must not panic and must treat anything ambiguous as a pass.
pub type Predicate = fn(&Declaration, &CheckSettings) -> Option<String>;

/// A lint rule.
#[derive(Clone, Copy)]
pub struct Rule {
    /// Kebab-case id (e.g., "no-setter-dependency-injection").
    pub id: &'static str,
    /// Rule code (e.g., "OOD002").
    pub code: &'static str,
    /// Brief description of what the rule checks.
    pub description: &'static str,
    /// Severity for violations of this rule.
    pub severity: Severity,
    /// How to fix a violation.
    pub help: &'static str,
    /// The check itself.
    pub predicate: Predicate,
}

impl std::fmt::Debug for Rule {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("code", &self.code)
            .field("severity", &self.severity)
            .finish_non_exhaustive()
    }
}

impl Rule {
    /// Whether `key` names this rule by id or code.
    #[must_use]
    pub fn answers_to(&self, key: &str) -> bool {
        self.id == key || self.code.eq_ignore_ascii_case(key)
    }

    /// Whether an allow directive for this rule must carry a reason.
    #[must_use]
    pub fn requires_allow_reason(&self) -> bool {
        self.severity == Severity::Error
    }

    /// Applies the predicate and builds a violation on failure.
    #[must_use]
    pub fn check(
        &self,
        file: &Path,
        decl: &Declaration,
        settings: &CheckSettings,
    ) -> Option<Violation> {
        let message = (self.predicate)(decl, settings)?;
        let mut violation = Violation::new(
            self.code,
            self.id,
            self.severity,
            decl.qualified_name(),
            Location::new(file, decl.line, decl.column),
            message,
        );
        if !self.help.is_empty() {
            violation = violation.with_suggestion(Suggestion::new(self.help));
        }
        Some(violation)
    }
}

/// The ordered, immutable set of enabled rules.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: Vec<Rule>,
}

impl RuleRegistry {
    /// Creates a registry holding exactly `rules`, in order.
    #[must_use]
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Selects the rules named by `keys` (ids or codes) from `catalog`.
    ///
    /// Catalog order is kept regardless of the order of `keys`; duplicates
    /// collapse.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRule`] for a key no catalog rule answers to.
    pub fn select<S: AsRef<str>>(catalog: &[Rule], keys: &[S]) -> Result<Self, ConfigError> {
        for key in keys {
            let key = key.as_ref();
            if !catalog.iter().any(|r| r.answers_to(key)) {
                return Err(ConfigError::UnknownRule { id: key.to_string() });
            }
        }

        let rules = catalog
            .iter()
            .filter(|r| keys.iter().any(|k| r.answers_to(k.as_ref())))
            .copied()
            .collect();
        Ok(Self { rules })
    }

    /// Applies per-rule severity overrides keyed by id or code.
    ///
    /// Overrides for catalog rules that are not enabled are accepted and
    /// ignored; keys that name no rule at all are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::UnknownRule`] for a key no catalog rule answers to.
    pub fn with_severity_overrides(
        mut self,
        catalog: &[Rule],
        overrides: &BTreeMap<String, Severity>,
    ) -> Result<Self, ConfigError> {
        for (key, severity) in overrides {
            if !catalog.iter().any(|r| r.answers_to(key)) {
                return Err(ConfigError::UnknownRule { id: key.clone() });
            }
            for rule in self.rules.iter_mut().filter(|r| r.answers_to(key)) {
                rule.severity = *severity;
            }
        }
        Ok(self)
    }

    /// All enabled rules, in evaluation order.
    #[must_use]
    pub fn all_rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Looks up an enabled rule by id or code.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.answers_to(key))
    }

    /// Number of enabled rules.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Whether no rule is enabled.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}
