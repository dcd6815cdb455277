//! Core types for lint violations and results.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::path::PathBuf;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to the analysis root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed).
    pub column: usize,
}

impl Location {
    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: impl Into<PathBuf>, line: usize, column: usize) -> Self {
        Self {
            file: file.into(),
            line,
            column,
        }
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
}

impl Suggestion {
    /// Creates a new suggestion.
    #[must_use]
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// A single rule failure tied to one declaration.
///
/// Violations are immutable once produced; the builder-style `with_*`
/// methods consume and return a new value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "OOD001").
    pub code: String,
    /// Rule id (e.g., "no-optional-constructor-dependency").
    pub rule: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Qualified name of the offending declaration (e.g., `Mailer.constructor`).
    pub declaration: String,
    /// Location of the declaration.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        severity: Severity,
        declaration: impl Into<String>,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            severity,
            declaration: declaration.into(),
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// Returns a copy of this violation with a different severity.
    #[must_use]
    pub fn with_severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    /// Report ordering: file, line, rule id, then column and message as
    /// tie-breakers so the order is total.
    #[must_use]
    pub fn report_order(&self, other: &Self) -> Ordering {
        self.location
            .file
            .cmp(&other.location.file)
            .then(self.location.line.cmp(&other.location.line))
            .then_with(|| self.rule.cmp(&other.rule))
            .then(self.location.column.cmp(&other.location.column))
            .then_with(|| self.message.cmp(&other.message))
    }

    /// Formats the violation for terminal output.
    #[must_use]
    pub fn format(&self) -> String {
        use std::fmt::Write;
        let mut output = format!(
            "{} {} at {}:{}:{}\n",
            self.code,
            self.rule,
            self.location.file.display(),
            self.location.line,
            self.location.column,
        );
        let _ = writeln!(output, "  {}: {}", self.severity, self.message);
        if let Some(suggestion) = &self.suggestion {
            let _ = writeln!(output, "  = help: {}", suggestion.message);
        }
        output
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message
        )
    }
}

/// A file that could not be structurally decomposed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParseFailure {
    /// File path relative to the analysis root.
    pub file: PathBuf,
    /// Line of the first offending node (1-indexed, 0 when unknown).
    pub line: usize,
    /// Column of the first offending node (1-indexed, 0 when unknown).
    pub column: usize,
    /// Parse error message.
    pub message: String,
}

impl std::fmt::Display for ParseFailure {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: parse error: {}",
            self.file.display(),
            self.line,
            self.column,
            self.message
        )
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found, in report order.
    pub violations: Vec<Violation>,
    /// Files that failed to parse.
    #[serde(default)]
    pub parse_failures: Vec<ParseFailure>,
    /// Number of files checked, including ones that failed to parse.
    pub files_checked: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true when nothing was reported at all.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.violations.is_empty() && self.parse_failures.is_empty()
    }

    /// Counts violations by severity as `(errors, warnings, infos)`.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        self.violations
            .iter()
            .fold((0, 0, 0), |(e, w, i), v| match v.severity {
                Severity::Error => (e + 1, w, i),
                Severity::Warning => (e, w + 1, i),
                Severity::Info => (e, w, i + 1),
            })
    }

    /// Checks if any violations meet or exceed the given severity threshold.
    #[must_use]
    pub fn has_violations_at(&self, severity: Severity) -> bool {
        self.violations.iter().any(|v| v.severity >= severity)
    }

    /// Whether this result should fail a run that has `fail_on_violation` set.
    ///
    /// Info-level findings never fail a run; parse failures always do.
    #[must_use]
    pub fn should_fail(&self) -> bool {
        self.has_violations_at(Severity::Warning) || !self.parse_failures.is_empty()
    }

    /// Sorts violations and parse failures into report order.
    pub fn sort(&mut self) {
        self.violations.sort_by(Violation::report_order);
        self.parse_failures
            .sort_by(|a, b| a.file.cmp(&b.file).then(a.line.cmp(&b.line)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(file: &str, line: usize, rule: &str, severity: Severity) -> Violation {
        Violation::new(
            "OOD001",
            rule,
            severity,
            "Mailer.constructor",
            Location::new(file, line, 3),
            "optional dependency",
        )
    }

    #[test]
    fn violation_display_is_compact() {
        let v = make_violation("src/mailer.ts", 4, "no-optional-constructor-dependency", Severity::Error);
        assert_eq!(
            v.to_string(),
            "src/mailer.ts:4:3: error [OOD001] optional dependency"
        );
    }

    #[test]
    fn violation_format_includes_suggestion() {
        let v = make_violation("a.ts", 1, "x", Severity::Error)
            .with_suggestion(Suggestion::new("Make the dependency required"));
        assert!(v.format().contains("= help: Make the dependency required"));
    }

    #[test]
    fn report_order_is_file_then_line_then_rule() {
        let a = make_violation("a.ts", 10, "z-rule", Severity::Error);
        let b = make_violation("a.ts", 10, "a-rule", Severity::Error);
        let c = make_violation("a.ts", 2, "z-rule", Severity::Error);
        let d = make_violation("b.ts", 1, "a-rule", Severity::Error);

        let mut result = LintResult::new();
        result.violations = vec![d.clone(), a.clone(), b.clone(), c.clone()];
        result.sort();
        assert_eq!(result.violations, vec![c, b, a, d]);
    }

    #[test]
    fn count_by_severity() {
        let mut result = LintResult::new();
        result.violations.push(make_violation("a.ts", 1, "x", Severity::Error));
        result.violations.push(make_violation("a.ts", 2, "x", Severity::Warning));
        result.violations.push(make_violation("a.ts", 3, "x", Severity::Warning));
        assert_eq!(result.count_by_severity(), (1, 2, 0));
    }

    #[test]
    fn info_only_result_does_not_fail() {
        let mut result = LintResult::new();
        result.violations.push(make_violation("a.ts", 1, "x", Severity::Info));
        assert!(!result.should_fail());
        assert!(!result.is_clean());
    }

    #[test]
    fn parse_failure_fails_run() {
        let mut result = LintResult::new();
        result.parse_failures.push(ParseFailure {
            file: PathBuf::from("broken.ts"),
            line: 3,
            column: 1,
            message: "missing `}`".into(),
        });
        assert!(result.should_fail());
    }

    #[test]
    fn empty_result_is_clean() {
        let result = LintResult::new();
        assert!(result.is_clean());
        assert!(!result.should_fail());
    }
}
