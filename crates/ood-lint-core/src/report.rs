//! Report formatting.
//!
//! Formatting is pure: callers decide where the string goes.

use crate::types::{LintResult, ParseFailure, Violation};
use std::fmt::Write;

/// Canonical report for an empty violation list.
pub const NO_VIOLATIONS: &str = "No violations found.";

/// Returns the violations sorted by (file, line, rule id).
#[must_use]
pub fn sorted(violations: &[Violation]) -> Vec<&Violation> {
    let mut sorted: Vec<&Violation> = violations.iter().collect();
    sorted.sort_by(|a, b| a.report_order(b));
    sorted
}

/// Renders violations as a flat, deterministically ordered list.
///
/// Each violation takes one block of lines (see [`Violation::format`]);
/// an empty list yields [`NO_VIOLATIONS`].
#[must_use]
pub fn format(violations: &[Violation]) -> String {
    if violations.is_empty() {
        return format!("{NO_VIOLATIONS}\n");
    }

    let mut out = String::new();
    for violation in sorted(violations) {
        out.push_str(&violation.format());
        out.push('\n');
    }
    out
}

/// Renders one line per violation: `file:line:col: severity [code] message`.
#[must_use]
pub fn format_compact(violations: &[Violation]) -> String {
    let mut out = String::new();
    for violation in sorted(violations) {
        let _ = writeln!(out, "{violation}");
    }
    out
}

/// Renders parse failures, one per line.
#[must_use]
pub fn format_parse_failures(failures: &[ParseFailure]) -> String {
    let mut out = String::new();
    for failure in failures {
        let _ = writeln!(out, "{failure}");
    }
    out
}

/// Summary line with per-severity counts.
#[must_use]
pub fn summary(result: &LintResult) -> String {
    let (errors, warnings, infos) = result.count_by_severity();
    let mut line = format!(
        "Found {errors} error(s), {warnings} warning(s), {infos} info(s) in {} file(s)",
        result.files_checked
    );
    if !result.parse_failures.is_empty() {
        let _ = write!(line, "; {} file(s) failed to parse", result.parse_failures.len());
    }
    line
}

/// Full text report: violations, parse failures, then the summary line.
#[must_use]
pub fn format_result(result: &LintResult) -> String {
    let mut out = format(&result.violations);
    if !result.parse_failures.is_empty() {
        out.push_str("Parse failures:\n");
        out.push_str(&format_parse_failures(&result.parse_failures));
        out.push('\n');
    }
    out.push_str(&summary(result));
    out.push('\n');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Location, Severity};
    use std::path::PathBuf;

    fn violation(file: &str, line: usize, rule: &str) -> Violation {
        Violation::new(
            "OOD000",
            rule,
            Severity::Error,
            "Foo.bar",
            Location::new(file, line, 1),
            format!("{rule} failed"),
        )
    }

    #[test]
    fn empty_list_yields_canonical_marker() {
        assert_eq!(format(&[]), "No violations found.\n");
        assert_eq!(format_compact(&[]), "");
    }

    #[test]
    fn output_is_sorted_by_file_line_rule() {
        let violations = vec![
            violation("b.ts", 1, "a-rule"),
            violation("a.ts", 9, "b-rule"),
            violation("a.ts", 9, "a-rule"),
            violation("a.ts", 2, "z-rule"),
        ];
        let compact = format_compact(&violations);
        let lines: Vec<&str> = compact.lines().collect();
        assert_eq!(
            lines,
            vec![
                "a.ts:2:1: error [OOD000] z-rule failed",
                "a.ts:9:1: error [OOD000] a-rule failed",
                "a.ts:9:1: error [OOD000] b-rule failed",
                "b.ts:1:1: error [OOD000] a-rule failed",
            ]
        );
    }

    #[test]
    fn formatting_is_idempotent() {
        let violations = vec![violation("b.ts", 1, "x"), violation("a.ts", 3, "y")];
        assert_eq!(format(&violations), format(&violations));
        assert_eq!(format_compact(&violations), format_compact(&violations));
    }

    #[test]
    fn input_order_does_not_matter() {
        let forward = vec![violation("a.ts", 1, "x"), violation("a.ts", 2, "y")];
        let backward = vec![violation("a.ts", 2, "y"), violation("a.ts", 1, "x")];
        assert_eq!(format(&forward), format(&backward));
    }

    #[test]
    fn result_report_merges_parse_failures() {
        let mut result = LintResult::new();
        result.files_checked = 2;
        result.violations.push(violation("a.ts", 1, "x"));
        result.parse_failures.push(ParseFailure {
            file: PathBuf::from("broken.ts"),
            line: 4,
            column: 2,
            message: "missing `}`".into(),
        });

        let report = format_result(&result);
        assert!(report.contains("x failed"));
        assert!(report.contains("broken.ts:4:2: parse error: missing `}`"));
        assert!(report.ends_with(
            "Found 1 error(s), 0 warning(s), 0 info(s) in 2 file(s); 1 file(s) failed to parse\n"
        ));
    }
}
