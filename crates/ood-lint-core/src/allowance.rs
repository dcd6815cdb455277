//! Comment-based allowance directives.
//!
//! Supports directives like:
//! ```text
//! // ood-lint: allow(no-direct-system-call-in-method-body) reason="audited clock"
//! ```
//!
//! A directive applies to a declaration when it sits on the declaration's
//! line or the line directly above it.

use std::collections::HashSet;

/// Result of checking for allow directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AllowCheck {
    /// Rule is not allowed.
    Denied,
    /// Rule is allowed with optional reason.
    Allowed {
        /// The reason provided (if any).
        reason: Option<String>,
    },
}

impl AllowCheck {
    /// Returns true if allowed.
    #[must_use]
    pub fn is_allowed(&self) -> bool {
        matches!(self, Self::Allowed { .. })
    }

    /// Returns the reason if allowed.
    #[must_use]
    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Allowed { reason } => reason.as_deref(),
            Self::Denied => None,
        }
    }
}

/// Parsed allowance directive.
#[derive(Debug, Clone)]
struct AllowDirective {
    rules: HashSet<String>,
    reason: Option<String>,
}

/// Checks source code for an allowance comment covering `line`.
///
/// # Arguments
///
/// * `content` - Source code content
/// * `line` - Line number to check (1-indexed)
/// * `rule_id` - Id of the rule to check for; `all` matches every rule
#[must_use]
pub fn check_allow_with_reason(content: &str, line: usize, rule_id: &str) -> AllowCheck {
    let lines: Vec<&str> = content.lines().collect();

    for check_line in [line.saturating_sub(1), line] {
        if check_line == 0 || check_line > lines.len() {
            continue;
        }

        if let Some(directive) = parse_allow_directive(lines[check_line - 1]) {
            if directive.rules.contains(rule_id) || directive.rules.contains("all") {
                return AllowCheck::Allowed {
                    reason: directive.reason,
                };
            }
        }
    }

    AllowCheck::Denied
}

/// Parses an allowance directive from a comment, which may trail code.
fn parse_allow_directive(line: &str) -> Option<AllowDirective> {
    const MARKER: &str = "ood-lint:";

    let marker = line.find(MARKER)?;
    let before = line[..marker].trim_end();
    let opener = &before[before.trim_end_matches(['/', '*', '!']).len()..];
    if !(opener.starts_with("//") || opener.starts_with("/*")) {
        return None;
    }

    let directive = line[marker + MARKER.len()..].trim();
    let allow_content = directive.strip_prefix("allow(")?.trim();

    let paren_end = allow_content.find(')')?;
    let rules: HashSet<String> = allow_content[..paren_end]
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    if rules.is_empty() {
        return None;
    }

    let rest = allow_content[paren_end + 1..].trim();
    let reason = rest
        .strip_prefix("reason=")
        .map(str::trim)
        .and_then(|r| r.strip_prefix('"'))
        .and_then(|r| r.find('"').map(|end| r[..end].to_string()))
        .filter(|r| !r.is_empty());

    Some(AllowDirective { rules, reason })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_allow_directive() {
        let directive = parse_allow_directive("// ood-lint: allow(no-setter-dependency-injection)")
            .expect("directive parses");
        assert!(directive.rules.contains("no-setter-dependency-injection"));
        assert!(directive.reason.is_none());
    }

    #[test]
    fn test_parse_allow_directive_with_reason() {
        let directive = parse_allow_directive(
            "  // ood-lint: allow(return-type-must-be-single-shape) reason=\"legacy API\"",
        )
        .expect("directive parses");
        assert_eq!(directive.reason.as_deref(), Some("legacy API"));
    }

    #[test]
    fn test_parse_block_comment_and_multiple_rules() {
        let directive = parse_allow_directive("/* ood-lint: allow(rule1, rule2) */")
            .expect("directive parses");
        assert!(directive.rules.contains("rule1"));
        assert!(directive.rules.contains("rule2"));
    }

    #[test]
    fn plain_comment_is_not_a_directive() {
        assert!(parse_allow_directive("// allow(rule1)").is_none());
        assert!(parse_allow_directive("const x = 1;").is_none());
        assert!(parse_allow_directive("// ood-lint: allow()").is_none());
    }

    #[test]
    fn test_check_allow_on_previous_line() {
        let content = r#"class Clock {
  // ood-lint: allow(no-direct-system-call-in-method-body) reason="the one clock"
  now(): Date { return new Date(); }
}"#;

        let result =
            check_allow_with_reason(content, 3, "no-direct-system-call-in-method-body");
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("the one clock"));
        assert!(!check_allow_with_reason(content, 3, "other-rule").is_allowed());
    }

    #[test]
    fn test_check_allow_trailing_comment_and_all() {
        let content = "function f(): any { return 1; } // ood-lint: allow(all)";
        let result = check_allow_with_reason(content, 1, "return-type-must-be-single-shape");
        assert!(result.is_allowed());
        assert_eq!(result.reason(), None);
    }

    #[test]
    fn test_check_allow_trailing_comment_after_url_string() {
        let content = r#"url(): any { return "http://x"; } // ood-lint: allow(all) reason="legacy""#;
        let result = check_allow_with_reason(content, 1, "return-type-must-be-single-shape");
        assert!(result.is_allowed());
        assert_eq!(result.reason(), Some("legacy"));
    }

    #[test]
    fn marker_outside_a_comment_is_not_a_directive() {
        assert!(parse_allow_directive(r#"const s = "ood-lint: allow(all)";"#).is_none());
    }

    #[test]
    fn test_check_allow_denied_when_too_far() {
        let content = "// ood-lint: allow(all)\n\nfunction f(): any { return 1; }";
        assert_eq!(check_allow_with_reason(content, 3, "x"), AllowCheck::Denied);
    }
}
