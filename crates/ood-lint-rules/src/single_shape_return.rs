//! Rule requiring functions to return a single shape.
//!
//! A return type such as `User | string | false` forces every caller to
//! branch on what came back. `null` and `undefined` are the sanctioned way
//! to say "nothing" and do not count as a second shape. A union made only
//! of literal types (`'asc' | 'desc'`) is one enumerated shape.
//!
//! Catch-all types (`any` by default) are flagged as well: they are a
//! union of everything.

use ood_lint_core::{CheckSettings, DeclKind, Declaration, Rule, Severity};

/// Rule code for return-type-must-be-single-shape.
pub const CODE: &str = "OOD004";

/// Rule name for return-type-must-be-single-shape.
pub const NAME: &str = "return-type-must-be-single-shape";

/// Requires return types to describe a single shape.
pub const RULE: Rule = Rule {
    id: NAME,
    code: CODE,
    description: "Requires functions and methods to return a single type shape",
    severity: Severity::Warning,
    help: "Return one type, using null or undefined for absence",
    predicate: check,
};

fn is_literal(shape: &str) -> bool {
    shape.starts_with(['"', '\'', '`', '-'])
        || shape.starts_with(|c: char| c.is_ascii_digit())
        || matches!(shape, "true" | "false")
}

fn check(decl: &Declaration, settings: &CheckSettings) -> Option<String> {
    if !matches!(decl.kind, DeclKind::Function | DeclKind::Method) {
        return None;
    }
    let return_type = decl.return_type.as_ref()?;

    let shapes: Vec<&str> = return_type
        .shapes
        .iter()
        .map(String::as_str)
        .filter(|s| !settings.is_sanctioned_marker(s))
        .collect();

    match shapes.as_slice() {
        [] => None,
        [single] if settings.is_ad_hoc_type(single) => Some(format!(
            "`{}` returns catch-all type `{single}`",
            decl.qualified_name()
        )),
        [_] => None,
        many if many.iter().all(|s| is_literal(s)) => None,
        many => Some(format!(
            "`{}` returns {} different shapes: `{}`",
            decl.qualified_name(),
            many.len(),
            return_type.text
        )),
    }
}
