//! Rule to forbid optional service dependencies in constructors.
//!
//! # Rationale
//!
//! A service the object needs to do its job must be handed over when the
//! object is created. A default value or a nullable type turns the
//! dependency into a hidden branch: the object silently works differently
//! when the caller forgets it.
//!
//! # Configuration
//!
//! - `conventions.service_type_pattern`: which parameter types count as
//!   services. Parameters whose type is missing or not a single named type
//!   are never flagged.
//!
//! # Suppression
//!
//! - `// ood-lint: allow(no-optional-constructor-dependency) reason="..."`

use ood_lint_core::{CheckSettings, Declaration, Parameter, Rule, Severity, TypeRef};

/// Rule code for no-optional-constructor-dependency.
pub const CODE: &str = "OOD001";

/// Rule name for no-optional-constructor-dependency.
pub const NAME: &str = "no-optional-constructor-dependency";

/// Forbids constructor parameters of service type that can be omitted.
pub const RULE: Rule = Rule {
    id: NAME,
    code: CODE,
    description: "Forbids optional or nullable service dependencies in constructors",
    severity: Severity::Error,
    help: "Make the dependency a required constructor parameter",
    predicate: check,
};

fn is_optional_service(param: &Parameter, settings: &CheckSettings) -> bool {
    param.is_optional()
        && param
            .declared_type
            .as_ref()
            .and_then(TypeRef::primary_name)
            .is_some_and(|name| settings.is_service_type(name))
}

fn check(decl: &Declaration, settings: &CheckSettings) -> Option<String> {
    if !decl.is_constructor() {
        return None;
    }

    let offending: Vec<String> = decl
        .parameters
        .iter()
        .filter(|p| is_optional_service(p, settings))
        .map(|p| match &p.declared_type {
            Some(ty) => format!("`{}: {}`", p.name, ty.text),
            None => format!("`{}`", p.name),
        })
        .collect();
    if offending.is_empty() {
        return None;
    }

    Some(format!(
        "Constructor of `{}` takes optional service dependency {}",
        decl.owner.as_ref().map_or("<anonymous>", |o| o.name.as_str()),
        offending.join(", ")
    ))
}
