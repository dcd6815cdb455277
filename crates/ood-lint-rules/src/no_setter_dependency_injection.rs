//! Rule to forbid injecting dependencies through setters.
//!
//! A setter such as `setLogger(logger)` that assigns a field the
//! constructor already owns lets callers swap collaborators after
//! construction. Dependencies belong in the constructor only.
//!
//! A field counts as a dependency when it is named like a constructor
//! parameter of the enclosing class, or when it is declared with a service
//! type.

use ood_lint_core::{
    Accessor, CheckSettings, DeclKind, Declaration, Owner, Rule, Severity, TypeRef,
};

/// Rule code for no-setter-dependency-injection.
pub const CODE: &str = "OOD002";

/// Rule name for no-setter-dependency-injection.
pub const NAME: &str = "no-setter-dependency-injection";

/// Forbids setter methods that assign constructor-owned dependencies.
pub const RULE: Rule = Rule {
    id: NAME,
    code: CODE,
    description: "Forbids injecting dependencies through setter methods",
    severity: Severity::Error,
    help: "Pass the dependency to the constructor and drop the setter",
    predicate: check,
};

/// Whether the method is a `set<Noun>` method or a `set` accessor.
fn is_setter(decl: &Declaration) -> bool {
    if decl.kind != DeclKind::Method {
        return false;
    }
    decl.accessor == Some(Accessor::Set)
        || decl
            .name
            .strip_prefix("set")
            .is_some_and(|noun| noun.starts_with(|c: char| c.is_ascii_uppercase()))
}

fn is_dependency_field(owner: &Owner, field: &str, settings: &CheckSettings) -> bool {
    owner.constructor_params.iter().any(|p| p == field)
        || owner
            .field(field)
            .and_then(|f| f.declared_type.as_ref())
            .and_then(TypeRef::primary_name)
            .is_some_and(|name| settings.is_service_type(name))
}

fn check(decl: &Declaration, settings: &CheckSettings) -> Option<String> {
    if decl.parameters.is_empty() || !is_setter(decl) {
        return None;
    }
    let owner = decl.owner.as_ref()?;
    let body = decl.body.as_ref()?;

    let field = body
        .assigned_fields
        .iter()
        .find(|f| is_dependency_field(owner, f, settings))?;

    Some(format!(
        "Setter `{}` injects dependency `{field}` into `{}` after construction",
        decl.name, owner.name
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use ood_lint_core::{BodySummary, FieldInfo, Parameter};

    fn owner() -> Owner {
        Owner {
            name: "Mailer".into(),
            constructor_params: vec!["logger".into()],
            fields: vec![
                FieldInfo {
                    name: "logger".into(),
                    declared_type: Some(TypeRef::simple("Logger")),
                },
                FieldInfo {
                    name: "cache".into(),
                    declared_type: Some(TypeRef::simple("TemplateCache")),
                },
                FieldInfo {
                    name: "subject".into(),
                    declared_type: Some(TypeRef::simple("string")),
                },
            ],
        }
    }

    fn setter(name: &str, assigns: &str) -> Declaration {
        let mut decl = Declaration::new(name, DeclKind::Method, 8, 3);
        decl.owner = Some(owner());
        decl.parameters = vec![Parameter::new("value", None)];
        decl.body = Some(BodySummary {
            call_sites: Vec::new(),
            assigned_fields: vec![assigns.to_string()],
        });
        decl
    }

    fn run(decl: &Declaration) -> Option<String> {
        check(decl, &CheckSettings::default())
    }

    #[test]
    fn flags_setter_for_constructor_parameter() {
        let message = run(&setter("setLogger", "logger")).expect("violation");
        assert_eq!(
            message,
            "Setter `setLogger` injects dependency `logger` into `Mailer` after construction"
        );
    }

    #[test]
    fn flags_setter_for_service_typed_field() {
        assert!(run(&setter("setCache", "cache")).is_some());
    }

    #[test]
    fn flags_set_accessor() {
        let mut decl = setter("logger", "logger");
        decl.accessor = Some(Accessor::Set);
        assert!(run(&decl).is_some());
    }

    #[test]
    fn value_field_setter_passes() {
        assert_eq!(run(&setter("setSubject", "subject")), None);
    }

    #[test]
    fn non_setter_names_pass() {
        assert_eq!(run(&setter("settle", "logger")), None);
        assert_eq!(run(&setter("reset", "logger")), None);
    }

    #[test]
    fn zero_parameter_setter_passes() {
        let mut decl = setter("setLogger", "logger");
        decl.parameters.clear();
        assert_eq!(run(&decl), None);
    }

    #[test]
    fn free_function_passes() {
        let mut decl = setter("setLogger", "logger");
        decl.owner = None;
        assert_eq!(run(&decl), None);
    }
}
