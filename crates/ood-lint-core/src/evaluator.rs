//! Rule evaluation over extracted declarations.

use crate::config::CheckSettings;
use crate::model::Declaration;
use crate::rule::Rule;
use crate::types::Violation;
use std::path::Path;

/// Applies every rule to `decl` and collects all failures.
///
/// Evaluation never stops at the first failure and never mutates the
/// declaration; the output follows the order of `rules`.
#[must_use]
pub fn evaluate(
    file: &Path,
    decl: &Declaration,
    rules: &[Rule],
    settings: &CheckSettings,
) -> Vec<Violation> {
    rules
        .iter()
        .filter_map(|rule| rule.check(file, decl, settings))
        .collect()
}

/// Evaluates every declaration of one file.
#[must_use]
pub fn evaluate_all(
    file: &Path,
    decls: &[Declaration],
    rules: &[Rule],
    settings: &CheckSettings,
) -> Vec<Violation> {
    decls
        .iter()
        .flat_map(|decl| evaluate(file, decl, rules, settings))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeclKind, Parameter, TypeRef};
    use crate::types::Severity;

    fn has_params(decl: &Declaration, _: &CheckSettings) -> Option<String> {
        (!decl.parameters.is_empty()).then(|| format!("`{}` has parameters", decl.name))
    }

    fn is_constructor(decl: &Declaration, _: &CheckSettings) -> Option<String> {
        decl.is_constructor()
            .then(|| format!("`{}` is a constructor", decl.name))
    }

    fn rules() -> Vec<Rule> {
        vec![
            Rule {
                id: "has-params",
                code: "T001",
                description: "",
                severity: Severity::Error,
                help: "",
                predicate: has_params,
            },
            Rule {
                id: "is-constructor",
                code: "T002",
                description: "",
                severity: Severity::Warning,
                help: "",
                predicate: is_constructor,
            },
        ]
    }

    fn constructor() -> Declaration {
        let mut decl = Declaration::new("constructor", DeclKind::Constructor, 2, 3);
        decl.parameters
            .push(Parameter::new("logger", Some(TypeRef::simple("Logger"))));
        decl
    }

    #[test]
    fn aggregates_every_failure() {
        let v = evaluate(
            Path::new("a.ts"),
            &constructor(),
            &rules(),
            &CheckSettings::default(),
        );
        let ids: Vec<&str> = v.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(ids, vec!["has-params", "is-constructor"]);
    }

    #[test]
    fn evaluation_is_deterministic() {
        let settings = CheckSettings::default();
        let decl = constructor();
        let first = evaluate(Path::new("a.ts"), &decl, &rules(), &settings);
        let second = evaluate(Path::new("a.ts"), &decl, &rules(), &settings);
        assert_eq!(first, second);
    }

    #[test]
    fn rule_order_does_not_change_the_set_of_failures() {
        let settings = CheckSettings::default();
        let decl = constructor();
        let mut reversed = rules();
        reversed.reverse();

        let mut forward = evaluate(Path::new("a.ts"), &decl, &rules(), &settings);
        let mut backward = evaluate(Path::new("a.ts"), &decl, &reversed, &settings);
        forward.sort_by(Violation::report_order);
        backward.sort_by(Violation::report_order);
        assert_eq!(forward, backward);
    }

    #[test]
    fn evaluate_all_covers_each_declaration() {
        let decls = vec![
            constructor(),
            Declaration::new("Mailer", DeclKind::Class, 1, 1),
        ];
        let v = evaluate_all(
            Path::new("a.ts"),
            &decls,
            &rules(),
            &CheckSettings::default(),
        );
        assert_eq!(v.len(), 2);
    }
}
