//! Rule requiring constructors to be free of side effects.
//!
//! A constructor should only store what it was given. Calling out to
//! collaborators, constructing objects or touching the system belongs in a
//! method the caller invokes explicitly. Reading a banned system symbol such
//! as `process.env` counts as touching the system. Assignments such as
//! `this.logger = logger` and the `super(...)` chain call are fine.

use ood_lint_core::{CheckSettings, Declaration, Rule, Severity};

/// Rule code for constructor-must-be-side-effect-free.
pub const CODE: &str = "OOD005";

/// Rule name for constructor-must-be-side-effect-free.
pub const NAME: &str = "constructor-must-be-side-effect-free";

/// Requires constructors to do nothing but store their arguments.
pub const RULE: Rule = Rule {
    id: NAME,
    code: CODE,
    description: "Requires constructors to only assign fields",
    severity: Severity::Warning,
    help: "Move the work into a method or a factory",
    predicate: check,
};

fn check(decl: &Declaration, settings: &CheckSettings) -> Option<String> {
    if !decl.is_constructor() || decl.parameters.is_empty() {
        return None;
    }
    let body = decl.body.as_ref()?;

    let first = body.side_effects(settings).next()?;
    let count = body.side_effects(settings).count();
    Some(format!(
        "Constructor of `{}` has {count} side effect(s), first `{}` on line {}",
        decl.owner.as_ref().map_or("<anonymous>", |o| o.name.as_str()),
        first.symbol,
        first.line
    ))
}
