//! Rule to forbid reaching the system directly from method bodies.
//!
//! # Rationale
//!
//! Reading the clock, the environment, the filesystem or the network from
//! inside business logic hides a dependency that tests cannot replace.
//! Such calls belong in a small boundary object that is injected.
//!
//! # Configuration
//!
//! - `conventions.banned_system_calls`: symbols treated as system calls.
//!   `fs` also covers `fs.readFileSync`, `Date` covers `Date.now`.
//! - `conventions.system_boundary_pattern`: declarations or classes whose
//!   name matches may use them (e.g. `SystemClock`, `createServer`).

use ood_lint_core::{CallSiteKind, CheckSettings, Declaration, Rule, Severity};

/// Rule code for no-direct-system-call-in-method-body.
pub const CODE: &str = "OOD003";

/// Rule name for no-direct-system-call-in-method-body.
pub const NAME: &str = "no-direct-system-call-in-method-body";

/// Forbids direct system calls outside designated boundary code.
pub const RULE: Rule = Rule {
    id: NAME,
    code: CODE,
    description: "Forbids direct clock, environment, filesystem or network access in method bodies",
    severity: Severity::Error,
    help: "Inject a boundary dependency (clock, environment, file store) instead",
    predicate: check,
};

fn is_boundary(decl: &Declaration, settings: &CheckSettings) -> bool {
    settings.is_system_boundary(&decl.name)
        || decl
            .owner
            .as_ref()
            .is_some_and(|o| settings.is_system_boundary(&o.name))
}

fn check(decl: &Declaration, settings: &CheckSettings) -> Option<String> {
    if !decl.is_callable() || is_boundary(decl, settings) {
        return None;
    }
    let body = decl.body.as_ref()?;

    let (site, banned) = body
        .call_sites
        .iter()
        .find_map(|site| settings.banned_symbol(site).map(|banned| (site, banned)))?;

    let verb = match site.kind {
        CallSiteKind::Construction => "constructs",
        CallSiteKind::Call => "calls",
        CallSiteKind::Access => "reads",
    };
    Some(format!(
        "`{}` {verb} `{}` directly on line {} (banned system symbol `{banned}`)",
        decl.qualified_name(),
        site.symbol,
        site.line
    ))
}
