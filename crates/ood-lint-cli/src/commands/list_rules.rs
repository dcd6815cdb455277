//! List rules command implementation.

use ood_lint_rules::{all_rules, Preset};

/// Runs the list-rules command.
pub fn run() {
    println!("Available rules:\n");
    println!(
        "{:<8} {:<38} {:<9} Description",
        "Code", "Name", "Severity"
    );
    println!("{}", "-".repeat(100));

    for rule in all_rules() {
        println!(
            "{:<8} {:<38} {:<9} {}",
            rule.code,
            rule.id,
            rule.severity.to_string(),
            rule.description
        );
    }

    println!("\nPresets:");
    for preset in [Preset::Recommended, Preset::Minimal] {
        let codes: Vec<&str> = preset.rules().iter().map(|r| r.code).collect();
        let marker = if preset == Preset::default() {
            " (default)"
        } else {
            ""
        };
        println!("  {:<12} - {}{marker}", preset.name(), codes.join(", "));
    }

    println!("\nUse --rules to filter specific rules, e.g.:");
    println!("  ood-lint check --rules no-setter-dependency-injection,OOD003");
}
