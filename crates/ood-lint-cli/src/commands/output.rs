//! Shared output formatting for lint results.

use anyhow::Result;
use ood_lint_core::{report, LintResult};

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
    }
    Ok(())
}

fn print_text(result: &LintResult) {
    print!("{}", render_text(result));
}

/// The plain report from [`report::format_result`] with a coloured summary line.
fn render_text(result: &LintResult) -> String {
    let (errors, warnings, _) = result.count_by_severity();
    let summary = report::summary(result);
    let full = report::format_result(result);
    let body = full
        .strip_suffix(&format!("{summary}\n"))
        .unwrap_or(&full);

    let summary_color = if errors > 0 || !result.parse_failures.is_empty() {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };
    format!("{body}{summary_color}{summary}\x1b[0m\n")
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    print!("{}", report::format_compact(&result.violations));
    print!("{}", report::format_parse_failures(&result.parse_failures));
}
