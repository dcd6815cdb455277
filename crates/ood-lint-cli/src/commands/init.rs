//! Init command implementation.

use anyhow::{bail, Context, Result};
use std::path::Path;

const DEFAULT_CONFIG: &str = r#"# ood-lint configuration

# "recommended" (all rules) or "minimal" (dependency-injection rules only)
preset = "recommended"

# Explicit rule list; overrides the preset when set
# rules = ["no-optional-constructor-dependency", "OOD003"]

# Exit with status 1 when violations or parse failures are found
fail_on_violation = true

[conventions]
# Parameter and field types treated as services rather than values
# service_type_pattern = "^(?:[A-Z]\\w*)?(Service|Logger|Repository|Client|Gateway)$"

# Symbols that reach the system directly ("fs" also covers "fs.readFileSync")
banned_system_calls = [
    "Date",
    "Math.random",
    "performance.now",
    "process.env",
    "fs",
    "fetch",
]

# Declarations or classes allowed to use banned symbols
# system_boundary_pattern = "(Factory|Clock|Boundary|Adapter|Gateway)$"

# Union members that do not count as a second return shape
sanctioned_union_markers = ["null", "undefined"]

# Catch-all return types
ad_hoc_return_types = ["any", "mixed"]

[severity]
# return-type-must-be-single-shape = "error"

[analyzer]
# Root directory to analyze (default: current directory)
# root = "./src"

# Glob patterns to exclude from analysis
exclude = [
    "**/node_modules/**",
    "**/dist/**",
    "**/*.d.ts",
]

# Respect .gitignore files
respect_gitignore = true

# Number of files analyzed in parallel (default: one per core)
# parallelism = 4
"#;

/// Runs the init command.
pub fn run(force: bool) -> Result<()> {
    let config_path = Path::new("ood-lint.toml");

    if config_path.exists() && !force {
        bail!(
            "Configuration file already exists at {}. Use --force to overwrite.",
            config_path.display()
        );
    }

    std::fs::write(config_path, DEFAULT_CONFIG)
        .with_context(|| format!("Failed to write {}", config_path.display()))?;

    println!("Created ood-lint.toml");
    println!("\nNext steps:");
    println!("  1. Edit ood-lint.toml to tune the conventions");
    println!("  2. Run: ood-lint check");

    Ok(())
}
