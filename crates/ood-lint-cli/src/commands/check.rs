//! Check command implementation.

use anyhow::{Context, Result};
use ood_lint_core::{Analyzer, Config, LintResult};
use ood_lint_ts::TypeScriptExtractor;
use std::path::{Path, PathBuf};

use crate::config_resolver::{self, ConfigResolver};
use crate::OutputFormat;

/// Options collected from the command line.
#[derive(Debug)]
pub struct CheckOptions {
    /// Files or directories to analyze; empty means the configured root.
    pub paths: Vec<PathBuf>,
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule ids or codes overriding the configured set.
    pub rules: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// `false` when `--no-fail` was given.
    pub fail_on_violation: bool,
}

/// Runs the check command and returns the process exit code.
pub fn run(options: &CheckOptions, explicit_config: Option<&Path>) -> Result<i32> {
    let cwd = std::env::current_dir().context("Failed to determine current directory")?;
    let project_dir = options
        .paths
        .first()
        .filter(|p| p.is_dir())
        .map_or_else(|| cwd.clone(), |p| cwd.join(p));

    let source = ConfigResolver::from_env().resolve(&project_dir, explicit_config);
    let mut config = config_resolver::load(&source)?;

    if let Some(filter) = &options.rules {
        config.rules = Some(
            filter
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(ToString::to_string)
                .collect(),
        );
    }
    let fail_on_violation = config.fail_on_violation && options.fail_on_violation;

    let result = analyze(options, config, &cwd)?;
    super::output::print(&result, options.format)?;

    Ok(i32::from(fail_on_violation && result.should_fail()))
}

fn analyze(options: &CheckOptions, config: Config, cwd: &Path) -> Result<LintResult> {
    let registry = ood_lint_rules::registry(&config).context("Invalid rule configuration")?;

    let mut builder = Analyzer::builder()
        .registry(registry)
        .extractor(TypeScriptExtractor::new())
        .extractor(TypeScriptExtractor::tsx())
        .excludes(options.exclude.iter().cloned());
    if !options.paths.is_empty() {
        builder = builder.root(cwd);
    }
    let analyzer = builder
        .config(config)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!(
        "Analyzing {} with {} rule(s)",
        analyzer.root().display(),
        analyzer.rule_count()
    );

    let result = if options.paths.is_empty() {
        analyzer.analyze()
    } else {
        let paths: Vec<PathBuf> = options.paths.iter().map(|p| cwd.join(p)).collect();
        analyzer.analyze_paths(&paths)
    };
    result.context("Analysis failed")
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn options(paths: Vec<PathBuf>) -> CheckOptions {
        CheckOptions {
            paths,
            format: OutputFormat::Compact,
            rules: None,
            exclude: Vec::new(),
            fail_on_violation: true,
        }
    }

    #[test]
    fn analyzes_explicit_files_relative_to_cwd() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("mailer.ts");
        fs::write(
            &file,
            "class Mailer {\n  constructor(logger?: Logger) {}\n}\n",
        )
        .unwrap();

        let result = analyze(&options(vec![file]), Config::default(), tmp.path()).unwrap();
        assert_eq!(result.files_checked, 1);
        assert_eq!(result.violations.len(), 1);
        assert_eq!(result.violations[0].location.file, PathBuf::from("mailer.ts"));
    }

    #[test]
    fn rule_filter_limits_rules() {
        let tmp = TempDir::new().unwrap();
        let file = tmp.path().join("clock.ts");
        fs::write(&file, "export function stamp(): any { return Date.now(); }\n").unwrap();

        let mut config = Config::default();
        config.rules = Some(vec!["OOD004".to_string()]);
        let result = analyze(&options(vec![file]), config, tmp.path()).unwrap();
        let rules: Vec<&str> = result.violations.iter().map(|v| v.rule.as_str()).collect();
        assert_eq!(rules, vec!["return-type-must-be-single-shape"]);
    }

    #[test]
    fn unknown_rule_is_an_error() {
        let tmp = TempDir::new().unwrap();
        let mut config = Config::default();
        config.rules = Some(vec!["no-such-rule".to_string()]);
        assert!(analyze(&options(Vec::new()), config, tmp.path()).is_err());
    }
}
