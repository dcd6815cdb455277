//! Core analyzer for orchestrating lint execution.
//!
//! Files are independent: each one is read, extracted and evaluated on its
//! own, so the per-file work runs as a parallel map with no shared mutable
//! state. Determinism comes from the final sort.

use crate::allowance::check_allow_with_reason;
use crate::config::{CheckSettings, Config, ConfigError};
use crate::evaluator::evaluate_all;
use crate::extractor::{ParseError, SourceExtractor};
use crate::rule::RuleRegistry;
use crate::types::{LintResult, ParseFailure, Severity, Suggestion, Violation};

use rayon::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading files.
    #[error("IO error on {path}: {source}")]
    Io {
        /// Path that failed.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Error walking a directory tree.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Source file that could not be decomposed, when parse errors are fatal.
    #[error("Parse error in {path}: {source}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// The parse error.
        source: ParseError,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// The worker pool could not be started.
    #[error("Failed to start worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    registry: RuleRegistry,
    extractors: Vec<Box<dyn SourceExtractor>>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory violations are reported relative to.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Sets the enabled rules.
    #[must_use]
    pub fn registry(mut self, registry: RuleRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Adds a language extractor.
    #[must_use]
    pub fn extractor<E: SourceExtractor + 'static>(mut self, extractor: E) -> Self {
        self.extractors.push(Box::new(extractor));
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// Every configuration problem surfaces here, before any file is read.
    ///
    /// # Errors
    ///
    /// Returns an error if a convention pattern or exclude glob is malformed,
    /// or the current directory cannot be determined.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let settings = config.settings()?;

        let root = self.root.unwrap_or_else(|| config.analyzer.root.clone());
        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()
                .map_err(|source| AnalyzerError::Io {
                    path: root.clone(),
                    source,
                })?
                .join(&root)
        };

        let mut exclude_patterns = self.exclude_patterns;
        exclude_patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude = exclude_patterns
            .iter()
            .map(|p| glob::Pattern::new(p))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            registry: self.registry,
            settings,
            extractors: self.extractors,
            exclude_patterns,
            exclude,
            respect_gitignore: config.analyzer.respect_gitignore,
            parallelism: config.analyzer.parallelism,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// Outcome of checking one file.
enum FileOutcome {
    Checked(Vec<Violation>),
    Failed(ParseFailure),
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance. The analyzer is
/// read-only once built and is shared across worker threads.
pub struct Analyzer {
    root: PathBuf,
    registry: RuleRegistry,
    settings: CheckSettings,
    extractors: Vec<Box<dyn SourceExtractor>>,
    exclude_patterns: Vec<String>,
    exclude: Vec<glob::Pattern>,
    respect_gitignore: bool,
    parallelism: Option<usize>,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of enabled rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.registry.len()
    }

    /// Analyzes every supported file under the root.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        let root = self.root.clone();
        self.analyze_paths(&[root])
    }

    /// Analyzes the given files and directories.
    ///
    /// Directories are walked; files are checked directly when an extractor
    /// handles their extension. An empty list yields an empty result.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails.
    pub fn analyze_paths(&self, paths: &[PathBuf]) -> Result<LintResult, AnalyzerError> {
        let mut files = Vec::new();
        for path in paths {
            let path = if path.is_absolute() {
                path.clone()
            } else {
                self.root.join(path)
            };
            if path.is_dir() {
                files.extend(self.discover_files(&path)?);
            } else if self.extractor_for(&path).is_some() {
                files.push(path);
            } else {
                debug!("Skipping unsupported file: {}", path.display());
            }
        }
        files.sort();
        files.dedup();

        self.analyze_files(&files)
    }

    /// Analyzes an explicit list of files.
    ///
    /// # Errors
    ///
    /// Returns an error if a file cannot be read, the worker pool cannot be
    /// started, or a file fails to parse while parse errors are fatal.
    pub fn analyze_files(&self, files: &[PathBuf]) -> Result<LintResult, AnalyzerError> {
        info!(
            "Analyzing {} file(s) with {} rule(s)",
            files.len(),
            self.registry.len()
        );

        let run = || {
            files
                .par_iter()
                .map(|f| self.analyze_file(f))
                .collect::<Vec<_>>()
        };
        let outcomes = match self.parallelism {
            Some(threads) => rayon::ThreadPoolBuilder::new()
                .num_threads(threads)
                .build()?
                .install(run),
            None => run(),
        };

        let mut result = LintResult::new();
        for outcome in outcomes {
            match outcome? {
                FileOutcome::Checked(violations) => result.violations.extend(violations),
                FileOutcome::Failed(failure) => result.parse_failures.push(failure),
            }
            result.files_checked += 1;
        }
        result.sort();

        info!(
            "Analysis complete: {} violation(s), {} parse failure(s) in {} file(s)",
            result.violations.len(),
            result.parse_failures.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Reads and checks one file.
    fn analyze_file(&self, path: &Path) -> Result<FileOutcome, AnalyzerError> {
        debug!("Analyzing: {}", path.display());

        let bytes = std::fs::read(path).map_err(|source| AnalyzerError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let relative = self.relative_path(path);

        let analyzed = String::from_utf8(bytes)
            .map_err(|_| ParseError::unpositioned("file is not valid UTF-8"))
            .and_then(|content| self.analyze_source(&relative, &content));
        match analyzed {
            Ok(violations) => Ok(FileOutcome::Checked(violations)),
            Err(source) if self.fail_on_parse_error => Err(AnalyzerError::Parse {
                path: relative,
                source,
            }),
            Err(err) => {
                warn!("Failed to parse {}: {}", relative.display(), err);
                Ok(FileOutcome::Failed(ParseFailure {
                    file: relative,
                    line: err.line,
                    column: err.column,
                    message: err.message,
                }))
            }
        }
    }

    /// Extracts and evaluates in-memory source text.
    ///
    /// `file` selects the extractor by extension and is used as the
    /// violation location. Files no extractor handles yield no violations.
    ///
    /// # Errors
    ///
    /// Returns [`ParseError`] if the source cannot be decomposed.
    pub fn analyze_source(&self, file: &Path, content: &str) -> Result<Vec<Violation>, ParseError> {
        let Some(extractor) = self.extractor_for(file) else {
            debug!("No extractor for {}", file.display());
            return Ok(Vec::new());
        };

        let declarations = extractor.extract(content)?;
        debug!(
            "{}: {} declaration(s) via {}",
            file.display(),
            declarations.len(),
            extractor.language_id()
        );

        let violations = evaluate_all(
            file,
            &declarations,
            self.registry.all_rules(),
            &self.settings,
        );
        Ok(self.apply_allow_directives(content, violations))
    }

    /// Drops violations suppressed by an allow directive.
    ///
    /// A directive without a reason still suppresses, but for rules that
    /// require a reason it is reported as a warning in its place.
    fn apply_allow_directives(&self, content: &str, violations: Vec<Violation>) -> Vec<Violation> {
        let mut kept = Vec::with_capacity(violations.len());
        for violation in violations {
            let allow = check_allow_with_reason(content, violation.location.line, &violation.rule);
            if !allow.is_allowed() {
                kept.push(violation);
                continue;
            }

            let needs_reason = self
                .registry
                .get(&violation.rule)
                .is_some_and(|r| r.requires_allow_reason());
            if needs_reason && allow.reason().is_none() {
                let message = format!(
                    "Allow directive for '{}' is missing required reason",
                    violation.rule
                );
                kept.push(
                    Violation {
                        message,
                        suggestion: Some(Suggestion::new(
                            "Add reason=\"...\" to explain why this exception is necessary",
                        )),
                        ..violation
                    }
                    .with_severity(Severity::Warning),
                );
            } else {
                debug!(
                    "Suppressed {} on {} by allow directive",
                    violation.rule, violation.declaration
                );
            }
        }
        kept
    }

    fn extractor_for(&self, path: &Path) -> Option<&dyn SourceExtractor> {
        let ext = path.extension().and_then(|e| e.to_str())?;
        self.extractors
            .iter()
            .find(|e| e.handles_extension(ext))
            .map(AsRef::as_ref)
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root)
            .map_or_else(|_| path.to_path_buf(), Path::to_path_buf)
    }

    /// Discovers supported source files under `dir`.
    fn discover_files(&self, dir: &Path) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(dir);
        builder.git_ignore(self.respect_gitignore);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || self.extractor_for(path).is_none() {
                continue;
            }
            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }
            files.push(path.to_path_buf());
        }

        Ok(files)
    }

    /// Checks if a path should be excluded.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = self.relative_path(path);
        let relative = relative.to_string_lossy();
        let absolute = path.to_string_lossy();

        if self
            .exclude
            .iter()
            .any(|p| p.matches(&relative) || p.matches(&absolute))
        {
            return true;
        }

        // Directory patterns like "**/node_modules/**" also match as substrings.
        self.exclude_patterns.iter().any(|pattern| {
            let normalized = pattern.replace("**", "");
            normalized.len() > 2 && !normalized.contains('*') && absolute.contains(&normalized)
        })
    }
}
