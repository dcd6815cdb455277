//! Configuration types for ood-lint.

use crate::types::Severity;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;

/// Default pattern for type names that denote behaviour rather than data.
pub const DEFAULT_SERVICE_TYPE_PATTERN: &str = r"^(?:[A-Z]\w*)?(Service|Logger|Repository|Client|Gateway|Clock|Mailer|Factory|Provider|Handler|Dispatcher|Bus|Queue|Cache|Store)$";

/// Default pattern for declarations allowed to touch the system directly.
pub const DEFAULT_SYSTEM_BOUNDARY_PATTERN: &str =
    r"(Factory|Clock|Boundary|Adapter|Gateway)$|^(create|make|build)([A-Z]|$)";

/// Top-level configuration for ood-lint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Preset to use ("recommended" or "minimal"); ignored when `rules` is set.
    #[serde(default)]
    pub preset: Option<String>,

    /// Subset of rule ids (or codes) to enable.
    #[serde(default)]
    pub rules: Option<Vec<String>>,

    /// Whether violations make the process exit with a failure status.
    #[serde(default = "default_true")]
    pub fail_on_violation: bool,

    /// Heuristics used by the rule predicates.
    #[serde(default)]
    pub conventions: ConventionsConfig,

    /// Per-rule severity overrides keyed by rule id.
    #[serde(default)]
    pub severity: BTreeMap<String, Severity>,

    /// Analyzer configuration.
    #[serde(default)]
    pub analyzer: AnalyzerConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            preset: None,
            rules: None,
            fail_on_violation: true,
            conventions: ConventionsConfig::default(),
            severity: BTreeMap::new(),
            analyzer: AnalyzerConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Io {
            path: path.to_path_buf(),
            source: e,
        })?;
        Self::parse(&content)
    }

    /// Parses configuration from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid.
    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|e| ConfigError::Parse {
            message: e.to_string(),
        })
    }

    /// Compiles the convention heuristics into evaluation settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if a pattern is not a valid regex.
    pub fn settings(&self) -> Result<CheckSettings, ConfigError> {
        CheckSettings::compile(&self.conventions)
    }
}

/// Convention heuristics shared by the rule predicates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConventionsConfig {
    /// Regex matched against a type's base name to classify it as a service.
    #[serde(default = "default_service_type_pattern")]
    pub service_type_pattern: String,

    /// Symbols that reach outside the process; dotted members are covered too.
    #[serde(default = "default_banned_system_calls")]
    pub banned_system_calls: Vec<String>,

    /// Regex matched against a declaration name or its owner's name to mark
    /// it as a system boundary.
    #[serde(default = "default_system_boundary_pattern")]
    pub system_boundary_pattern: String,

    /// Union members that mark a return value as optional rather than mixed.
    #[serde(default = "default_sanctioned_union_markers")]
    pub sanctioned_union_markers: Vec<String>,

    /// Catch-all return types that hide multiple shapes.
    #[serde(default = "default_ad_hoc_return_types")]
    pub ad_hoc_return_types: Vec<String>,
}

impl Default for ConventionsConfig {
    fn default() -> Self {
        Self {
            service_type_pattern: default_service_type_pattern(),
            banned_system_calls: default_banned_system_calls(),
            system_boundary_pattern: default_system_boundary_pattern(),
            sanctioned_union_markers: default_sanctioned_union_markers(),
            ad_hoc_return_types: default_ad_hoc_return_types(),
        }
    }
}

fn default_service_type_pattern() -> String {
    DEFAULT_SERVICE_TYPE_PATTERN.to_string()
}

fn default_system_boundary_pattern() -> String {
    DEFAULT_SYSTEM_BOUNDARY_PATTERN.to_string()
}

fn default_banned_system_calls() -> Vec<String> {
    [
        "Date",
        "Math.random",
        "performance.now",
        "process.env",
        "fs",
        "fetch",
        "crypto.randomUUID",
        "localStorage",
        "XMLHttpRequest",
    ]
    .iter()
    .map(ToString::to_string)
    .collect()
}

fn default_sanctioned_union_markers() -> Vec<String> {
    vec!["null".to_string(), "undefined".to_string()]
}

fn default_ad_hoc_return_types() -> Vec<String> {
    vec!["any".to_string(), "mixed".to_string()]
}

/// Analyzer-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalyzerConfig {
    /// Root directory to analyze (default: current directory).
    #[serde(default = "default_root")]
    pub root: PathBuf,

    /// Glob patterns to exclude from analysis.
    #[serde(default = "default_excludes")]
    pub exclude: Vec<String>,

    /// Whether to respect .gitignore files.
    #[serde(default = "default_true")]
    pub respect_gitignore: bool,

    /// Maximum number of files analyzed in parallel (default: one per core).
    #[serde(default)]
    pub parallelism: Option<usize>,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            root: default_root(),
            exclude: default_excludes(),
            respect_gitignore: true,
            parallelism: None,
        }
    }
}

fn default_root() -> PathBuf {
    PathBuf::from(".")
}

fn default_excludes() -> Vec<String> {
    vec![
        "**/node_modules/**".to_string(),
        "**/dist/**".to_string(),
        "**/*.d.ts".to_string(),
    ]
}

fn default_true() -> bool {
    true
}

/// Compiled convention heuristics handed to every rule predicate.
#[derive(Debug, Clone)]
pub struct CheckSettings {
    /// Service type classifier.
    pub service_type: Regex,
    /// Banned system symbols.
    pub banned_system_calls: Vec<String>,
    /// System boundary classifier.
    pub system_boundary: Regex,
    /// Sanctioned optional markers in return unions.
    pub sanctioned_union_markers: Vec<String>,
    /// Catch-all return types.
    pub ad_hoc_return_types: Vec<String>,
}

impl CheckSettings {
    /// Compiles settings from the convention configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if a pattern does not compile.
    pub fn compile(conventions: &ConventionsConfig) -> Result<Self, ConfigError> {
        let compile = |option: &'static str, pattern: &str| {
            Regex::new(pattern).map_err(|source| ConfigError::InvalidPattern { option, source })
        };

        Ok(Self {
            service_type: compile("service_type_pattern", &conventions.service_type_pattern)?,
            banned_system_calls: conventions.banned_system_calls.clone(),
            system_boundary: compile(
                "system_boundary_pattern",
                &conventions.system_boundary_pattern,
            )?,
            sanctioned_union_markers: conventions.sanctioned_union_markers.clone(),
            ad_hoc_return_types: conventions.ad_hoc_return_types.clone(),
        })
    }

    /// Whether a type base name denotes a service.
    #[must_use]
    pub fn is_service_type(&self, type_name: &str) -> bool {
        self.service_type.is_match(type_name)
    }

    /// Returns the banned symbol matched by `symbol`, if any.
    #[must_use]
    pub fn banned_symbol(&self, site: &crate::model::CallSite) -> Option<&str> {
        self.banned_system_calls
            .iter()
            .map(String::as_str)
            .find(|banned| site.matches(banned))
    }

    /// Whether a name designates a system boundary.
    #[must_use]
    pub fn is_system_boundary(&self, name: &str) -> bool {
        self.system_boundary.is_match(name)
    }

    /// Whether a union member is a sanctioned optional marker.
    #[must_use]
    pub fn is_sanctioned_marker(&self, shape: &str) -> bool {
        self.sanctioned_union_markers.iter().any(|m| m == shape)
    }

    /// Whether a return shape is a catch-all type.
    #[must_use]
    pub fn is_ad_hoc_type(&self, shape: &str) -> bool {
        self.ad_hoc_return_types.iter().any(|t| t == shape)
    }
}

impl Default for CheckSettings {
    fn default() -> Self {
        // The built-in patterns are constants covered by tests.
        #[allow(clippy::expect_used)]
        Self::compile(&ConventionsConfig::default()).expect("built-in patterns compile")
    }
}

/// Configuration errors. All of them abort a run before any extraction.
#[derive(Debug, thiserror::Error, miette::Diagnostic)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("Failed to read config file {path}: {source}")]
    Io {
        /// Path that failed to read.
        path: PathBuf,
        /// Underlying IO error.
        source: std::io::Error,
    },

    /// Parse error in config file.
    #[error("Failed to parse config: {message}")]
    Parse {
        /// Parse error message.
        message: String,
    },

    /// A rule id or code that no rule answers to.
    #[error("Unknown rule `{id}`")]
    #[diagnostic(help("run `ood-lint list-rules` to see the available rules"))]
    UnknownRule {
        /// The offending id.
        id: String,
    },

    /// A preset name that does not exist.
    #[error("Unknown preset `{name}`. Valid presets: recommended, minimal")]
    UnknownPreset {
        /// The offending name.
        name: String,
    },

    /// A pattern option that is not a valid regular expression.
    #[error("Invalid pattern for `{option}`: {source}")]
    InvalidPattern {
        /// Option name.
        option: &'static str,
        /// Regex compile error.
        source: regex::Error,
    },
}
