//! Configuration file discovery and loading.
//!
//! The first match wins:
//!
//! 1. `--config <FILE>`
//! 2. `ood-lint.toml`, then `.ood-lint.toml`, in the project directory
//! 3. `config.toml` in the global directory (`$OOD_LINT_CONFIG_DIR`, else
//!    `~/.ood-lint/`)
//! 4. built-in defaults

use anyhow::{Context, Result};
use ood_lint_core::Config;
use std::path::{Path, PathBuf};

/// Environment variable overriding the global config directory.
pub const CONFIG_DIR_ENV: &str = "OOD_LINT_CONFIG_DIR";

const PROJECT_CONFIG_NAMES: [&str; 2] = ["ood-lint.toml", ".ood-lint.toml"];

const GLOBAL_CONFIG_NAME: &str = "config.toml";

/// Origin of the configuration in effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigSource {
    /// Given on the command line.
    Explicit(PathBuf),
    /// Found in the project directory.
    Project(PathBuf),
    /// Found in the global config directory.
    Global(PathBuf),
    /// Nothing found; defaults apply.
    Default,
}

impl ConfigSource {
    /// The config file, unless defaults apply.
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        match self {
            Self::Explicit(p) | Self::Project(p) | Self::Global(p) => Some(p),
            Self::Default => None,
        }
    }
}

/// Looks up configuration files.
#[derive(Debug, Clone, Default)]
pub struct ConfigResolver {
    global_dir: Option<PathBuf>,
}

impl ConfigResolver {
    /// Uses `$OOD_LINT_CONFIG_DIR`, falling back to `~/.ood-lint`.
    #[must_use]
    pub fn from_env() -> Self {
        let global_dir = std::env::var_os(CONFIG_DIR_ENV)
            .map(PathBuf::from)
            .or_else(|| home::home_dir().map(|h| h.join(".ood-lint")));
        Self { global_dir }
    }

    /// Uses `dir` as the global config directory.
    #[must_use]
    pub fn with_global_dir(dir: Option<PathBuf>) -> Self {
        Self { global_dir: dir }
    }

    /// Finds the configuration for `project_dir`.
    ///
    /// An explicit path is returned as-is; a missing file surfaces when it
    /// is loaded.
    #[must_use]
    pub fn resolve(&self, project_dir: &Path, explicit: Option<&Path>) -> ConfigSource {
        if let Some(path) = explicit {
            return ConfigSource::Explicit(path.to_path_buf());
        }

        if let Some(path) = PROJECT_CONFIG_NAMES
            .iter()
            .map(|name| project_dir.join(name))
            .find(|candidate| candidate.is_file())
        {
            tracing::debug!("Found project config: {}", path.display());
            return ConfigSource::Project(path);
        }

        if let Some(path) = self
            .global_dir
            .as_ref()
            .map(|dir| dir.join(GLOBAL_CONFIG_NAME))
            .filter(|candidate| candidate.is_file())
        {
            tracing::debug!("Found global config: {}", path.display());
            return ConfigSource::Global(path);
        }

        ConfigSource::Default
    }
}

/// Loads the configuration a source points at.
///
/// # Errors
///
/// Returns an error if the file cannot be read or is not valid TOML.
pub fn load(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        tracing::debug!("No config file found, using defaults");
        return Ok(Config::default());
    };
    if matches!(source, ConfigSource::Global(_)) {
        tracing::info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn resolver(global: Option<&Path>) -> ConfigResolver {
        ConfigResolver::with_global_dir(global.map(Path::to_path_buf))
    }

    #[test]
    fn explicit_path_wins_without_existence_check() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join("ood-lint.toml"), "").unwrap();

        let source = resolver(None).resolve(project.path(), Some(Path::new("/missing.toml")));
        assert_eq!(source, ConfigSource::Explicit(PathBuf::from("/missing.toml")));
        assert!(load(&source).is_err());
    }

    #[test]
    fn project_config_names_in_order() {
        let project = TempDir::new().unwrap();
        fs::write(project.path().join(".ood-lint.toml"), "").unwrap();
        assert_eq!(
            resolver(None).resolve(project.path(), None),
            ConfigSource::Project(project.path().join(".ood-lint.toml"))
        );

        fs::write(project.path().join("ood-lint.toml"), "").unwrap();
        assert_eq!(
            resolver(None).resolve(project.path(), None),
            ConfigSource::Project(project.path().join("ood-lint.toml"))
        );
    }

    #[test]
    fn global_config_is_the_fallback() {
        let project = TempDir::new().unwrap();
        let global = TempDir::new().unwrap();
        assert_eq!(
            resolver(Some(global.path())).resolve(project.path(), None),
            ConfigSource::Default
        );

        fs::write(global.path().join("config.toml"), "preset = \"minimal\"\n").unwrap();
        let source = resolver(Some(global.path())).resolve(project.path(), None);
        assert_eq!(source, ConfigSource::Global(global.path().join("config.toml")));
        assert_eq!(load(&source).unwrap().preset.as_deref(), Some("minimal"));

        fs::write(project.path().join("ood-lint.toml"), "").unwrap();
        assert!(matches!(
            resolver(Some(global.path())).resolve(project.path(), None),
            ConfigSource::Project(_)
        ));
    }

    #[test]
    fn defaults_load_without_a_file() {
        let config = load(&ConfigSource::Default).unwrap();
        assert!(config.fail_on_violation);
        assert!(config.rules.is_none());
    }

    #[test]
    fn invalid_toml_is_reported() {
        let project = TempDir::new().unwrap();
        let path = project.path().join("ood-lint.toml");
        fs::write(&path, "preset = [").unwrap();
        let err = load(&ConfigSource::Project(path)).unwrap_err();
        assert!(err.to_string().contains("Failed to load config"));
    }
}
