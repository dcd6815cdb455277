//! Rule presets and registry construction from configuration.

use std::str::FromStr;

use ood_lint_core::{Config, ConfigError, Rule, RuleRegistry};
use tracing::debug;

use crate::{
    no_direct_system_call, no_optional_constructor_dependency, no_setter_dependency_injection,
    side_effect_free_constructor, single_shape_return,
};

/// Preset configurations for ood-lint.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Preset {
    /// Every built-in rule.
    #[default]
    Recommended,
    /// Only the dependency-injection rules, for gradual adoption.
    Minimal,
}

impl Preset {
    /// Returns the rules for this preset, in catalog order.
    #[must_use]
    pub fn rules(self) -> Vec<Rule> {
        match self {
            Self::Recommended => all_rules(),
            Self::Minimal => vec![
                no_optional_constructor_dependency::RULE,
                no_setter_dependency_injection::RULE,
            ],
        }
    }

    /// The name used in configuration files.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Recommended => "recommended",
            Self::Minimal => "minimal",
        }
    }
}

impl FromStr for Preset {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recommended" => Ok(Self::Recommended),
            "minimal" => Ok(Self::Minimal),
            other => Err(ConfigError::UnknownPreset {
                name: other.to_string(),
            }),
        }
    }
}

/// Returns every built-in rule, in catalog order.
#[must_use]
pub fn all_rules() -> Vec<Rule> {
    vec![
        no_optional_constructor_dependency::RULE,
        no_setter_dependency_injection::RULE,
        no_direct_system_call::RULE,
        single_shape_return::RULE,
        side_effect_free_constructor::RULE,
    ]
}

/// Builds the enabled rule set for a configuration.
///
/// An explicit `rules` list wins over the preset; severity overrides are
/// applied last.
///
/// # Errors
///
/// Returns [`ConfigError`] for an unknown preset or an unknown rule id in
/// either the rule list or the severity table.
pub fn registry(config: &Config) -> Result<RuleRegistry, ConfigError> {
    let catalog = all_rules();
    let preset = config
        .preset
        .as_deref()
        .map(Preset::from_str)
        .transpose()?
        .unwrap_or_default();

    let registry = match &config.rules {
        Some(ids) => RuleRegistry::select(&catalog, ids)?,
        None => RuleRegistry::new(preset.rules()),
    };
    let registry = registry.with_severity_overrides(&catalog, &config.severity)?;

    debug!(
        "Enabled rules: {:?}",
        registry.all_rules().iter().map(|r| r.id).collect::<Vec<_>>()
    );
    Ok(registry)
}
