//! Configuration types for the definition composer

use serde::{Deserialize, Serialize};

use crate::error::{DefinitionError, Result};

/// What the composer does when handed a record that is already composed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecompositionPolicy {
    /// Leave the record untouched and report success
    #[default]
    Ignore,
    /// Fail with [`DefinitionError::AlreadyComposed`]
    Reject,
}

/// Main configuration for definition composition
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComposerConfig {
    /// Handling of a second composition request for the same record
    pub recomposition: RecompositionPolicy,

    /// Emit a trace event for every ancestor folded into a record
    pub trace_merges: bool,

    /// Run inheritable features declared by ancestors against the leaf
    pub inherit_features: bool,
}

impl Default for ComposerConfig {
    fn default() -> Self {
        Self {
            recomposition: RecompositionPolicy::Ignore,
            trace_merges: false,
            inherit_features: true,
        }
    }
}

impl ComposerConfig {
    /// Configuration suited to local development: merges are traced
    #[must_use]
    pub fn development() -> Self {
        Self {
            trace_merges: true,
            ..Self::default()
        }
    }

    /// Configuration for tests: a second composition is an error
    #[must_use]
    pub fn testing() -> Self {
        Self {
            recomposition: RecompositionPolicy::Reject,
            trace_merges: true,
            ..Self::default()
        }
    }

    /// Configuration for production builds
    #[must_use]
    pub fn production() -> Self {
        Self::default()
    }

    /// Load configuration from a YAML document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid YAML or has unknown values.
    pub fn from_yaml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(content)
            .map_err(|e| DefinitionError::config(format!("invalid YAML configuration: {e}")))
    }

    /// Load configuration from a JSON document
    ///
    /// # Errors
    ///
    /// Returns an error if the document is not valid JSON or has unknown values.
    pub fn from_json_str(content: &str) -> Result<Self> {
        serde_json::from_str(content)
            .map_err(|e| DefinitionError::config(format!("invalid JSON configuration: {e}")))
    }

    /// Serialize the configuration to YAML
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_yaml(&self) -> Result<String> {
        Ok(serde_yaml::to_string(self)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = ComposerConfig::default();
        assert_eq!(config.recomposition, RecompositionPolicy::Ignore);
        assert!(!config.trace_merges);
        assert!(config.inherit_features);
        assert_eq!(ComposerConfig::production(), config);
    }

    #[test]
    fn test_partial_yaml_uses_defaults() -> anyhow::Result<()> {
        let config = ComposerConfig::from_yaml_str("recomposition: reject\n")?;
        assert_eq!(config.recomposition, RecompositionPolicy::Reject);
        assert!(config.inherit_features);

        let empty = ComposerConfig::from_yaml_str("   ")?;
        assert_eq!(empty, ComposerConfig::default());
        Ok(())
    }

    #[test]
    fn test_json_round_trip_of_preset() -> anyhow::Result<()> {
        let config = ComposerConfig::from_json_str(
            r#"{"recomposition": "reject", "trace_merges": true, "inherit_features": false}"#,
        )?;
        assert_eq!(config.recomposition, RecompositionPolicy::Reject);
        assert!(config.trace_merges);
        assert!(!config.inherit_features);

        let yaml = ComposerConfig::testing().to_yaml()?;
        assert_eq!(ComposerConfig::from_yaml_str(&yaml)?, ComposerConfig::testing());
        Ok(())
    }

    #[test]
    fn test_invalid_policy_is_config_error() {
        let err = ComposerConfig::from_yaml_str("recomposition: sometimes\n").unwrap_err();
        assert!(matches!(err, DefinitionError::ConfigError(_)));
    }
}
