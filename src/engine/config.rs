//! Engine configuration.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default name of the workflow attribute.
pub const DEFAULT_ATTRIBUTE: &str = "status";

/// What a progressive transit does when the actor may not contribute.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChargeDeniedPolicy {
    /// Return `TransitOutcome::Declined` and change nothing.
    #[default]
    Silent,
    /// Fail with `WorkflowError::AlreadyCharged`.
    Reject,
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse engine config: {0}")]
    Parse(String),

    #[error("Failed to encode engine config: {0}")]
    Encode(String),

    #[error("Invalid engine config: {0}")]
    Invalid(String),
}

/// Engine behaviour switches.
///
/// # Example
///
/// ```rust
/// use waymark::engine::{ChargeDeniedPolicy, EngineConfig};
///
/// let config = EngineConfig::from_toml_str(
///     r#"
///     attribute = "stage"
///     charge_denied = "reject"
///     "#,
/// )
/// .unwrap();
///
/// assert_eq!(config.attribute, "stage");
/// assert_eq!(config.charge_denied, ChargeDeniedPolicy::Reject);
/// assert!(!config.enforce_guards);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Name of the workflow attribute on the entity
    pub attribute: String,
    pub charge_denied: ChargeDeniedPolicy,
    /// Run guards, authorization and payload validation inside `transit`
    pub enforce_guards: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            attribute: DEFAULT_ATTRIBUTE.to_string(),
            charge_denied: ChargeDeniedPolicy::Silent,
            enforce_guards: false,
        }
    }
}

impl EngineConfig {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn to_toml_string(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Encode(e.to_string()))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.attribute.trim().is_empty() {
            return Err(ConfigError::Invalid("attribute must not be empty".into()));
        }
        Ok(())
    }
}
