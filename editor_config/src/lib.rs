//! # Editor Session Configuration
//!
//! Typed configuration for one editor session.
//!
//! ## Philosophy
//!
//! - **Layered**: Built-in defaults with JSON overrides on top
//! - **Typed**: Every setting is a real field, never a string lookup
//! - **Validated**: Out-of-range values are rejected at load time
//! - **Not persisted**: Loading is supported; saving belongs to the host
//!
//! ## Example
//!
//! ```ignore
//! let config = SessionConfig::from_json(r#"{"execution": {"step_delay_ms": 10}}"#)?;
//! let analyzer = SourceAnalyzer::new(config.builtins(), config.analysis);
//! ```

use serde::{Deserialize, Serialize};
use serde_json::Value;
use services_analysis::{AnalysisOptions, Builtins, BuiltinsData};
use services_execution::ControllerOptions;
use thiserror::Error;
use tracing::debug;

/// Upper bound for `execution.step_delay_ms`
pub const MAX_STEP_DELAY_MS: u64 = 10_000;

/// Configuration error
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Invalid configuration JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Configuration overrides must be a JSON object")]
    NotAnObject,

    #[error("Step delay of {0} ms exceeds the limit of {} ms", MAX_STEP_DELAY_MS)]
    StepDelayTooLarge(u64),

    #[error("Unsupported configuration version: {0}")]
    UnsupportedVersion(u32),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration of one editor session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub version: u32,
    pub analysis: AnalysisOptions,
    pub execution: ControllerOptions,
    /// Extra built-ins merged into the standard dataset
    pub builtins: Option<BuiltinsData>,
}

impl SessionConfig {
    pub const CURRENT_VERSION: u32 = 1;

    /// Parses a configuration, defaulting every missing field
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Applies a JSON object of overrides on top of this configuration
    ///
    /// Nested objects merge key by key; any other value replaces the current
    /// one outright.
    pub fn with_overrides(&self, json: &str) -> ConfigResult<Self> {
        let overrides: Value = serde_json::from_str(json)?;
        if !overrides.is_object() {
            return Err(ConfigError::NotAnObject);
        }
        let mut merged = serde_json::to_value(self)?;
        merge(&mut merged, overrides);
        let config: Self = serde_json::from_value(merged)?;
        config.validate()?;
        debug!(step_delay_ms = config.execution.step_delay_ms, "configuration overridden");
        Ok(config)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if self.version != Self::CURRENT_VERSION {
            return Err(ConfigError::UnsupportedVersion(self.version));
        }
        if self.execution.step_delay_ms > MAX_STEP_DELAY_MS {
            return Err(ConfigError::StepDelayTooLarge(self.execution.step_delay_ms));
        }
        Ok(())
    }

    /// Standard built-ins plus the configured extras
    pub fn builtins(&self) -> Builtins {
        let mut builtins = Builtins::standard();
        if let Some(extra) = &self.builtins {
            builtins.extend(extra.clone());
        }
        builtins
    }

    pub fn to_json(&self) -> ConfigResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            version: Self::CURRENT_VERSION,
            analysis: AnalysisOptions::default(),
            execution: ControllerOptions::default(),
            builtins: None,
        }
    }
}

fn merge(base: &mut Value, patch: Value) {
    match (base, patch) {
        (Value::Object(base), Value::Object(patch)) => {
            for (key, value) in patch {
                match base.get_mut(&key) {
                    Some(slot) => merge(slot, value),
                    None => {
                        base.insert(key, value);
                    }
                }
            }
        }
        (slot, value) => *slot = value,
    }
}
