//! Workflow timing and spend limits.

use std::time::Duration;

use rust_decimal::Decimal;
use serde::Deserialize;

use crate::error::ConfigError;

/// Workflow settings (`[workflow]`).
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowConfig {
    /// Seconds a terminal step stays visible before resetting to idle.
    #[serde(default = "default_reset_delay_secs")]
    pub reset_delay_secs: u64,
}

const fn default_reset_delay_secs() -> u64 {
    10
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            reset_delay_secs: default_reset_delay_secs(),
        }
    }
}

impl WorkflowConfig {
    #[must_use]
    pub const fn reset_delay(&self) -> Duration {
        Duration::from_secs(self.reset_delay_secs)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.reset_delay_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "workflow.reset_delay_secs",
                reason: "must be greater than 0".to_string(),
            });
        }
        Ok(())
    }
}

/// Spend limits (`[limits]`), in token units.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct LimitsConfig {
    /// Smallest accepted contribution.
    #[serde(default)]
    pub minimum_contribution: Decimal,
}

impl LimitsConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.minimum_contribution < Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "limits.minimum_contribution",
                reason: "must be 0 or greater".to_string(),
            });
        }
        Ok(())
    }
}
