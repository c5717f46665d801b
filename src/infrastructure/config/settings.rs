//! Application configuration loading and validation.
//!
//! Provides the main [`Config`] struct that aggregates all application settings.
//! Configuration is loaded from a TOML file with environment variable overrides
//! for `WALLET_PRIVATE_KEY` and `RPC_URL`.
//!
//! # Example
//!
//! ```no_run
//! use launchflow::infrastructure::config::Config;
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = Config::load("launchflow.toml")?;
//!     config.init_logging();
//!     Ok(())
//! }
//! ```

use std::path::Path;

use alloy_primitives::U256;
use serde::Deserialize;

use super::chain::ChainConfig;
use super::contracts::ContractsConfig;
use super::logging::LoggingConfig;
use super::wallet::WalletConfig;
use super::workflow::{LimitsConfig, WorkflowConfig};
use crate::application::workflow::EngineSettings;
use crate::domain::amount::to_base_units;
use crate::error::{ConfigError, Result};

/// Main application configuration.
///
/// Every section is optional; an empty file yields a local-devnet setup
/// with no contracts configured.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Logging and tracing configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    #[serde(default)]
    pub chain: ChainConfig,

    #[serde(default)]
    pub contracts: ContractsConfig,

    #[serde(default)]
    pub workflow: WorkflowConfig,

    #[serde(default)]
    pub limits: LimitsConfig,

    /// Private key is loaded from `WALLET_PRIVATE_KEY` environment variable.
    #[serde(default)]
    pub wallet: WalletConfig,
}

impl Config {
    /// Parse configuration from TOML content and apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML content is malformed or validation fails.
    pub fn parse_toml(content: &str) -> Result<Self> {
        let mut config: Self = toml::from_str(content).map_err(ConfigError::Parse)?;

        // Secrets never come from the config file
        config.wallet.private_key = std::env::var("WALLET_PRIVATE_KEY").ok();
        if let Ok(rpc_url) = std::env::var("RPC_URL") {
            if !rpc_url.is_empty() {
                config.chain.rpc_url = rpc_url;
            }
        }

        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, the content is malformed,
    /// or validation fails.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;
        Self::parse_toml(&content)
    }

    /// Load `path` if it exists, otherwise start from defaults.
    ///
    /// # Errors
    ///
    /// Same as [`Config::load`] when the file exists.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self> {
        if path.as_ref().exists() {
            Self::load(path)
        } else {
            Self::parse_toml("")
        }
    }

    fn validate(&self) -> Result<()> {
        self.logging.validate()?;
        self.chain.validate()?;
        self.workflow.validate()?;
        self.limits.validate()?;
        Ok(())
    }

    /// Engine settings derived from `[workflow]` and `[chain]`.
    ///
    /// # Errors
    ///
    /// Returns an error if the explorer URL is invalid.
    pub fn engine_settings(&self) -> Result<EngineSettings> {
        Ok(EngineSettings {
            reset_delay: self.workflow.reset_delay(),
            explorer: self.chain.explorer()?,
        })
    }

    /// Minimum contribution in base units of the payment token.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured minimum cannot be represented.
    pub fn minimum_contribution(&self) -> Result<U256> {
        let units = to_base_units(self.limits.minimum_contribution, self.chain.token_decimals)?;
        Ok(units)
    }

    /// Initialize logging with the configured settings.
    pub fn init_logging(&self) {
        self.logging.init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use std::time::Duration;

    #[test]
    fn empty_file_uses_defaults() {
        let config = Config::parse_toml("").unwrap();
        assert_eq!(config.workflow.reset_delay(), Duration::from_secs(10));
        assert_eq!(config.chain.token_decimals, 18);
        assert_eq!(config.logging.format, "pretty");
    }

    #[test]
    fn parses_sections() {
        let config = Config::parse_toml(
            r#"
            [chain]
            chain_id = 8453
            explorer_url = "https://basescan.org"
            token_decimals = 6

            [contracts]
            payment_token = "0x0101010101010101010101010101010101010101"
            launchpad = "0x0202020202020202020202020202020202020202"
            amm_router = "0x0303030303030303030303030303030303030303"
            lp_token = "0x0404040404040404040404040404040404040404"

            [workflow]
            reset_delay_secs = 4

            [limits]
            minimum_contribution = "2.5"
            "#,
        )
        .unwrap();

        assert_eq!(config.chain.chain_id, 8453);
        assert!(config.contracts.resolve().is_ok());
        let settings = config.engine_settings().unwrap();
        assert_eq!(settings.reset_delay, Duration::from_secs(4));
        assert!(settings.explorer.is_some());
        assert_eq!(config.limits.minimum_contribution, dec!(2.5));
        assert_eq!(config.minimum_contribution().unwrap(), U256::from(2_500_000u64));
    }

    #[test]
    fn zero_reset_delay_rejected() {
        let err = Config::parse_toml("[workflow]\nreset_delay_secs = 0").unwrap_err();
        assert!(err.to_string().contains("workflow.reset_delay_secs"));
    }

    #[test]
    fn malformed_toml() {
        assert!(Config::parse_toml("[chain\n").is_err());
    }
}
