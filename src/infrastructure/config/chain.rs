//! Chain connection settings.

use serde::Deserialize;
use url::Url;

use crate::domain::amount::MAX_DECIMALS;
use crate::domain::ExplorerLink;
use crate::error::ConfigError;

/// Chain connection configuration (`[chain]`).
#[derive(Debug, Clone, Deserialize)]
pub struct ChainConfig {
    /// JSON-RPC endpoint. Overridden by `RPC_URL`.
    #[serde(default = "default_rpc_url")]
    pub rpc_url: String,

    #[serde(default = "default_chain_id")]
    pub chain_id: u64,

    /// Block explorer base URL used for transaction links.
    #[serde(default)]
    pub explorer_url: Option<String>,

    /// Decimals of the payment token.
    #[serde(default = "default_token_decimals")]
    pub token_decimals: u32,
}

fn default_rpc_url() -> String {
    "http://127.0.0.1:8545".to_string()
}

const fn default_chain_id() -> u64 {
    31337
}

const fn default_token_decimals() -> u32 {
    18
}

impl Default for ChainConfig {
    fn default() -> Self {
        Self {
            rpc_url: default_rpc_url(),
            chain_id: default_chain_id(),
            explorer_url: None,
            token_decimals: default_token_decimals(),
        }
    }
}

impl ChainConfig {
    /// Parsed RPC endpoint.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `rpc_url` is not a URL.
    pub fn rpc_url(&self) -> Result<Url, ConfigError> {
        self.rpc_url
            .parse()
            .map_err(|e: url::ParseError| ConfigError::InvalidValue {
                field: "chain.rpc_url",
                reason: e.to_string(),
            })
    }

    /// Parsed explorer link, if configured.
    ///
    /// # Errors
    ///
    /// Returns `InvalidValue` if `explorer_url` is set but not a URL.
    pub fn explorer(&self) -> Result<Option<ExplorerLink>, ConfigError> {
        self.explorer_url
            .as_deref()
            .map(|raw| {
                ExplorerLink::parse(raw).map_err(|e| ConfigError::InvalidValue {
                    field: "chain.explorer_url",
                    reason: e.to_string(),
                })
            })
            .transpose()
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.rpc_url.is_empty() {
            return Err(ConfigError::MissingField {
                field: "chain.rpc_url",
            });
        }
        self.rpc_url()?;
        self.explorer()?;
        if self.chain_id == 0 {
            return Err(ConfigError::InvalidValue {
                field: "chain.chain_id",
                reason: "must be greater than 0".to_string(),
            });
        }
        if self.token_decimals > MAX_DECIMALS {
            return Err(ConfigError::InvalidValue {
                field: "chain.token_decimals",
                reason: format!("must be at most {MAX_DECIMALS}"),
            });
        }
        Ok(())
    }
}
