//! Live chain access over JSON-RPC with a local signer.

use std::str::FromStr;
use std::time::Duration;

use alloy_primitives::{Address, TxHash, U256};
use alloy_provider::network::{Ethereum, EthereumWallet, Network, ReceiptResponse, TransactionBuilder};
use alloy_provider::{Provider, ProviderBuilder};
use alloy_signer_local::PrivateKeySigner;
use alloy_sol_types::sol;
use async_trait::async_trait;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{ConfigError, Error, Result, WorkflowError};
use crate::infrastructure::config::Config;
use crate::port::outbound::chain::{ChainReader, ChainWriter, ContractCall, Receipt};

/// Interval between receipt lookups.
const RECEIPT_POLL_INTERVAL: Duration = Duration::from_secs(2);

// ERC-20 views used for allowance and balance reads
sol! {
    #[sol(rpc)]
    contract IERC20Views {
        function allowance(address owner, address spender) external view returns (uint256);
        function balanceOf(address account) external view returns (uint256);
    }
}

/// Chain adapter signing with a local private key.
pub struct EvmChain {
    signer: PrivateKeySigner,
    rpc_url: Url,
}

impl EvmChain {
    /// Create an adapter for `rpc_url` signing with `private_key`.
    ///
    /// # Errors
    ///
    /// Returns an error if the private key is missing or invalid.
    pub fn new(private_key: &str, rpc_url: Url) -> Result<Self> {
        if private_key.trim().is_empty() {
            return Err(ConfigError::MissingField {
                field: "WALLET_PRIVATE_KEY",
            }
            .into());
        }

        let signer =
            PrivateKeySigner::from_str(private_key.trim()).map_err(|e| ConfigError::InvalidValue {
                field: "WALLET_PRIVATE_KEY",
                reason: e.to_string(),
            })?;

        Ok(Self { signer, rpc_url })
    }

    /// Create an adapter from the loaded configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no private key is set or the RPC URL is invalid.
    pub fn from_config(config: &Config) -> Result<Self> {
        let key = config
            .wallet
            .signing_key()
            .ok_or(ConfigError::MissingField {
                field: "WALLET_PRIVATE_KEY",
            })?;
        Self::new(key, config.chain.rpc_url()?)
    }
}

#[async_trait]
impl ChainReader for EvmChain {
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let erc20 = IERC20Views::new(token, &provider);
        let allowance: U256 = erc20
            .allowance(owner, spender)
            .call()
            .await
            .map_err(|e| Error::Connection(format!("Failed to get allowance: {e}")))?;
        debug!(%token, %spender, %allowance, "Fetched allowance");
        Ok(allowance)
    }

    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());
        let erc20 = IERC20Views::new(token, &provider);
        let balance: U256 = erc20
            .balanceOf(owner)
            .call()
            .await
            .map_err(|e| Error::Connection(format!("Failed to get balance: {e}")))?;
        Ok(balance)
    }
}

#[async_trait]
impl ChainWriter for EvmChain {
    async fn submit(&self, call: &ContractCall) -> Result<TxHash> {
        let wallet = EthereumWallet::from(self.signer.clone());
        let provider = ProviderBuilder::new()
            .wallet(wallet)
            .connect_http(self.rpc_url.clone());

        let request = <Ethereum as Network>::TransactionRequest::default()
            .with_to(call.to)
            .with_input(call.data.clone());

        let pending = provider.send_transaction(request).await.map_err(|e| {
            WorkflowError::SubmissionFailed(format!("Failed to send {}: {e}", call.kind))
        })?;
        let hash = *pending.tx_hash();

        info!(kind = %call.kind, to = %call.to, hash = %hash, "Transaction submitted");
        Ok(hash)
    }

    async fn confirmation(&self, hash: TxHash) -> Result<Receipt> {
        let provider = ProviderBuilder::new().connect_http(self.rpc_url.clone());

        // Inclusion has no deadline and lookup failures are retried.
        let mut interval = tokio::time::interval(RECEIPT_POLL_INTERVAL);
        let mut failures: u32 = 0;
        let receipt = loop {
            interval.tick().await;
            match provider.get_transaction_receipt(hash).await {
                Ok(Some(receipt)) => {
                    break Receipt {
                        hash,
                        success: receipt.status(),
                        block_number: receipt.block_number(),
                    };
                }
                Ok(None) => failures = 0,
                Err(e) => {
                    failures += 1;
                    warn!(hash = %hash, failures, error = %e, "Receipt lookup failed, polling again");
                }
            }
        };

        info!(
            hash = %hash,
            success = receipt.success,
            block = ?receipt.block_number,
            "Transaction mined"
        );
        Ok(receipt)
    }

    fn account(&self) -> Address {
        self.signer.address()
    }
}

impl std::fmt::Debug for EvmChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EvmChain")
            .field("account", &self.signer.address())
            .field("rpc_url", &self.rpc_url.as_str())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Well-known development key (anvil account 0)
    const DEV_KEY: &str = "0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80";

    fn rpc() -> Url {
        "http://127.0.0.1:8545".parse().unwrap()
    }

    #[test]
    fn derives_account_from_key() {
        let chain = EvmChain::new(DEV_KEY, rpc()).unwrap();
        assert_eq!(
            chain.account(),
            "0xf39Fd6e51aad88F6F4ce6aB8827279cffFb92266"
                .parse::<Address>()
                .unwrap()
        );
    }

    #[test]
    fn empty_key_is_missing() {
        let err = EvmChain::new("  ", rpc()).unwrap_err();
        assert!(matches!(
            err,
            Error::Config(ConfigError::MissingField { field: "WALLET_PRIVATE_KEY" })
        ));
    }

    #[test]
    fn malformed_key_is_invalid() {
        assert!(EvmChain::new("0x1234", rpc()).is_err());
    }

    #[test]
    fn debug_hides_key() {
        let chain = EvmChain::new(DEV_KEY, rpc()).unwrap();
        assert!(!format!("{chain:?}").contains("ac0974"));
    }
}
