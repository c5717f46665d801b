//! Chain access ports.
//!
//! The workflow core depends on exactly two capabilities: reading view data
//! (allowances, balances) and submitting transactions whose confirmation is
//! observed later by hash.

use alloy_primitives::{Address, Bytes, TxHash, U256};
use async_trait::async_trait;

use crate::domain::transaction::TransactionKind;
use crate::error::Result;

/// A contract function call ready for signing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContractCall {
    /// Business meaning of the call, for records and logs.
    pub kind: TransactionKind,
    /// Target contract.
    pub to: Address,
    /// ABI-encoded calldata.
    pub data: Bytes,
}

impl ContractCall {
    #[must_use]
    pub fn new(kind: TransactionKind, to: Address, data: impl Into<Bytes>) -> Self {
        Self {
            kind,
            to,
            data: data.into(),
        }
    }
}

/// Outcome of a transaction once the network has included it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Receipt {
    pub hash: TxHash,
    /// `false` when the transaction was included but reverted.
    pub success: bool,
    pub block_number: Option<u64>,
}

/// Port for read-only view calls.
///
/// # Errors
///
/// Methods return [`Result`] for RPC or decoding failures.
#[async_trait]
pub trait ChainReader: Send + Sync {
    /// Current ERC-20 allowance of `owner` towards `spender`.
    async fn allowance(&self, token: Address, owner: Address, spender: Address) -> Result<U256>;

    /// Current ERC-20 balance of `owner`.
    async fn balance_of(&self, token: Address, owner: Address) -> Result<U256>;
}

/// Port for state-changing calls.
///
/// Implementations report a declined signer prompt as
/// [`WorkflowError::UserRejected`](crate::error::WorkflowError::UserRejected)
/// so the workflow can present it differently from transport failures.
#[async_trait]
pub trait ChainWriter: Send + Sync {
    /// Sign and broadcast a call, returning its hash once the network accepts it.
    async fn submit(&self, call: &ContractCall) -> Result<TxHash>;

    /// Wait for the transaction to be included and return its receipt.
    ///
    /// There is no timeout here; the call resolves when the network does.
    async fn confirmation(&self, hash: TxHash) -> Result<Receipt>;

    /// Address that signs submitted calls.
    fn account(&self) -> Address;
}
