//! Approval submission and its lifecycle.

use std::sync::Arc;

use alloy_primitives::{Address, TxHash, U256};
use alloy_sol_types::SolCall;
use parking_lot::Mutex;
use serde::Serialize;
use tracing::info;

use super::contracts::IERC20;
use super::receipt::await_receipt;
use crate::domain::TransactionKind;
use crate::error::{Result, WorkflowError};
use crate::port::outbound::chain::{ChainWriter, ContractCall, Receipt};

/// Where the latest approval request stands.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
enum Phase {
    #[default]
    Idle,
    /// Waiting for the signer.
    Pending,
    /// Hash known, waiting for inclusion.
    Confirming(TxHash),
    Confirmed(TxHash),
    Failed,
}

/// Projection of the latest approval request.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ApprovalLifecycle {
    pub is_pending: bool,
    pub is_confirming: bool,
    pub is_confirmed: bool,
    pub hash: Option<TxHash>,
}

#[derive(Debug, Default)]
struct State {
    /// Bumped on every submission so results of older requests are dropped.
    generation: u64,
    phase: Phase,
}

/// Issues ERC-20 approvals for one (token, spender) pair.
///
/// Each call to [`submit_approval`](Self::submit_approval) replaces the
/// tracked lifecycle; confirmations that arrive for a superseded request do
/// not touch it.
#[derive(Clone)]
pub struct ApprovalSubmitter {
    writer: Arc<dyn ChainWriter>,
    token: Address,
    spender: Address,
    state: Arc<Mutex<State>>,
}

impl ApprovalSubmitter {
    #[must_use]
    pub fn new(writer: Arc<dyn ChainWriter>, token: Address, spender: Address) -> Self {
        Self {
            writer,
            token,
            spender,
            state: Arc::new(Mutex::new(State::default())),
        }
    }

    /// Calldata-level request for `approve(spender, amount)` on the token.
    #[must_use]
    pub fn approval_call(&self, amount: U256) -> ContractCall {
        let data = IERC20::approveCall {
            spender: self.spender,
            amount,
        }
        .abi_encode();
        ContractCall::new(TransactionKind::Approval, self.token, data)
    }

    /// Ask the signer to approve `amount`, returning the accepted hash.
    ///
    /// # Errors
    ///
    /// Propagates [`WorkflowError::UserRejected`] when the signer declines and
    /// [`WorkflowError::SubmissionFailed`] for anything else.
    pub async fn submit_approval(&self, amount: U256) -> Result<TxHash> {
        let generation = {
            let mut state = self.state.lock();
            state.generation += 1;
            state.phase = Phase::Pending;
            state.generation
        };

        info!(token = %self.token, spender = %self.spender, amount = %amount, "Requesting approval");
        let result = self.writer.submit(&self.approval_call(amount)).await;

        let mut state = self.state.lock();
        let current = state.generation == generation;
        match result {
            Ok(hash) => {
                if current {
                    state.phase = Phase::Confirming(hash);
                }
                Ok(hash)
            }
            Err(err) => {
                if current {
                    state.phase = Phase::Failed;
                }
                Err(err.into_workflow().into())
            }
        }
    }

    /// Wait for an approval transaction to be included.
    ///
    /// Transport errors while polling are retried; the lifecycle stays in
    /// the confirming phase meanwhile.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::ConfirmationFailed`] if the approval reverted
    /// or its receipt could not be read.
    pub async fn await_confirmation(&self, hash: TxHash) -> Result<Receipt> {
        let result = await_receipt(self.writer.as_ref(), hash).await;

        let mut state = self.state.lock();
        let tracked = state.phase == Phase::Confirming(hash);
        match result {
            Ok(receipt) if receipt.success => {
                if tracked {
                    state.phase = Phase::Confirmed(hash);
                }
                Ok(receipt)
            }
            Ok(_) => {
                if tracked {
                    state.phase = Phase::Failed;
                }
                Err(WorkflowError::ConfirmationFailed {
                    hash,
                    reason: "approval reverted".to_string(),
                }
                .into())
            }
            Err(err) => {
                if tracked {
                    state.phase = Phase::Failed;
                }
                Err(err.into())
            }
        }
    }

    #[must_use]
    pub fn lifecycle(&self) -> ApprovalLifecycle {
        match self.state.lock().phase {
            Phase::Idle | Phase::Failed => ApprovalLifecycle::default(),
            Phase::Pending => ApprovalLifecycle {
                is_pending: true,
                ..ApprovalLifecycle::default()
            },
            Phase::Confirming(hash) => ApprovalLifecycle {
                is_confirming: true,
                hash: Some(hash),
                ..ApprovalLifecycle::default()
            },
            Phase::Confirmed(hash) => ApprovalLifecycle {
                is_confirmed: true,
                hash: Some(hash),
                ..ApprovalLifecycle::default()
            },
        }
    }
}

impl std::fmt::Debug for ApprovalSubmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ApprovalSubmitter")
            .field("token", &self.token)
            .field("spender", &self.spender)
            .field("lifecycle", &self.lifecycle())
            .finish_non_exhaustive()
    }
}
