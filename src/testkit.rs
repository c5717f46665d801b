//! In-memory chain for tests.
//!
//! [`ScriptedChain`] implements both chain ports. Each submission consumes
//! the next [`SubmitScript`] (accepting when the queue is empty) and records
//! the call so tests can assert which primitives were invoked.

use std::collections::VecDeque;

use alloy_primitives::{Address, TxHash, U256};
use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::watch;

use crate::domain::TransactionKind;
use crate::error::{Error, Result, WorkflowError};
use crate::port::outbound::chain::{ChainReader, ChainWriter, ContractCall, Receipt};

/// Scripted behaviour of one submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmitScript {
    /// Accepted and included successfully.
    Accept,
    /// Signer declines.
    Reject,
    /// Rejected by the network before inclusion.
    Fail(String),
    /// Accepted, then included with a failed status.
    Revert,
    /// Accepted; the receipt is withheld until [`ScriptedChain::release`].
    Stall,
    /// Accepted; the receipt lookup fails with a non-transport error.
    Unreadable,
}

#[derive(Debug, Default)]
struct Inner {
    allowance: U256,
    balance: U256,
    fail_reads: bool,
    reads: usize,
    scripts: VecDeque<SubmitScript>,
    submitted: Vec<ContractCall>,
    outcomes: Vec<(TxHash, SubmitScript, ContractCall)>,
    confirmations: usize,
    flaky_confirmations: usize,
    nonce: u64,
}

/// Chain double driven by queued scripts.
#[derive(Debug)]
pub struct ScriptedChain {
    inner: Mutex<Inner>,
    released: watch::Sender<bool>,
}

impl Default for ScriptedChain {
    fn default() -> Self {
        Self::new()
    }
}

impl ScriptedChain {
    /// Signing account of every scripted chain.
    pub const ACCOUNT: Address = Address::new([0xac; 20]);

    #[must_use]
    pub fn new() -> Self {
        let (released, _) = watch::channel(false);
        Self {
            inner: Mutex::new(Inner::default()),
            released,
        }
    }

    pub fn set_allowance(&self, value: U256) {
        self.inner.lock().allowance = value;
    }

    pub fn set_balance(&self, value: U256) {
        self.inner.lock().balance = value;
    }

    pub fn fail_reads(&self, fail: bool) {
        self.inner.lock().fail_reads = fail;
    }

    /// Fail the next `count` receipt lookups with a transport error.
    pub fn fail_confirmations(&self, count: usize) {
        self.inner.lock().flaky_confirmations = count;
    }

    pub fn push_submit(&self, script: SubmitScript) {
        self.inner.lock().scripts.push_back(script);
    }

    /// Let every stalled receipt resolve.
    pub fn release(&self) {
        self.released.send_replace(true);
    }

    /// Calls handed to the signer, in order.
    #[must_use]
    pub fn submitted(&self) -> Vec<ContractCall> {
        self.inner.lock().submitted.clone()
    }

    /// Number of submitted calls of `kind`.
    #[must_use]
    pub fn submitted_count(&self, kind: TransactionKind) -> usize {
        self.inner
            .lock()
            .submitted
            .iter()
            .filter(|call| call.kind == kind)
            .count()
    }

    #[must_use]
    pub fn reads(&self) -> usize {
        self.inner.lock().reads
    }

    #[must_use]
    pub fn confirmations(&self) -> usize {
        self.inner.lock().confirmations
    }
}

#[async_trait]
impl ChainReader for ScriptedChain {
    async fn allowance(&self, _token: Address, _owner: Address, _spender: Address) -> Result<U256> {
        let mut inner = self.inner.lock();
        inner.reads += 1;
        if inner.fail_reads {
            return Err(Error::Connection("scripted read failure".into()));
        }
        Ok(inner.allowance)
    }

    async fn balance_of(&self, _token: Address, _owner: Address) -> Result<U256> {
        let mut inner = self.inner.lock();
        inner.reads += 1;
        if inner.fail_reads {
            return Err(Error::Connection("scripted read failure".into()));
        }
        Ok(inner.balance)
    }
}

#[async_trait]
impl ChainWriter for ScriptedChain {
    async fn submit(&self, call: &ContractCall) -> Result<TxHash> {
        let mut inner = self.inner.lock();
        inner.submitted.push(call.clone());
        let script = inner.scripts.pop_front().unwrap_or(SubmitScript::Accept);
        match script {
            SubmitScript::Reject => Err(WorkflowError::UserRejected.into()),
            SubmitScript::Fail(reason) => Err(WorkflowError::SubmissionFailed(reason).into()),
            accepted => {
                inner.nonce += 1;
                let hash = TxHash::left_padding_from(&inner.nonce.to_be_bytes());
                inner.outcomes.push((hash, accepted, call.clone()));
                Ok(hash)
            }
        }
    }

    async fn confirmation(&self, hash: TxHash) -> Result<Receipt> {
        let (script, call) = {
            let mut inner = self.inner.lock();
            inner.confirmations += 1;
            if inner.flaky_confirmations > 0 {
                inner.flaky_confirmations -= 1;
                return Err(Error::Connection("502 bad gateway".into()));
            }
            inner
                .outcomes
                .iter()
                .find(|(h, _, _)| *h == hash)
                .map(|(_, script, call)| (script.clone(), call.clone()))
                .unzip()
        };
        let (Some(script), Some(call)) = (script, call) else {
            return Err(Error::Parse(format!("unknown transaction {hash}")));
        };

        if script == SubmitScript::Unreadable {
            return Err(Error::Parse(format!("malformed receipt for {hash}")));
        }
        if script == SubmitScript::Stall {
            let mut released = self.released.subscribe();
            let _ = released.wait_for(|released| *released).await;
        }

        let success = script != SubmitScript::Revert;
        // An included approval becomes the new allowance, as on chain.
        if success && call.kind == TransactionKind::Approval && call.data.len() >= 32 {
            let amount = U256::from_be_slice(&call.data[call.data.len() - 32..]);
            self.inner.lock().allowance = amount;
        }

        Ok(Receipt {
            hash,
            success,
            block_number: Some(1),
        })
    }

    fn account(&self) -> Address {
        Self::ACCOUNT
    }
}
