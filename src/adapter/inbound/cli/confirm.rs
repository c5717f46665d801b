//! Interactive signer prompt.

use std::sync::Arc;

use alloy_primitives::{Address, TxHash};
use async_trait::async_trait;
use dialoguer::Confirm;

use crate::error::{Error, Result, WorkflowError};
use crate::port::outbound::chain::{ChainWriter, ContractCall, Receipt};

/// Asks on the terminal before each signature, like a wallet popup.
///
/// Declining surfaces as [`WorkflowError::UserRejected`].
pub struct ConfirmingWriter {
    inner: Arc<dyn ChainWriter>,
}

impl ConfirmingWriter {
    #[must_use]
    pub fn new(inner: Arc<dyn ChainWriter>) -> Self {
        Self { inner }
    }
}

#[async_trait]
impl ChainWriter for ConfirmingWriter {
    async fn submit(&self, call: &ContractCall) -> Result<TxHash> {
        let prompt = format!("Sign {} transaction to {}?", call.kind.label(), call.to);
        let confirmed = tokio::task::spawn_blocking(move || {
            Confirm::new().with_prompt(prompt).default(false).interact()
        })
        .await
        .map_err(|e| Error::Io(std::io::Error::other(e.to_string())))??;

        if !confirmed {
            return Err(WorkflowError::UserRejected.into());
        }
        self.inner.submit(call).await
    }

    async fn confirmation(&self, hash: TxHash) -> Result<Receipt> {
        self.inner.confirmation(hash).await
    }

    fn account(&self) -> Address {
        self.inner.account()
    }
}
