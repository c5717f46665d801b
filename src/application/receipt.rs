//! Waiting for inclusion of an accepted transaction.

use std::time::Duration;

use alloy_primitives::TxHash;
use tracing::warn;

use crate::error::WorkflowError;
use crate::port::outbound::chain::{ChainWriter, Receipt};

/// Pause before asking again after a failed receipt lookup.
pub const RECEIPT_RETRY_DELAY: Duration = Duration::from_secs(2);

/// Wait until `hash` is included.
///
/// Transport errors never end the wait: the transaction is already on the
/// network and may still be mined. Any other failure is reported against
/// the hash.
///
/// # Errors
///
/// Returns [`WorkflowError::ConfirmationFailed`] for non-transient errors.
/// A reverted receipt is returned as `Ok` with `success == false`.
pub async fn await_receipt(writer: &dyn ChainWriter, hash: TxHash) -> Result<Receipt, WorkflowError> {
    let mut attempt: u32 = 0;
    loop {
        match writer.confirmation(hash).await {
            Ok(receipt) => return Ok(receipt),
            Err(err) if err.is_transient() => {
                attempt += 1;
                warn!(hash = %hash, attempt, error = %err, "Receipt lookup failed, retrying");
                tokio::time::sleep(RECEIPT_RETRY_DELAY).await;
            }
            Err(err) => return Err(err.into_confirmation(hash)),
        }
    }
}
