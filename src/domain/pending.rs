//! Main action parked behind an approval.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

/// Arguments of the main action held while its approval confirms.
///
/// Consumed exactly once to submit the main action; cleared on every error
/// path so it can never be resubmitted by a late signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PendingAction {
    /// Target object on chain (project id, pool id).
    pub identifier: U256,
    pub amount: U256,
}

impl PendingAction {
    #[must_use]
    pub const fn new(identifier: U256, amount: U256) -> Self {
        Self { identifier, amount }
    }
}
