//! Transaction records tracked by a workflow run.

use std::fmt;

use alloy_primitives::TxHash;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Identifier of one workflow run.
///
/// Monotonic per engine; every chain signal carries the run it belongs to so
/// late signals from an earlier run can be told apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct RunId(u64);

impl RunId {
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "run-{}", self.0)
    }
}

/// Kind of on-chain transaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TransactionKind {
    Approval,
    Contribute,
    Deposit,
    Finalize,
    Refund,
    Withdraw,
    Swap,
    AddLiquidity,
    RemoveLiquidity,
}

impl TransactionKind {
    /// Stable kebab-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Approval => "approval",
            Self::Contribute => "contribute",
            Self::Deposit => "deposit",
            Self::Finalize => "finalize",
            Self::Refund => "refund",
            Self::Withdraw => "withdraw",
            Self::Swap => "swap",
            Self::AddLiquidity => "add-liquidity",
            Self::RemoveLiquidity => "remove-liquidity",
        }
    }

    /// Human-readable label for headlines and notifications.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Approval => "Approval",
            Self::Contribute => "Contribution",
            Self::Deposit => "Deposit",
            Self::Finalize => "Finalize",
            Self::Refund => "Refund",
            Self::Withdraw => "Withdrawal",
            Self::Swap => "Swap",
            Self::AddLiquidity => "Add liquidity",
            Self::RemoveLiquidity => "Remove liquidity",
        }
    }
}

impl fmt::Display for TransactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One submission attempt.
///
/// Records are replaced on each attempt, never mutated; the hash is absent
/// until the network accepts the transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransactionRecord {
    kind: TransactionKind,
    hash: Option<TxHash>,
    submitted_at: DateTime<Utc>,
}

impl TransactionRecord {
    /// Record an attempt that has been handed to the signer.
    #[must_use]
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            hash: None,
            submitted_at: Utc::now(),
        }
    }

    /// Return a copy of this record carrying the accepted hash.
    #[must_use]
    pub fn with_hash(&self, hash: TxHash) -> Self {
        Self {
            kind: self.kind,
            hash: Some(hash),
            submitted_at: self.submitted_at,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> TransactionKind {
        self.kind
    }

    #[must_use]
    pub const fn hash(&self) -> Option<TxHash> {
        self.hash
    }

    #[must_use]
    pub const fn submitted_at(&self) -> DateTime<Utc> {
        self.submitted_at
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn run_ids_are_monotonic() {
        let first = RunId::default();
        assert!(first.next() > first);
        assert_eq!(first.next().get(), 1);
        assert_eq!(first.next().to_string(), "run-1");
    }

    #[test]
    fn kind_serializes_kebab_case() {
        let json = serde_json::to_string(&TransactionKind::AddLiquidity).unwrap();
        assert_eq!(json, "\"add-liquidity\"");
        assert_eq!(TransactionKind::RemoveLiquidity.to_string(), "remove-liquidity");
    }

    #[test]
    fn with_hash_replaces_record() {
        let record = TransactionRecord::new(TransactionKind::Deposit);
        assert!(record.hash().is_none());

        let hash = TxHash::repeat_byte(0xab);
        let accepted = record.with_hash(hash);
        assert_eq!(accepted.hash(), Some(hash));
        assert_eq!(accepted.kind(), TransactionKind::Deposit);
        assert_eq!(accepted.submitted_at(), record.submitted_at());
        assert!(record.hash().is_none());
    }
}
