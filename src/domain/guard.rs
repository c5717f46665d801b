//! Per-run notification deduplication.
//!
//! The confirmation signal of the chain data layer may fire more than once
//! for the same transaction. The guard latches each notification category so
//! it is surfaced at most once per workflow run.

use serde::{Deserialize, Serialize};

/// User-facing notification kinds that are deduplicated per run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NotificationCategory {
    ApprovalSubmitted,
    ApprovalConfirmed,
    Submitted,
    Confirmed,
    Failed,
}

impl NotificationCategory {
    pub const ALL: [Self; 5] = [
        Self::ApprovalSubmitted,
        Self::ApprovalConfirmed,
        Self::Submitted,
        Self::Confirmed,
        Self::Failed,
    ];

    const fn bit(self) -> u8 {
        match self {
            Self::ApprovalSubmitted => 1 << 0,
            Self::ApprovalConfirmed => 1 << 1,
            Self::Submitted => 1 << 2,
            Self::Confirmed => 1 << 3,
            Self::Failed => 1 << 4,
        }
    }
}

/// Set of latched categories for the current run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct NotificationGuard {
    shown: u8,
}

impl NotificationGuard {
    #[must_use]
    pub const fn new() -> Self {
        Self { shown: 0 }
    }

    /// Returns `true` the first time a category is requested in this run.
    pub fn guard(&mut self, category: NotificationCategory) -> bool {
        let first = self.shown & category.bit() == 0;
        self.shown |= category.bit();
        first
    }

    /// Whether the category has already fired in this run.
    #[must_use]
    pub const fn has_shown(&self, category: NotificationCategory) -> bool {
        self.shown & category.bit() != 0
    }

    /// Clear every latch. Only called when a new run starts or on reset.
    pub fn reset_all(&mut self) {
        self.shown = 0;
    }
}
