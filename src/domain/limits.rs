//! Pre-flight amount and eligibility checks.
//!
//! Everything here is evaluated before the signer is contacted: a request
//! that fails these checks must never produce a wallet prompt.

use alloy_primitives::U256;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Domain eligibility supplied by the caller (e.g. "sale is open").
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Eligibility {
    pub permitted: bool,
    /// Shown in place of the action label when not permitted.
    pub reason: Option<String>,
}

impl Eligibility {
    #[must_use]
    pub const fn permitted() -> Self {
        Self {
            permitted: true,
            reason: None,
        }
    }

    #[must_use]
    pub fn denied(reason: impl Into<String>) -> Self {
        Self {
            permitted: false,
            reason: Some(reason.into()),
        }
    }

    /// # Errors
    ///
    /// Returns [`ValidationError::NotPermitted`] when the action is not allowed.
    pub fn check(&self) -> Result<(), ValidationError> {
        if self.permitted {
            return Ok(());
        }
        Err(ValidationError::NotPermitted {
            reason: self
                .reason
                .clone()
                .unwrap_or_else(|| "action unavailable".to_string()),
        })
    }
}

impl Default for Eligibility {
    fn default() -> Self {
        Self::permitted()
    }
}

/// Amount bounds for one request. Unset bounds are not enforced.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SpendLimits {
    pub minimum: Option<U256>,
    pub balance: Option<U256>,
    /// Funding goal minus what has been raised so far.
    pub goal_remaining: Option<U256>,
    /// Per-user maximum minus what this user already contributed.
    pub user_remaining: Option<U256>,
}

impl SpendLimits {
    #[must_use]
    pub const fn none() -> Self {
        Self {
            minimum: None,
            balance: None,
            goal_remaining: None,
            user_remaining: None,
        }
    }

    /// Limits derived from raw sale figures.
    ///
    /// Remaining amounts saturate at zero when contributions already exceed
    /// the goal or the per-user maximum.
    #[must_use]
    pub fn for_sale(
        minimum: U256,
        balance: U256,
        goal: U256,
        raised: U256,
        per_user_max: U256,
        contributed: U256,
    ) -> Self {
        Self {
            minimum: Some(minimum),
            balance: Some(balance),
            goal_remaining: Some(goal.saturating_sub(raised)),
            user_remaining: Some(per_user_max.saturating_sub(contributed)),
        }
    }

    /// The lesser of the goal and per-user remaining amounts.
    #[must_use]
    pub fn cap(&self) -> Option<U256> {
        match (self.goal_remaining, self.user_remaining) {
            (Some(goal), Some(user)) => Some(goal.min(user)),
            (Some(goal), None) => Some(goal),
            (None, user) => user,
        }
    }

    /// Validate an amount against every configured bound.
    ///
    /// # Errors
    ///
    /// Returns the first violated bound, checked in the order zero amount,
    /// minimum, balance, cap.
    pub fn validate(&self, amount: U256) -> Result<(), ValidationError> {
        if amount.is_zero() {
            return Err(ValidationError::ZeroAmount);
        }
        if let Some(minimum) = self.minimum {
            if amount < minimum {
                return Err(ValidationError::BelowMinimum { amount, minimum });
            }
        }
        if let Some(balance) = self.balance {
            if amount > balance {
                return Err(ValidationError::InsufficientBalance { amount, balance });
            }
        }
        if let Some(cap) = self.cap() {
            if amount > cap {
                return Err(ValidationError::CapExceeded { amount, cap });
            }
        }
        Ok(())
    }
}
