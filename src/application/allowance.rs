//! Allowance tracking shared across action adapters.
//!
//! Allowances are cached per (token, owner, spender) in an [`AllowanceBook`].
//! Every adapter that targets the same pair reads the same entry, so a
//! refetch triggered by one adapter is visible to all of them.

use std::sync::Arc;

use alloy_primitives::{Address, U256};
use dashmap::DashMap;
use tracing::{debug, warn};

use crate::domain::ApprovalRequirement;
use crate::error::Result;
use crate::port::outbound::chain::ChainReader;

/// Identity of one allowance value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AllowanceKey {
    pub token: Address,
    pub owner: Address,
    pub spender: Address,
}

/// Latest resolved allowance per key.
#[derive(Debug, Default)]
pub struct AllowanceBook {
    values: DashMap<AllowanceKey, U256>,
}

impl AllowanceBook {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn get(&self, key: &AllowanceKey) -> Option<U256> {
        self.values.get(key).map(|entry| *entry)
    }

    pub fn set(&self, key: AllowanceKey, value: U256) {
        self.values.insert(key, value);
    }

    /// Forget a value so nobody acts on it until the next read resolves.
    pub fn invalidate(&self, key: &AllowanceKey) {
        self.values.remove(key);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }
}

/// Allowance view for one (token, owner, spender) triple.
#[derive(Clone)]
pub struct AllowanceTracker {
    key: AllowanceKey,
    book: Arc<AllowanceBook>,
    reader: Arc<dyn ChainReader>,
}

impl AllowanceTracker {
    #[must_use]
    pub fn new(key: AllowanceKey, book: Arc<AllowanceBook>, reader: Arc<dyn ChainReader>) -> Self {
        Self { key, book, reader }
    }

    #[must_use]
    pub const fn key(&self) -> &AllowanceKey {
        &self.key
    }

    /// Latest resolved allowance, `None` until the first read completes.
    #[must_use]
    pub fn current(&self) -> Option<U256> {
        self.book.get(&self.key)
    }

    /// `false` while the allowance is unknown.
    #[must_use]
    pub fn needs_approval(&self, required: U256) -> bool {
        self.requirement(required).needs_approval()
    }

    #[must_use]
    pub fn requirement(&self, required: U256) -> ApprovalRequirement {
        ApprovalRequirement::new(self.key.token, self.key.spender, required)
            .with_allowance(self.current())
    }

    /// Read the allowance from chain and publish it to the book.
    ///
    /// # Errors
    ///
    /// Returns an error if the chain read fails; the cached value is left as is.
    pub async fn refresh(&self) -> Result<U256> {
        let value = self
            .reader
            .allowance(self.key.token, self.key.owner, self.key.spender)
            .await
            .inspect_err(|e| {
                warn!(token = %self.key.token, spender = %self.key.spender, error = %e, "Allowance read failed");
            })?;
        debug!(token = %self.key.token, spender = %self.key.spender, allowance = %value, "Allowance refreshed");
        self.book.set(self.key, value);
        Ok(value)
    }

    /// Drop the cached value.
    pub fn invalidate(&self) {
        self.book.invalidate(&self.key);
    }
}

impl std::fmt::Debug for AllowanceTracker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AllowanceTracker")
            .field("key", &self.key)
            .field("current", &self.current())
            .finish_non_exhaustive()
    }
}
