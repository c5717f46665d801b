//! Spending-allowance requirement for an action.

use alloy_primitives::{Address, U256};

/// What a main action needs the spender to be allowed to move.
///
/// `current_allowance` is `None` until the chain read resolves. While it is
/// unknown the requirement never reports that an approval is needed, so no
/// approval prompt is shown before data loads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ApprovalRequirement {
    pub token: Address,
    pub spender: Address,
    pub required_amount: U256,
    pub current_allowance: Option<U256>,
}

impl ApprovalRequirement {
    #[must_use]
    pub const fn new(token: Address, spender: Address, required_amount: U256) -> Self {
        Self {
            token,
            spender,
            required_amount,
            current_allowance: None,
        }
    }

    /// Same requirement with a resolved allowance.
    #[must_use]
    pub const fn with_allowance(mut self, allowance: Option<U256>) -> Self {
        self.current_allowance = allowance;
        self
    }

    #[must_use]
    pub fn needs_approval(&self) -> bool {
        self.current_allowance
            .is_some_and(|allowance| self.required_amount > allowance)
    }

    /// Amount still missing from the allowance, if known.
    #[must_use]
    pub fn shortfall(&self) -> Option<U256> {
        self.current_allowance
            .map(|allowance| self.required_amount.saturating_sub(allowance))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn requirement(required: u64) -> ApprovalRequirement {
        ApprovalRequirement::new(
            Address::repeat_byte(0x11),
            Address::repeat_byte(0x22),
            U256::from(required),
        )
    }

    #[test]
    fn unknown_allowance_never_needs_approval() {
        assert!(!requirement(100).needs_approval());
        assert_eq!(requirement(100).shortfall(), None);
    }

    #[test]
    fn needs_approval_when_required_exceeds_allowance() {
        let req = requirement(100).with_allowance(Some(U256::ZERO));
        assert!(req.needs_approval());
        assert_eq!(req.shortfall(), Some(U256::from(100)));
    }

    #[test]
    fn equal_allowance_is_sufficient() {
        let req = requirement(100).with_allowance(Some(U256::from(100)));
        assert!(!req.needs_approval());
    }

    #[test]
    fn larger_allowance_is_sufficient() {
        let req = requirement(100).with_allowance(Some(U256::from(150)));
        assert!(!req.needs_approval());
        assert_eq!(req.shortfall(), Some(U256::ZERO));
    }
}
