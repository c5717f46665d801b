//! Action adapters: one configuration object per contract call.
//!
//! The workflow engine is generic; an [`ActionAdapter`] tells it which call
//! to build, which token (if any) must be approved first, and how the modal
//! behaves for that flow.

use std::fmt;
use std::str::FromStr;

use alloy_primitives::{Address, U256};
use alloy_sol_types::SolCall;
use serde::{Deserialize, Serialize};

use super::contracts::{IAmmRouter, ILaunchpad};
use crate::domain::{
    Eligibility, ExplorerLink, ModalOptions, PendingAction, SpendLimits, TransactionKind,
};
use crate::error::ValidationError;
use crate::port::outbound::chain::ContractCall;

/// State-changing actions exposed to users.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ActionKind {
    Contribute,
    Deposit,
    Finalize,
    Refund,
    Withdraw,
    AddLiquidity,
    RemoveLiquidity,
}

impl ActionKind {
    pub const ALL: [Self; 7] = [
        Self::Contribute,
        Self::Deposit,
        Self::Finalize,
        Self::Refund,
        Self::Withdraw,
        Self::AddLiquidity,
        Self::RemoveLiquidity,
    ];

    #[must_use]
    pub const fn transaction_kind(self) -> TransactionKind {
        match self {
            Self::Contribute => TransactionKind::Contribute,
            Self::Deposit => TransactionKind::Deposit,
            Self::Finalize => TransactionKind::Finalize,
            Self::Refund => TransactionKind::Refund,
            Self::Withdraw => TransactionKind::Withdraw,
            Self::AddLiquidity => TransactionKind::AddLiquidity,
            Self::RemoveLiquidity => TransactionKind::RemoveLiquidity,
        }
    }

    /// Button label.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Contribute => "Contribute",
            Self::Deposit => "Deposit",
            Self::Finalize => "Finalize",
            Self::Refund => "Claim refund",
            Self::Withdraw => "Withdraw",
            Self::AddLiquidity => "Add liquidity",
            Self::RemoveLiquidity => "Remove liquidity",
        }
    }

    /// Whether the call moves tokens from the user and so carries an amount.
    #[must_use]
    pub const fn spends_tokens(self) -> bool {
        matches!(
            self,
            Self::Contribute | Self::Deposit | Self::AddLiquidity | Self::RemoveLiquidity
        )
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.transaction_kind().as_str()
    }
}

impl fmt::Display for ActionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ActionKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|kind| kind.as_str() == s)
            .ok_or_else(|| format!("unknown action '{s}'"))
    }
}

/// Contract addresses the adapters target.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Contracts {
    /// Token users pay with (contributions, deposits, liquidity).
    pub payment_token: Address,
    pub launchpad: Address,
    pub router: Address,
    /// Pool share token burned on liquidity removal.
    pub lp_token: Address,
}

/// Wiring of one action to its contract call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ActionAdapter {
    kind: ActionKind,
    target: Address,
    /// Token to approve before the call, with its spender.
    approval: Option<(Address, Address)>,
}

impl ActionAdapter {
    #[must_use]
    pub fn new(kind: ActionKind, contracts: &Contracts) -> Self {
        let (target, approval) = match kind {
            ActionKind::Contribute | ActionKind::Deposit => (
                contracts.launchpad,
                Some((contracts.payment_token, contracts.launchpad)),
            ),
            ActionKind::Finalize | ActionKind::Refund | ActionKind::Withdraw => {
                (contracts.launchpad, None)
            }
            ActionKind::AddLiquidity => (
                contracts.router,
                Some((contracts.payment_token, contracts.router)),
            ),
            ActionKind::RemoveLiquidity => (
                contracts.router,
                Some((contracts.lp_token, contracts.router)),
            ),
        };
        Self {
            kind,
            target,
            approval,
        }
    }

    #[must_use]
    pub const fn kind(&self) -> ActionKind {
        self.kind
    }

    #[must_use]
    pub const fn target(&self) -> Address {
        self.target
    }

    /// `(token, spender)` requiring an allowance, if the action spends tokens.
    #[must_use]
    pub const fn approval_target(&self) -> Option<(Address, Address)> {
        self.approval
    }

    /// Build the main contract call for a request.
    #[must_use]
    pub fn call(&self, action: &PendingAction) -> ContractCall {
        let id = action.identifier;
        let amount = action.amount;
        let data = match self.kind {
            ActionKind::Contribute => ILaunchpad::contributeCall {
                projectId: id,
                amount,
            }
            .abi_encode(),
            ActionKind::Deposit => ILaunchpad::depositCall {
                projectId: id,
                amount,
            }
            .abi_encode(),
            ActionKind::Finalize => ILaunchpad::finalizeCall { projectId: id }.abi_encode(),
            ActionKind::Refund => ILaunchpad::refundCall { projectId: id }.abi_encode(),
            ActionKind::Withdraw => ILaunchpad::withdrawCall { projectId: id }.abi_encode(),
            ActionKind::AddLiquidity => IAmmRouter::addLiquidityCall { poolId: id, amount }.abi_encode(),
            ActionKind::RemoveLiquidity => IAmmRouter::removeLiquidityCall {
                poolId: id,
                liquidity: amount,
            }
            .abi_encode(),
        };
        ContractCall::new(self.kind.transaction_kind(), self.target, data)
    }

    /// Pre-flight checks for a request. Never touches the chain.
    ///
    /// # Errors
    ///
    /// Returns the first failed eligibility or amount check.
    pub fn validate(&self, request: &ActionRequest) -> Result<(), ValidationError> {
        request.eligibility.check()?;
        if self.kind.spends_tokens() {
            request.limits.validate(request.amount)?;
        }
        Ok(())
    }

    /// Modal behaviour for this flow.
    ///
    /// Flows without token spending show a confirmation step with no side
    /// effects yet, so their modal may be closed from `Idle`.
    #[must_use]
    pub fn modal_options<'a>(&self, explorer: Option<&'a ExplorerLink>) -> ModalOptions<'a> {
        ModalOptions {
            closeable_when_idle: !self.kind.spends_tokens(),
            explorer,
        }
    }
}

/// One user request for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionRequest {
    /// Project or pool id.
    pub identifier: U256,
    /// Token amount in base units; ignored by actions that spend nothing.
    pub amount: U256,
    pub limits: SpendLimits,
    pub eligibility: Eligibility,
}

impl ActionRequest {
    #[must_use]
    pub fn new(identifier: U256, amount: U256) -> Self {
        Self {
            identifier,
            amount,
            limits: SpendLimits::none(),
            eligibility: Eligibility::permitted(),
        }
    }

    #[must_use]
    pub fn with_limits(mut self, limits: SpendLimits) -> Self {
        self.limits = limits;
        self
    }

    #[must_use]
    pub fn with_eligibility(mut self, eligibility: Eligibility) -> Self {
        self.eligibility = eligibility;
        self
    }

    #[must_use]
    pub const fn pending(&self) -> PendingAction {
        PendingAction::new(self.identifier, self.amount)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contracts() -> Contracts {
        Contracts {
            payment_token: Address::repeat_byte(1),
            launchpad: Address::repeat_byte(2),
            router: Address::repeat_byte(3),
            lp_token: Address::repeat_byte(4),
        }
    }

    #[test]
    fn spending_actions_require_approval() {
        for kind in ActionKind::ALL {
            let adapter = ActionAdapter::new(kind, &contracts());
            assert_eq!(
                adapter.approval_target().is_some(),
                kind.spends_tokens(),
                "{kind}"
            );
        }
    }

    #[test]
    fn liquidity_removal_approves_lp_token_to_router() {
        let adapter = ActionAdapter::new(ActionKind::RemoveLiquidity, &contracts());
        assert_eq!(
            adapter.approval_target(),
            Some((Address::repeat_byte(4), Address::repeat_byte(3)))
        );
        assert_eq!(adapter.target(), Address::repeat_byte(3));
    }

    #[test]
    fn contribute_call_encodes_selector_and_args() {
        let adapter = ActionAdapter::new(ActionKind::Contribute, &contracts());
        let call = adapter.call(&PendingAction::new(U256::from(9), U256::from(100)));

        assert_eq!(call.kind, TransactionKind::Contribute);
        assert_eq!(call.to, Address::repeat_byte(2));
        assert_eq!(&call.data[..4], ILaunchpad::contributeCall::SELECTOR.as_slice());
        assert_eq!(call.data.len(), 4 + 32 * 2);
        assert_eq!(U256::from_be_slice(&call.data[36..68]), U256::from(100));
    }

    #[test]
    fn finalize_ignores_amount_limits() {
        let adapter = ActionAdapter::new(ActionKind::Finalize, &contracts());
        let request = ActionRequest::new(U256::from(1), U256::ZERO).with_limits(SpendLimits {
            minimum: Some(U256::from(10)),
            ..SpendLimits::none()
        });
        assert!(adapter.validate(&request).is_ok());
    }

    #[test]
    fn eligibility_is_checked_first() {
        let adapter = ActionAdapter::new(ActionKind::Deposit, &contracts());
        let request = ActionRequest::new(U256::from(1), U256::ZERO)
            .with_eligibility(Eligibility::denied("sale not started"));
        assert_eq!(
            adapter.validate(&request),
            Err(ValidationError::NotPermitted {
                reason: "sale not started".into()
            })
        );
    }

    #[test]
    fn parses_kebab_case_names() {
        assert_eq!("add-liquidity".parse::<ActionKind>(), Ok(ActionKind::AddLiquidity));
        assert!("swap".parse::<ActionKind>().is_err());
    }

    #[test]
    fn only_non_spending_flows_close_from_idle() {
        assert!(ActionAdapter::new(ActionKind::Refund, &contracts())
            .modal_options(None)
            .closeable_when_idle);
        assert!(!ActionAdapter::new(ActionKind::Contribute, &contracts())
            .modal_options(None)
            .closeable_when_idle);
    }
}
