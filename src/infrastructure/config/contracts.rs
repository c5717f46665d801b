//! Deployed contract addresses.

use alloy_primitives::Address;
use serde::Deserialize;

use crate::application::Contracts;
use crate::error::ConfigError;

/// Contract addresses (`[contracts]`).
///
/// Unset addresses default to zero and are rejected when the contracts are
/// resolved, so read-only commands work without a full deployment.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ContractsConfig {
    #[serde(default)]
    pub payment_token: Address,
    #[serde(default)]
    pub launchpad: Address,
    #[serde(default)]
    pub amm_router: Address,
    #[serde(default)]
    pub lp_token: Address,
}

impl ContractsConfig {
    /// Resolve into the addresses the action adapters need.
    ///
    /// # Errors
    ///
    /// Returns `MissingField` for the first address left unset.
    pub fn resolve(&self) -> Result<Contracts, ConfigError> {
        let fields = [
            ("contracts.payment_token", self.payment_token),
            ("contracts.launchpad", self.launchpad),
            ("contracts.amm_router", self.amm_router),
            ("contracts.lp_token", self.lp_token),
        ];
        if let Some((field, _)) = fields.iter().find(|(_, address)| address.is_zero()) {
            return Err(ConfigError::MissingField { field: *field });
        }
        Ok(Contracts {
            payment_token: self.payment_token,
            launchpad: self.launchpad,
            router: self.amm_router,
            lp_token: self.lp_token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_address_is_missing() {
        let config = ContractsConfig {
            payment_token: Address::repeat_byte(1),
            launchpad: Address::repeat_byte(2),
            amm_router: Address::ZERO,
            lp_token: Address::repeat_byte(4),
        };
        assert!(matches!(
            config.resolve(),
            Err(ConfigError::MissingField { field: "contracts.amm_router" })
        ));
    }

    #[test]
    fn resolves_all_addresses() {
        let config = ContractsConfig {
            payment_token: Address::repeat_byte(1),
            launchpad: Address::repeat_byte(2),
            amm_router: Address::repeat_byte(3),
            lp_token: Address::repeat_byte(4),
        };
        let contracts = config.resolve().unwrap();
        assert_eq!(contracts.router, Address::repeat_byte(3));
    }
}
