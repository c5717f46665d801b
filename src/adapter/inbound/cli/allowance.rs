//! `launchflow allowance`: current allowance per token and spender.

use std::sync::Arc;

use alloy_primitives::Address;

use super::output;
use crate::adapter::outbound::evm::EvmChain;
use crate::application::workflow::ChainPorts;
use crate::application::{ActionAdapter, ActionKind, AllowanceKey, AllowanceTracker};
use crate::domain::amount::from_base_units;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::outbound::chain::ChainWriter;

/// Distinct `(token, spender)` pairs the actions approve, with the first
/// action that uses each.
fn approval_pairs(adapters: impl IntoIterator<Item = ActionAdapter>) -> Vec<(ActionKind, Address, Address)> {
    let mut pairs: Vec<(ActionKind, Address, Address)> = Vec::new();
    for adapter in adapters {
        let Some((token, spender)) = adapter.approval_target() else {
            continue;
        };
        if !pairs.iter().any(|(_, t, s)| *t == token && *s == spender) {
            pairs.push((adapter.kind(), token, spender));
        }
    }
    pairs
}

/// Execute `launchflow allowance`.
///
/// # Errors
///
/// Returns an error if configuration is incomplete or a read fails.
pub async fn execute(config: &Config) -> Result<()> {
    let contracts = config.contracts.resolve()?;
    let chain = Arc::new(EvmChain::from_config(config)?);
    let owner = chain.account();
    let ports = ChainPorts::from_chain(chain);

    output::section("Allowances");
    output::field("Account", owner);

    let adapters = ActionKind::ALL.map(|kind| ActionAdapter::new(kind, &contracts));
    for (kind, token, spender) in approval_pairs(adapters) {
        let tracker = AllowanceTracker::new(
            AllowanceKey {
                token,
                owner,
                spender,
            },
            ports.allowances.clone(),
            ports.reader.clone(),
        );
        let allowance = tracker.refresh().await?;
        output::field(
            kind.as_str(),
            format!(
                "{} {}",
                from_base_units(allowance, config.chain.token_decimals),
                output::muted(format!("(token {token}, spender {spender})"))
            ),
        );
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::Contracts;

    #[test]
    fn one_row_per_token_and_spender() {
        let contracts = Contracts {
            payment_token: Address::repeat_byte(1),
            launchpad: Address::repeat_byte(2),
            router: Address::repeat_byte(3),
            lp_token: Address::repeat_byte(4),
        };
        let pairs = approval_pairs(ActionKind::ALL.map(|kind| ActionAdapter::new(kind, &contracts)));

        let kinds: Vec<_> = pairs.iter().map(|(kind, _, _)| *kind).collect();
        assert_eq!(
            kinds,
            vec![
                ActionKind::Contribute,
                ActionKind::AddLiquidity,
                ActionKind::RemoveLiquidity
            ]
        );
    }
}
