//! Infrastructure bootstrap helpers for runtime wiring.

use std::sync::Arc;

use alloy_primitives::Address;
use tracing::debug;

use crate::application::workflow::{ChainPorts, WorkflowEngine};
use crate::application::{ActionAdapter, ActionKind};
use crate::domain::SpendLimits;
use crate::error::Result;
use crate::infrastructure::config::Config;
use crate::port::outbound::chain::ChainReader;
use crate::port::outbound::notifier::{LogNotifier, Notifier, NotifierRegistry};

/// Build the notifier registry: structured logs plus any front-end notifiers.
#[must_use]
pub fn build_notifier_registry(extra: Vec<Box<dyn Notifier>>) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));
    for notifier in extra {
        registry.register(notifier);
    }
    registry
}

/// Build a workflow engine for `action` from configuration.
///
/// # Errors
///
/// Returns an error if a contract address is unset or the explorer URL is
/// invalid.
pub fn build_engine(
    config: &Config,
    action: ActionKind,
    ports: &ChainPorts,
    notifier: Arc<dyn Notifier>,
) -> Result<WorkflowEngine> {
    let contracts = config.contracts.resolve()?;
    let adapter = ActionAdapter::new(action, &contracts);
    Ok(WorkflowEngine::new(
        adapter,
        ports,
        notifier,
        config.engine_settings()?,
    ))
}

/// Spend limits for `adapter` from the wallet balance and configured minimum.
///
/// Actions that move no tokens get no limits.
///
/// # Errors
///
/// Returns an error if the balance read fails.
pub async fn spend_limits(
    config: &Config,
    adapter: &ActionAdapter,
    reader: &dyn ChainReader,
    owner: Address,
) -> Result<SpendLimits> {
    let Some((token, _)) = adapter.approval_target() else {
        return Ok(SpendLimits::none());
    };
    let balance = reader.balance_of(token, owner).await?;
    let minimum = match adapter.kind() {
        ActionKind::Contribute => Some(config.minimum_contribution()?),
        _ => None,
    };
    debug!(action = %adapter.kind(), %balance, ?minimum, "Resolved spend limits");
    Ok(SpendLimits {
        minimum,
        balance: Some(balance),
        ..SpendLimits::none()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testkit::ScriptedChain;
    use alloy_primitives::U256;

    fn config() -> Config {
        let mut config = Config::parse_toml(
            r#"
            [chain]
            token_decimals = 6

            [contracts]
            payment_token = "0x0101010101010101010101010101010101010101"
            launchpad = "0x0202020202020202020202020202020202020202"
            amm_router = "0x0303030303030303030303030303030303030303"
            lp_token = "0x0404040404040404040404040404040404040404"

            [limits]
            minimum_contribution = "1"
            "#,
        )
        .unwrap();
        config.wallet.private_key = None;
        config
    }

    #[test]
    fn registry_always_logs() {
        assert_eq!(build_notifier_registry(Vec::new()).len(), 1);
    }

    #[tokio::test]
    async fn contribution_limits_include_minimum() {
        let config = config();
        let chain = ScriptedChain::new();
        chain.set_balance(U256::from(5_000_000u64));
        let adapter = ActionAdapter::new(ActionKind::Contribute, &config.contracts.resolve().unwrap());

        let limits = spend_limits(&config, &adapter, &chain, ScriptedChain::ACCOUNT).await.unwrap();

        assert_eq!(limits.minimum, Some(U256::from(1_000_000u64)));
        assert_eq!(limits.balance, Some(U256::from(5_000_000u64)));
    }

    #[tokio::test]
    async fn finalize_has_no_limits() {
        let config = config();
        let chain = ScriptedChain::new();
        let adapter = ActionAdapter::new(ActionKind::Finalize, &config.contracts.resolve().unwrap());

        let limits = spend_limits(&config, &adapter, &chain, ScriptedChain::ACCOUNT).await.unwrap();

        assert_eq!(limits, SpendLimits::none());
        assert_eq!(chain.reads(), 0);
    }

    #[test]
    fn engine_requires_contracts() {
        let config = Config::parse_toml("").unwrap();
        let ports = ChainPorts::from_chain(Arc::new(ScriptedChain::new()));
        let result = build_engine(
            &config,
            ActionKind::Contribute,
            &ports,
            Arc::new(build_notifier_registry(Vec::new())),
        );
        assert!(result.is_err());
    }
}
