//! Outbound adapters (driven side).

#[cfg(feature = "evm")]
pub mod evm;
