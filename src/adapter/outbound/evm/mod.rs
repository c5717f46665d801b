//! EVM JSON-RPC chain adapter.

mod chain;

pub use chain::EvmChain;
