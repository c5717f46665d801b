//! Implementations of ports (hexagonal adapters).

#[cfg(feature = "evm")]
pub mod inbound;
pub mod outbound;
