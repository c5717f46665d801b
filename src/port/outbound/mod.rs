//! Outbound ports (driven side): interfaces implemented by outbound adapters.
//!
//! These contracts describe the chain and the notification surface.

pub mod chain;
pub mod notifier;
