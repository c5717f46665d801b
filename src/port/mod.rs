//! Trait definitions (hexagonal ports). Depend only on domain.
//!
//! Ports define the extension points in the hexagonal architecture.
//! They are traits that adapters implement to integrate with external
//! systems (the chain and the notification surface).
//!
//! # Available Ports
//!
//! - [`ChainReader`], [`ChainWriter`] - Chain reads and transaction submission
//! - [`Notifier`] - Workflow notifications (terminal, logging, etc.)

pub mod outbound;

pub use outbound::chain::{ChainReader, ChainWriter, ContractCall, Receipt};
pub use outbound::notifier::{
    Event, FailureEvent, LogNotifier, Notifier, NotifierRegistry, NullNotifier, TransactionEvent,
};
