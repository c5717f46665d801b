//! Application services (use cases).
//!
//! These services compose the domain types with the chain and notifier
//! ports to run approval-aware transaction workflows.

pub mod action;
pub mod allowance;
pub mod approval;
pub mod contracts;
pub mod receipt;
pub mod workflow;

pub use action::{ActionAdapter, ActionKind, ActionRequest, Contracts};
pub use allowance::{AllowanceBook, AllowanceKey, AllowanceTracker};
pub use approval::{ApprovalLifecycle, ApprovalSubmitter};
pub use receipt::await_receipt;
pub use workflow::{ChainPorts, EngineSettings, WorkflowEngine};
