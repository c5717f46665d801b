//! Chain-agnostic workflow domain: steps, records, limits and projections.
//!
//! Nothing in this module performs I/O. The workflow state machine in the
//! application layer composes these types.

pub mod amount;
pub mod approval;
pub mod button;
pub mod explorer;
pub mod guard;
pub mod limits;
pub mod modal;
pub mod pending;
pub mod step;
pub mod transaction;

pub use approval::ApprovalRequirement;
pub use button::{button_state, ButtonState};
pub use explorer::ExplorerLink;
pub use guard::{NotificationCategory, NotificationGuard};
pub use limits::{Eligibility, SpendLimits};
pub use modal::{describe, ModalDescriptor, ModalInput, ModalOptions};
pub use pending::PendingAction;
pub use step::WorkflowStep;
pub use transaction::{RunId, TransactionKind, TransactionRecord};
