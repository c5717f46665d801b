//! Declarative description of the transaction modal.
//!
//! The presentation surface renders whatever [`describe`] returns; it never
//! decides on its own whether the dialog may be dismissed.

use serde::Serialize;

use super::explorer::ExplorerLink;
use super::step::WorkflowStep;
use super::transaction::{TransactionKind, TransactionRecord};
use crate::error::WorkflowError;

/// Per-flow presentation options.
#[derive(Debug, Clone, Copy, Default)]
pub struct ModalOptions<'a> {
    /// Allow closing from `Idle`; only for flows with no prior side effects.
    pub closeable_when_idle: bool,
    pub explorer: Option<&'a ExplorerLink>,
}

/// Snapshot of a run as seen by the modal.
#[derive(Debug, Clone, Copy)]
pub struct ModalInput<'a> {
    pub step: WorkflowStep,
    pub kind: TransactionKind,
    pub approval: Option<&'a TransactionRecord>,
    pub record: Option<&'a TransactionRecord>,
    pub error: Option<&'a WorkflowError>,
}

/// What the modal shows.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModalDescriptor {
    pub headline: String,
    pub detail: String,
    pub show_close: bool,
    pub show_retry: bool,
    pub explorer_url: Option<String>,
}

/// Map a run snapshot to a modal descriptor.
#[must_use]
pub fn describe(input: &ModalInput<'_>, options: &ModalOptions<'_>) -> ModalDescriptor {
    let label = input.kind.label();
    let approval_hash = input.approval.and_then(TransactionRecord::hash);

    let (headline, detail) = match input.step {
        WorkflowStep::Idle => (label.to_string(), "Review and confirm the transaction".to_string()),
        WorkflowStep::Approving if approval_hash.is_some() => (
            "Approving token spending".to_string(),
            "Waiting for the approval to confirm".to_string(),
        ),
        WorkflowStep::Approving => (
            "Approve token spending".to_string(),
            "Confirm the approval in your wallet".to_string(),
        ),
        WorkflowStep::Submitting => (
            format!("Confirm {} in your wallet", label.to_lowercase()),
            "Waiting for your signature".to_string(),
        ),
        WorkflowStep::Confirming => (
            format!("{label} submitted"),
            "Waiting for network confirmation".to_string(),
        ),
        WorkflowStep::Confirmed => (
            format!("{label} confirmed"),
            "The transaction was included on chain".to_string(),
        ),
        WorkflowStep::Error => match input.error {
            Some(WorkflowError::UserRejected) => (
                "Request rejected".to_string(),
                "The request was rejected in your wallet".to_string(),
            ),
            Some(err) => (format!("{label} failed"), err.to_string()),
            None => (format!("{label} failed"), "Unknown error".to_string()),
        },
    };

    let show_close = match input.step {
        WorkflowStep::Confirmed | WorkflowStep::Error => true,
        WorkflowStep::Idle => options.closeable_when_idle,
        WorkflowStep::Approving | WorkflowStep::Submitting | WorkflowStep::Confirming => false,
    };

    let show_retry = input.step == WorkflowStep::Error
        && input.error.is_some_and(WorkflowError::is_retryable);

    let explorer_url = options.explorer.and_then(|link| {
        input
            .record
            .and_then(TransactionRecord::hash)
            .or(approval_hash)
            .map(|hash| link.tx_url(&hash))
    });

    ModalDescriptor {
        headline,
        detail,
        show_close,
        show_retry,
        explorer_url,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use alloy_primitives::TxHash;

    fn input<'a>(step: WorkflowStep) -> ModalInput<'a> {
        ModalInput {
            step,
            kind: TransactionKind::Contribute,
            approval: None,
            record: None,
            error: None,
        }
    }

    #[test]
    fn close_only_in_terminal_steps() {
        let options = ModalOptions::default();
        for step in [
            WorkflowStep::Idle,
            WorkflowStep::Approving,
            WorkflowStep::Submitting,
            WorkflowStep::Confirming,
        ] {
            assert!(!describe(&input(step), &options).show_close, "{step}");
        }
        assert!(describe(&input(WorkflowStep::Confirmed), &options).show_close);
        assert!(describe(&input(WorkflowStep::Error), &options).show_close);
    }

    #[test]
    fn idle_close_is_opt_in() {
        let options = ModalOptions {
            closeable_when_idle: true,
            explorer: None,
        };
        assert!(describe(&input(WorkflowStep::Idle), &options).show_close);
        assert!(!describe(&input(WorkflowStep::Submitting), &options).show_close);
    }

    #[test]
    fn retry_follows_error_class() {
        let rejected = WorkflowError::UserRejected;
        let descriptor = describe(
            &ModalInput {
                error: Some(&rejected),
                ..input(WorkflowStep::Error)
            },
            &ModalOptions::default(),
        );
        assert!(descriptor.show_retry);
        assert_eq!(descriptor.headline, "Request rejected");

        let invalid = WorkflowError::Validation(ValidationError::ZeroAmount);
        let descriptor = describe(
            &ModalInput {
                error: Some(&invalid),
                ..input(WorkflowStep::Error)
            },
            &ModalOptions::default(),
        );
        assert!(!descriptor.show_retry);
        assert_eq!(descriptor.headline, "Contribution failed");
        assert_eq!(descriptor.detail, "amount must be greater than zero");
    }

    #[test]
    fn explorer_link_prefers_main_transaction() {
        let link = ExplorerLink::parse("https://etherscan.io").unwrap();
        let approval_hash = TxHash::repeat_byte(0xaa);
        let main_hash = TxHash::repeat_byte(0xbb);
        let approval = TransactionRecord::new(TransactionKind::Approval).with_hash(approval_hash);
        let main = TransactionRecord::new(TransactionKind::Contribute).with_hash(main_hash);
        let options = ModalOptions {
            closeable_when_idle: false,
            explorer: Some(&link),
        };

        let approving = describe(
            &ModalInput {
                approval: Some(&approval),
                ..input(WorkflowStep::Approving)
            },
            &options,
        );
        assert_eq!(approving.explorer_url, Some(link.tx_url(&approval_hash)));
        assert_eq!(approving.detail, "Waiting for the approval to confirm");

        let confirming = describe(
            &ModalInput {
                approval: Some(&approval),
                record: Some(&main),
                ..input(WorkflowStep::Confirming)
            },
            &options,
        );
        assert_eq!(confirming.explorer_url, Some(link.tx_url(&main_hash)));
        assert_eq!(confirming.headline, "Contribution submitted");
    }
}
