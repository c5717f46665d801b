//! `launchflow modal`: render the modal for a workflow step.

use super::command::ModalArgs;
use super::output;
use crate::application::{ActionAdapter, Contracts};
use crate::domain::{describe, ModalDescriptor, ModalInput, TransactionRecord};
use crate::error::{Result, WorkflowError};

/// Execute `launchflow modal`. Needs no configuration or chain access.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn execute(args: &ModalArgs) -> Result<()> {
    let adapter = ActionAdapter::new(args.action, &Contracts::default());
    let kind = args.action.transaction_kind();
    let record = TransactionRecord::new(kind);
    let error = match (&args.error, args.rejected) {
        (_, true) => Some(WorkflowError::UserRejected),
        (Some(message), false) => Some(WorkflowError::SubmissionFailed(message.clone())),
        (None, false) => None,
    };

    let input = ModalInput {
        step: args.step,
        kind,
        approval: None,
        record: Some(&record),
        error: error.as_ref(),
    };
    let descriptor = describe(&input, &adapter.modal_options(None));
    print(&descriptor)
}

/// Print a modal descriptor as JSON or as labelled fields.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn print(descriptor: &ModalDescriptor) -> Result<()> {
    if output::is_json() {
        output::json_value(&serde_json::to_value(descriptor)?);
        return Ok(());
    }

    output::section(&descriptor.headline);
    output::field("Detail", &descriptor.detail);
    if let Some(url) = &descriptor.explorer_url {
        output::field("Explorer", output::highlight(url));
    }
    if descriptor.show_retry {
        output::hint("run the same command again to retry");
    }
    Ok(())
}
