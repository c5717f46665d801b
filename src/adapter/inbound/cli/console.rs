//! Terminal notifications for workflow events.

use crate::port::outbound::notifier::{Event, Notifier, TransactionEvent};

use super::output;

/// Prints each workflow notification once, as the run progresses.
pub struct ConsoleNotifier;

impl ConsoleNotifier {
    fn link(event: &TransactionEvent) {
        match &event.explorer_url {
            Some(url) => output::field("Explorer", output::highlight(url)),
            None => output::field("Transaction", output::muted(event.hash)),
        }
    }
}

impl Notifier for ConsoleNotifier {
    fn notify(&self, event: Event) {
        match &event {
            Event::ApprovalSubmitted(tx) => {
                output::success("Approval submitted");
                Self::link(tx);
            }
            Event::ApprovalConfirmed(_) => output::success("Approval confirmed"),
            Event::Submitted(tx) => {
                output::success(&format!("{} submitted", tx.kind.label()));
                Self::link(tx);
            }
            Event::Confirmed(tx) => output::success(&format!("{} confirmed", tx.kind.label())),
            Event::Failed(failure) if failure.is_rejection() => {
                output::warning("Request rejected in wallet");
            }
            Event::Failed(failure) => output::error(&failure.error.to_string()),
        }
    }
}
