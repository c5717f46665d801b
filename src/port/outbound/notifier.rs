//! Notifier port for workflow notifications.
//!
//! This module defines the trait for surfacing submit/confirm/fail events
//! to the user (toasts, terminal output, logs).

use alloy_primitives::TxHash;

use crate::domain::guard::NotificationCategory;
use crate::domain::transaction::{RunId, TransactionKind};
use crate::error::WorkflowError;

/// Events that can trigger notifications.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    /// Approval transaction accepted by the network.
    ApprovalSubmitted(TransactionEvent),
    /// Approval transaction included.
    ApprovalConfirmed(TransactionEvent),
    /// Main action accepted by the network.
    Submitted(TransactionEvent),
    /// Main action included successfully.
    Confirmed(TransactionEvent),
    /// The run failed at any stage.
    Failed(FailureEvent),
}

impl Event {
    /// Deduplication category of this event.
    #[must_use]
    pub const fn category(&self) -> NotificationCategory {
        match self {
            Self::ApprovalSubmitted(_) => NotificationCategory::ApprovalSubmitted,
            Self::ApprovalConfirmed(_) => NotificationCategory::ApprovalConfirmed,
            Self::Submitted(_) => NotificationCategory::Submitted,
            Self::Confirmed(_) => NotificationCategory::Confirmed,
            Self::Failed(_) => NotificationCategory::Failed,
        }
    }

    /// Run the event belongs to.
    #[must_use]
    pub const fn run(&self) -> RunId {
        match self {
            Self::ApprovalSubmitted(e)
            | Self::ApprovalConfirmed(e)
            | Self::Submitted(e)
            | Self::Confirmed(e) => e.run,
            Self::Failed(e) => e.run,
        }
    }
}

/// A transaction reached a notable point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionEvent {
    pub run: RunId,
    pub kind: TransactionKind,
    pub hash: TxHash,
    /// Block explorer link, when an explorer is configured.
    pub explorer_url: Option<String>,
}

/// A run ended in `Error`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FailureEvent {
    pub run: RunId,
    pub kind: TransactionKind,
    pub error: WorkflowError,
}

impl FailureEvent {
    /// Whether the user declined in the wallet rather than something failing.
    #[must_use]
    pub const fn is_rejection(&self) -> bool {
        matches!(self.error, WorkflowError::UserRejected)
    }
}

/// Trait for notification handlers.
///
/// Notifications are fire-and-forget. Deduplication happens before this
/// trait is reached; implementations may assume each event is new.
///
/// # Implementation Notes
///
/// - Implementations must be thread-safe (`Send + Sync`)
/// - The `notify` method should not block or perform slow I/O synchronously
pub trait Notifier: Send + Sync {
    /// Handle an event.
    fn notify(&self, event: Event);
}

/// Registry of notifiers (composite pattern).
///
/// Broadcasts events to all registered notifiers.
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    /// Create an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self { notifiers: vec![] }
    }

    /// Register a notifier.
    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    /// Notify all registered notifiers.
    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(event.clone());
        }
    }

    /// Number of registered notifiers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    /// Check if registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }
}

impl Default for NotifierRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl Notifier for NotifierRegistry {
    fn notify(&self, event: Event) {
        self.notify_all(event);
    }
}

/// A no-op notifier for testing or when notifications are disabled.
pub struct NullNotifier;

impl Notifier for NullNotifier {
    fn notify(&self, _event: Event) {}
}

/// A logging notifier that logs events via tracing.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: Event) {
        use tracing::{info, warn};
        match event {
            Event::ApprovalSubmitted(e) => {
                info!(run = %e.run, kind = %e.kind, hash = %e.hash, "Approval submitted");
            }
            Event::ApprovalConfirmed(e) => {
                info!(run = %e.run, kind = %e.kind, hash = %e.hash, "Approval confirmed");
            }
            Event::Submitted(e) => {
                info!(run = %e.run, kind = %e.kind, hash = %e.hash, "Transaction submitted");
            }
            Event::Confirmed(e) => {
                info!(run = %e.run, kind = %e.kind, hash = %e.hash, "Transaction confirmed");
            }
            Event::Failed(e) => {
                warn!(
                    run = %e.run,
                    kind = %e.kind,
                    rejected = e.is_rejection(),
                    error = %e.error,
                    "Transaction failed"
                );
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    struct Counting(Arc<AtomicUsize>);

    impl Notifier for Counting {
        fn notify(&self, _event: Event) {
            self.0.fetch_add(1, Ordering::SeqCst);
        }
    }

    fn confirmed() -> Event {
        Event::Confirmed(TransactionEvent {
            run: RunId::new(3),
            kind: TransactionKind::Refund,
            hash: TxHash::ZERO,
            explorer_url: None,
        })
    }

    #[test]
    fn registry_broadcasts_to_all() {
        let count = Arc::new(AtomicUsize::new(0));
        let mut registry = NotifierRegistry::new();
        registry.register(Box::new(Counting(count.clone())));
        registry.register(Box::new(Counting(count.clone())));
        registry.register(Box::new(NullNotifier));

        registry.notify_all(confirmed());
        assert_eq!(count.load(Ordering::SeqCst), 2);
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn event_category_and_run() {
        let event = confirmed();
        assert_eq!(event.category(), NotificationCategory::Confirmed);
        assert_eq!(event.run(), RunId::new(3));

        let failed = FailureEvent {
            run: RunId::new(1),
            kind: TransactionKind::Deposit,
            error: WorkflowError::UserRejected,
        };
        assert!(failed.is_rejection());
        assert_eq!(
            Event::Failed(failed).category(),
            NotificationCategory::Failed
        );
    }
}
