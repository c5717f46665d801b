//! Pure workflow state machine.
//!
//! [`Workflow`] owns every piece of per-run state and reacts to
//! [`Signal`]s by returning [`Command`]s for the driver to execute. It never
//! performs I/O, which keeps every race in the step machine testable with
//! plain method calls.

use alloy_primitives::{TxHash, U256};
use tracing::{debug, info};

use crate::domain::{
    ExplorerLink, NotificationGuard, PendingAction, RunId, TransactionKind, TransactionRecord,
    WorkflowStep,
};
use crate::error::{ValidationError, WorkflowError};
use crate::port::outbound::notifier::{Event, FailureEvent, TransactionEvent};

/// Work the driver must perform after a transition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Ask the signer to approve `amount` for the action's spender.
    SubmitApproval { run: RunId, amount: U256 },
    /// Submit the main action. Emitted at most once per run.
    SubmitMain { run: RunId, action: PendingAction },
    /// Surface a deduplicated notification.
    Notify(Event),
    /// Refetch the shared allowance after an approval or a spend.
    RefreshAllowance,
    /// Start the post-terminal display timer for `run`.
    ScheduleReset { run: RunId },
    /// Drop any pending display timer.
    CancelReset,
}

/// Asynchronous inputs, each tagged with the run it belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Signal {
    ApprovalSubmitted { run: RunId, hash: TxHash },
    ApprovalConfirmed { run: RunId, hash: TxHash },
    MainSubmitted { run: RunId, hash: TxHash },
    MainConfirmed { run: RunId, hash: TxHash },
    Failed { run: RunId, error: WorkflowError },
    ResetElapsed { run: RunId },
}

impl Signal {
    #[must_use]
    pub const fn run(&self) -> RunId {
        match self {
            Self::ApprovalSubmitted { run, .. }
            | Self::ApprovalConfirmed { run, .. }
            | Self::MainSubmitted { run, .. }
            | Self::MainConfirmed { run, .. }
            | Self::Failed { run, .. }
            | Self::ResetElapsed { run } => *run,
        }
    }
}

/// Why a signal did not change state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// Signal belongs to an earlier run.
    StaleRun,
    /// Signal does not apply to the current step.
    WrongStep(WorkflowStep),
    /// Signal refers to a different transaction than the one tracked.
    HashMismatch,
    /// Approval confirmed but nothing is parked behind it.
    NoPendingAction,
    /// The approval-to-submission transition was already taken.
    AlreadyTransitioned,
    /// Same signal seen again for the same transaction.
    Duplicate,
}

/// Result of feeding a signal to the machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignalOutcome {
    Applied(Vec<Command>),
    Ignored(IgnoreReason),
}

impl SignalOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    /// Commands to execute; empty when the signal was ignored.
    #[must_use]
    pub fn into_commands(self) -> Vec<Command> {
        match self {
            Self::Applied(commands) => commands,
            Self::Ignored(_) => Vec::new(),
        }
    }
}

/// Final result of a run, kept after the step collapses back to idle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunOutcome {
    pub run: RunId,
    pub result: Result<TxHash, WorkflowError>,
}

/// Copy of the machine state for observers and projections.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkflowSnapshot {
    pub run: RunId,
    pub step: WorkflowStep,
    pub kind: TransactionKind,
    pub approval: Option<TransactionRecord>,
    pub record: Option<TransactionRecord>,
    pub pending: Option<PendingAction>,
    pub error: Option<WorkflowError>,
    pub last_outcome: Option<RunOutcome>,
}

impl WorkflowSnapshot {
    /// Outcome of `run`, if it has finished.
    #[must_use]
    pub fn outcome_for(&self, run: RunId) -> Option<&RunOutcome> {
        self.last_outcome.as_ref().filter(|outcome| outcome.run == run)
    }
}

/// Step machine for one action adapter.
///
/// Only one run is live at a time. Every transition out of `Idle` starts a
/// new [`RunId`]; signals carrying an older id are ignored.
#[derive(Debug)]
pub struct Workflow {
    kind: TransactionKind,
    explorer: Option<ExplorerLink>,
    run: RunId,
    step: WorkflowStep,
    approval: Option<TransactionRecord>,
    record: Option<TransactionRecord>,
    pending: Option<PendingAction>,
    /// One-shot latch for `Approving -> Submitting`.
    approval_consumed: bool,
    guard: NotificationGuard,
    error: Option<WorkflowError>,
    last_outcome: Option<RunOutcome>,
}

impl Workflow {
    #[must_use]
    pub fn new(kind: TransactionKind) -> Self {
        Self {
            kind,
            explorer: None,
            run: RunId::default(),
            step: WorkflowStep::Idle,
            approval: None,
            record: None,
            pending: None,
            approval_consumed: false,
            guard: NotificationGuard::new(),
            error: None,
            last_outcome: None,
        }
    }

    /// Attach explorer links to emitted notifications.
    #[must_use]
    pub fn with_explorer(mut self, explorer: Option<ExplorerLink>) -> Self {
        self.explorer = explorer;
        self
    }

    #[must_use]
    pub const fn step(&self) -> WorkflowStep {
        self.step
    }

    #[must_use]
    pub const fn run(&self) -> RunId {
        self.run
    }

    #[must_use]
    pub const fn pending(&self) -> Option<&PendingAction> {
        self.pending.as_ref()
    }

    #[must_use]
    pub const fn error(&self) -> Option<&WorkflowError> {
        self.error.as_ref()
    }

    #[must_use]
    pub const fn guard(&self) -> &NotificationGuard {
        &self.guard
    }

    #[must_use]
    pub fn snapshot(&self) -> WorkflowSnapshot {
        WorkflowSnapshot {
            run: self.run,
            step: self.step,
            kind: self.kind,
            approval: self.approval.clone(),
            record: self.record.clone(),
            pending: self.pending,
            error: self.error.clone(),
            last_outcome: self.last_outcome.clone(),
        }
    }

    /// Begin a new run.
    ///
    /// `validation` is the caller's pre-flight check; a failure ends the run in
    /// `Error` without emitting any submission command.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Busy`] while a run is in flight. State is left
    /// untouched in that case.
    pub fn start(
        &mut self,
        action: PendingAction,
        needs_approval: bool,
        validation: Result<(), ValidationError>,
    ) -> Result<(RunId, Vec<Command>), WorkflowError> {
        if self.step.is_in_flight() {
            return Err(WorkflowError::Busy { step: self.step });
        }

        let mut commands = Vec::new();
        if self.step.is_terminal() {
            commands.push(Command::CancelReset);
        }

        self.run = self.run.next();
        self.clear_run_state();

        if let Err(err) = validation {
            debug!(run = %self.run, kind = %self.kind, error = %err, "Validation failed");
            commands.extend(self.fail(WorkflowError::Validation(err)));
            return Ok((self.run, commands));
        }

        if needs_approval {
            self.pending = Some(action);
            self.approval = Some(TransactionRecord::new(TransactionKind::Approval));
            self.transition(WorkflowStep::Approving);
            commands.push(Command::SubmitApproval {
                run: self.run,
                amount: action.amount,
            });
        } else {
            self.record = Some(TransactionRecord::new(self.kind));
            self.transition(WorkflowStep::Submitting);
            commands.push(Command::SubmitMain {
                run: self.run,
                action,
            });
        }

        Ok((self.run, commands))
    }

    /// Feed an asynchronous signal.
    pub fn handle(&mut self, signal: Signal) -> SignalOutcome {
        if signal.run() != self.run {
            debug!(run = %self.run, signal_run = %signal.run(), "Ignoring signal from stale run");
            return SignalOutcome::Ignored(IgnoreReason::StaleRun);
        }

        let outcome = match signal {
            Signal::ApprovalSubmitted { hash, .. } => self.on_approval_submitted(hash),
            Signal::ApprovalConfirmed { hash, .. } => self.on_approval_confirmed(hash),
            Signal::MainSubmitted { hash, .. } => self.on_main_submitted(hash),
            Signal::MainConfirmed { hash, .. } => self.on_main_confirmed(hash),
            Signal::Failed { error, .. } => self.on_failed(error),
            Signal::ResetElapsed { .. } => self.on_reset_elapsed(),
        };

        if let SignalOutcome::Ignored(reason) = &outcome {
            debug!(run = %self.run, step = %self.step, ?reason, "Signal ignored");
        }
        outcome
    }

    /// Collapse to `Idle` immediately. Safe from any step.
    pub fn reset(&mut self) -> Vec<Command> {
        if self.step != WorkflowStep::Idle {
            info!(run = %self.run, from = %self.step, "Workflow reset");
        }
        self.clear_run_state();
        self.step = WorkflowStep::Idle;
        vec![Command::CancelReset]
    }

    fn on_approval_submitted(&mut self, hash: TxHash) -> SignalOutcome {
        if self.step != WorkflowStep::Approving {
            return SignalOutcome::Ignored(IgnoreReason::WrongStep(self.step));
        }
        let Some(record) = self.approval.as_ref() else {
            return SignalOutcome::Ignored(IgnoreReason::NoPendingAction);
        };
        match record.hash() {
            Some(known) if known != hash => {
                return SignalOutcome::Ignored(IgnoreReason::HashMismatch)
            }
            Some(_) => return SignalOutcome::Ignored(IgnoreReason::Duplicate),
            None => {}
        }

        self.approval = Some(record.with_hash(hash));
        info!(run = %self.run, hash = %hash, "Approval submitted");
        let event = Event::ApprovalSubmitted(self.transaction_event(TransactionKind::Approval, hash));
        SignalOutcome::Applied(self.notify(event).into_iter().collect())
    }

    fn on_approval_confirmed(&mut self, hash: TxHash) -> SignalOutcome {
        if self.approval_consumed {
            return SignalOutcome::Ignored(IgnoreReason::AlreadyTransitioned);
        }
        if self.step != WorkflowStep::Approving {
            return SignalOutcome::Ignored(IgnoreReason::WrongStep(self.step));
        }
        if let Some(known) = self.approval.as_ref().and_then(TransactionRecord::hash) {
            if known != hash {
                return SignalOutcome::Ignored(IgnoreReason::HashMismatch);
            }
        }
        let Some(action) = self.pending.take() else {
            return SignalOutcome::Ignored(IgnoreReason::NoPendingAction);
        };

        self.approval_consumed = true;
        self.approval = self.approval.as_ref().map(|record| record.with_hash(hash));
        self.record = Some(TransactionRecord::new(self.kind));
        self.transition(WorkflowStep::Submitting);

        let mut commands = Vec::with_capacity(3);
        let event = Event::ApprovalConfirmed(self.transaction_event(TransactionKind::Approval, hash));
        commands.extend(self.notify(event));
        commands.push(Command::RefreshAllowance);
        commands.push(Command::SubmitMain {
            run: self.run,
            action,
        });
        SignalOutcome::Applied(commands)
    }

    fn on_main_submitted(&mut self, hash: TxHash) -> SignalOutcome {
        let known = self.record.as_ref().and_then(TransactionRecord::hash);
        match self.step {
            WorkflowStep::Submitting => {}
            WorkflowStep::Confirming | WorkflowStep::Confirmed if known == Some(hash) => {
                return SignalOutcome::Ignored(IgnoreReason::Duplicate)
            }
            step => return SignalOutcome::Ignored(IgnoreReason::WrongStep(step)),
        }
        SignalOutcome::Applied(self.accept_main_hash(hash))
    }

    fn on_main_confirmed(&mut self, hash: TxHash) -> SignalOutcome {
        let known = self.record.as_ref().and_then(TransactionRecord::hash);
        let mut commands = Vec::new();
        match self.step {
            WorkflowStep::Confirming if known == Some(hash) => {}
            WorkflowStep::Confirming => return SignalOutcome::Ignored(IgnoreReason::HashMismatch),
            // Receipt observed before the hash callback; walk through Confirming.
            WorkflowStep::Submitting if known.is_none() => {
                commands.extend(self.accept_main_hash(hash));
            }
            WorkflowStep::Confirmed if known == Some(hash) => {
                return SignalOutcome::Ignored(IgnoreReason::Duplicate)
            }
            step => return SignalOutcome::Ignored(IgnoreReason::WrongStep(step)),
        }

        self.transition(WorkflowStep::Confirmed);
        self.last_outcome = Some(RunOutcome {
            run: self.run,
            result: Ok(hash),
        });
        let event = Event::Confirmed(self.transaction_event(self.kind, hash));
        commands.extend(self.notify(event));
        commands.push(Command::RefreshAllowance);
        commands.push(Command::ScheduleReset { run: self.run });
        SignalOutcome::Applied(commands)
    }

    fn on_failed(&mut self, error: WorkflowError) -> SignalOutcome {
        if !self.step.is_in_flight() {
            return SignalOutcome::Ignored(IgnoreReason::WrongStep(self.step));
        }
        SignalOutcome::Applied(self.fail(error))
    }

    fn on_reset_elapsed(&mut self) -> SignalOutcome {
        if !self.step.is_terminal() {
            return SignalOutcome::Ignored(IgnoreReason::WrongStep(self.step));
        }
        info!(run = %self.run, from = %self.step, "Display window elapsed");
        self.clear_run_state();
        self.step = WorkflowStep::Idle;
        SignalOutcome::Applied(Vec::new())
    }

    fn accept_main_hash(&mut self, hash: TxHash) -> Vec<Command> {
        self.record = self.record.as_ref().map(|record| record.with_hash(hash));
        self.transition(WorkflowStep::Confirming);
        let event = Event::Submitted(self.transaction_event(self.kind, hash));
        self.notify(event).into_iter().collect()
    }

    fn fail(&mut self, error: WorkflowError) -> Vec<Command> {
        self.pending = None;
        self.transition(WorkflowStep::Error);
        self.error = Some(error.clone());
        self.last_outcome = Some(RunOutcome {
            run: self.run,
            result: Err(error.clone()),
        });

        let mut commands = Vec::with_capacity(2);
        let event = Event::Failed(FailureEvent {
            run: self.run,
            kind: self.kind,
            error,
        });
        commands.extend(self.notify(event));
        commands.push(Command::ScheduleReset { run: self.run });
        commands
    }

    fn notify(&mut self, event: Event) -> Option<Command> {
        self.guard
            .guard(event.category())
            .then_some(Command::Notify(event))
    }

    fn transaction_event(&self, kind: TransactionKind, hash: TxHash) -> TransactionEvent {
        TransactionEvent {
            run: self.run,
            kind,
            hash,
            explorer_url: self.explorer.as_ref().map(|link| link.tx_url(&hash)),
        }
    }

    fn transition(&mut self, to: WorkflowStep) {
        info!(run = %self.run, kind = %self.kind, from = %self.step, to = %to, "Workflow transition");
        self.step = to;
    }

    fn clear_run_state(&mut self) {
        self.approval = None;
        self.record = None;
        self.pending = None;
        self.approval_consumed = false;
        self.error = None;
        self.guard.reset_all();
    }
}
