//! Async driver for the workflow state machine.
//!
//! [`WorkflowEngine`] owns a [`Workflow`] behind a lock, executes the
//! commands it emits against the chain ports, and feeds the resulting
//! signals back in. The lock is never held across an await point.

use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::machine::{Command, RunOutcome, Signal, SignalOutcome, Workflow, WorkflowSnapshot};
use crate::application::action::{ActionAdapter, ActionRequest};
use crate::application::allowance::{AllowanceBook, AllowanceKey, AllowanceTracker};
use crate::application::approval::{ApprovalLifecycle, ApprovalSubmitter};
use crate::application::receipt::await_receipt;
use crate::domain::{
    button_state, describe, ButtonState, Eligibility, ExplorerLink, ModalDescriptor, ModalInput,
    PendingAction, RunId, WorkflowStep,
};
use crate::error::WorkflowError;
use crate::port::outbound::chain::{ChainReader, ChainWriter};
use crate::port::outbound::notifier::Notifier;

/// How long `Confirmed` and `Error` stay visible before collapsing to `Idle`.
pub const DEFAULT_RESET_DELAY: Duration = Duration::from_secs(10);

/// Engine tuning.
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub reset_delay: Duration,
    pub explorer: Option<ExplorerLink>,
}

impl Default for EngineSettings {
    fn default() -> Self {
        Self {
            reset_delay: DEFAULT_RESET_DELAY,
            explorer: None,
        }
    }
}

/// Chain capabilities shared by every engine of an application.
#[derive(Clone)]
pub struct ChainPorts {
    pub reader: Arc<dyn ChainReader>,
    pub writer: Arc<dyn ChainWriter>,
    /// Allowance cache shared across adapters.
    pub allowances: Arc<AllowanceBook>,
}

impl ChainPorts {
    /// Ports backed by one object implementing both traits.
    pub fn from_chain<C>(chain: Arc<C>) -> Self
    where
        C: ChainReader + ChainWriter + 'static,
    {
        Self {
            reader: chain.clone(),
            writer: chain,
            allowances: Arc::new(AllowanceBook::new()),
        }
    }
}

struct Inner {
    adapter: ActionAdapter,
    writer: Arc<dyn ChainWriter>,
    allowance: Option<AllowanceTracker>,
    approvals: Option<ApprovalSubmitter>,
    notifier: Arc<dyn Notifier>,
    settings: EngineSettings,
    machine: Mutex<Workflow>,
    reset_timer: Mutex<Option<JoinHandle<()>>>,
    listeners: Mutex<Vec<JoinHandle<()>>>,
    snapshots: watch::Sender<WorkflowSnapshot>,
}

/// Runs workflows for one action adapter.
///
/// Cheap to clone; clones share the same run. Only one run is live at a
/// time: [`start`](Self::start) rejects new requests while the current run
/// waits on the signer or the network.
#[derive(Clone)]
pub struct WorkflowEngine {
    inner: Arc<Inner>,
}

impl WorkflowEngine {
    #[must_use]
    pub fn new(
        adapter: ActionAdapter,
        ports: &ChainPorts,
        notifier: Arc<dyn Notifier>,
        settings: EngineSettings,
    ) -> Self {
        let owner = ports.writer.account();
        let allowance = adapter.approval_target().map(|(token, spender)| {
            AllowanceTracker::new(
                AllowanceKey {
                    token,
                    owner,
                    spender,
                },
                ports.allowances.clone(),
                ports.reader.clone(),
            )
        });
        let approvals = adapter
            .approval_target()
            .map(|(token, spender)| ApprovalSubmitter::new(ports.writer.clone(), token, spender));

        let machine = Workflow::new(adapter.kind().transaction_kind())
            .with_explorer(settings.explorer.clone());
        let (snapshots, _) = watch::channel(machine.snapshot());

        Self {
            inner: Arc::new(Inner {
                adapter,
                writer: ports.writer.clone(),
                allowance,
                approvals,
                notifier,
                settings,
                machine: Mutex::new(machine),
                reset_timer: Mutex::new(None),
                listeners: Mutex::new(Vec::new()),
                snapshots,
            }),
        }
    }

    #[must_use]
    pub fn adapter(&self) -> &ActionAdapter {
        &self.inner.adapter
    }

    #[must_use]
    pub fn allowance(&self) -> Option<&AllowanceTracker> {
        self.inner.allowance.as_ref()
    }

    #[must_use]
    pub fn approval_lifecycle(&self) -> ApprovalLifecycle {
        self.inner
            .approvals
            .as_ref()
            .map(ApprovalSubmitter::lifecycle)
            .unwrap_or_default()
    }

    #[must_use]
    pub fn snapshot(&self) -> WorkflowSnapshot {
        self.inner.machine.lock().snapshot()
    }

    #[must_use]
    pub fn step(&self) -> WorkflowStep {
        self.inner.machine.lock().step()
    }

    /// Observe every state change.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WorkflowSnapshot> {
        self.inner.snapshots.subscribe()
    }

    /// Start a run for `request`.
    ///
    /// Pre-flight validation failures end the run in `Error` without any
    /// chain call and still return the run id.
    ///
    /// # Errors
    ///
    /// Returns [`WorkflowError::Busy`] if a run is already in flight.
    pub async fn start(&self, request: ActionRequest) -> Result<RunId, WorkflowError> {
        let step = self.step();
        if step.is_in_flight() {
            return Err(WorkflowError::Busy { step });
        }

        let validation = self.inner.adapter.validate(&request);
        let needs_approval = match (&self.inner.allowance, &validation) {
            (Some(tracker), Ok(())) => {
                if tracker.current().is_none() && tracker.refresh().await.is_err() {
                    warn!(action = %self.inner.adapter.kind(), "Allowance unknown, submitting without approval");
                }
                tracker.needs_approval(request.amount)
            }
            _ => false,
        };

        let (run, commands) = {
            let mut machine = self.inner.machine.lock();
            let started = machine.start(request.pending(), needs_approval, validation)?;
            self.inner.snapshots.send_replace(machine.snapshot());
            started
        };
        info!(
            run = %run,
            action = %self.inner.adapter.kind(),
            amount = %request.amount,
            needs_approval,
            "Workflow started"
        );
        self.execute(commands);
        Ok(run)
    }

    /// Feed a signal from the chain data layer.
    ///
    /// Duplicate, late and stale signals are ignored and reported as such.
    pub fn handle(&self, signal: Signal) -> SignalOutcome {
        let outcome = {
            let mut machine = self.inner.machine.lock();
            let outcome = machine.handle(signal);
            if outcome.is_applied() {
                self.inner.snapshots.send_replace(machine.snapshot());
            }
            outcome
        };
        if let SignalOutcome::Applied(commands) = &outcome {
            self.execute(commands.clone());
        }
        outcome
    }

    /// Collapse to `Idle` now and stop listening for the abandoned run.
    pub fn reset(&self) {
        let commands = {
            let mut machine = self.inner.machine.lock();
            let commands = machine.reset();
            self.inner.snapshots.send_replace(machine.snapshot());
            commands
        };
        for listener in self.inner.listeners.lock().drain(..) {
            listener.abort();
        }
        self.execute(commands);
    }

    /// Wait until `run` finishes.
    ///
    /// Returns `None` if the run was reset before reaching a terminal step or
    /// a newer run replaced it.
    pub async fn wait_for_outcome(&self, run: RunId) -> Option<RunOutcome> {
        let mut snapshots = self.subscribe();
        let snapshot = snapshots
            .wait_for(|s| s.outcome_for(run).is_some() || s.run != run || s.step == WorkflowStep::Idle)
            .await
            .ok()?;
        snapshot.outcome_for(run).cloned()
    }

    /// Button projection for the current step.
    #[must_use]
    pub fn button(&self, amount: alloy_primitives::U256, eligibility: &Eligibility) -> ButtonState {
        let needs_approval = self
            .inner
            .allowance
            .as_ref()
            .is_some_and(|tracker| tracker.needs_approval(amount));
        let snapshot = self.snapshot();
        button_state(
            snapshot.step,
            self.inner.adapter.kind().label(),
            needs_approval,
            snapshot.error.as_ref(),
            eligibility,
        )
    }

    /// Modal descriptor for the current step.
    #[must_use]
    pub fn modal(&self) -> ModalDescriptor {
        let snapshot = self.snapshot();
        let input = ModalInput {
            step: snapshot.step,
            kind: snapshot.kind,
            approval: snapshot.approval.as_ref(),
            record: snapshot.record.as_ref(),
            error: snapshot.error.as_ref(),
        };
        describe(
            &input,
            &self
                .inner
                .adapter
                .modal_options(self.inner.settings.explorer.as_ref()),
        )
    }

    fn execute(&self, commands: Vec<Command>) {
        for command in commands {
            match command {
                Command::Notify(event) => self.inner.notifier.notify(event),
                Command::SubmitApproval { run, amount } => {
                    let engine = self.clone();
                    self.listen(async move { engine.run_approval(run, amount).await });
                }
                Command::SubmitMain { run, action } => {
                    let engine = self.clone();
                    self.listen(async move { engine.run_main(run, action).await });
                }
                Command::RefreshAllowance => {
                    if let Some(tracker) = self.inner.allowance.clone() {
                        tracker.invalidate();
                        tokio::spawn(async move {
                            // A failed read is logged by `refresh`; the next
                            // start reads again while the value is unknown.
                            if tracker.refresh().await.is_err() {
                                debug!(key = ?tracker.key(), "Allowance left unknown after refresh failure");
                            }
                        });
                    }
                }
                Command::ScheduleReset { run } => self.schedule_reset(run),
                Command::CancelReset => {
                    if let Some(timer) = self.inner.reset_timer.lock().take() {
                        timer.abort();
                    }
                }
            }
        }
    }

    fn listen<F>(&self, task: F)
    where
        F: std::future::Future<Output = ()> + Send + 'static,
    {
        let handle = tokio::spawn(task);
        let mut listeners = self.inner.listeners.lock();
        listeners.retain(|listener| !listener.is_finished());
        listeners.push(handle);
    }

    fn schedule_reset(&self, run: RunId) {
        let engine = self.clone();
        let delay = self.inner.settings.reset_delay;
        let timer = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            engine.handle(Signal::ResetElapsed { run });
        });
        if let Some(previous) = self.inner.reset_timer.lock().replace(timer) {
            previous.abort();
        }
    }

    async fn run_approval(&self, run: RunId, amount: alloy_primitives::U256) {
        let Some(approvals) = self.inner.approvals.clone() else {
            self.handle(Signal::Failed {
                run,
                error: WorkflowError::SubmissionFailed(format!(
                    "{} has no token to approve",
                    self.inner.adapter.kind()
                )),
            });
            return;
        };

        let hash = match approvals.submit_approval(amount).await {
            Ok(hash) => hash,
            Err(err) => {
                warn!(run = %run, error = %err, "Approval submission failed");
                self.handle(Signal::Failed {
                    run,
                    error: err.into_workflow(),
                });
                return;
            }
        };
        self.handle(Signal::ApprovalSubmitted { run, hash });

        let signal = match approvals.await_confirmation(hash).await {
            Ok(_) => Signal::ApprovalConfirmed { run, hash },
            Err(err) => {
                warn!(run = %run, hash = %hash, error = %err, "Approval did not confirm");
                Signal::Failed {
                    run,
                    error: err.into_confirmation(hash),
                }
            }
        };
        self.handle(signal);
    }

    async fn run_main(&self, run: RunId, action: PendingAction) {
        let call = self.inner.adapter.call(&action);
        let hash = match self.inner.writer.submit(&call).await {
            Ok(hash) => hash,
            Err(err) => {
                warn!(run = %run, kind = %call.kind, error = %err, "Submission failed");
                self.handle(Signal::Failed {
                    run,
                    error: err.into_workflow(),
                });
                return;
            }
        };
        self.handle(Signal::MainSubmitted { run, hash });

        let signal = match await_receipt(self.inner.writer.as_ref(), hash).await {
            Ok(receipt) if receipt.success => Signal::MainConfirmed { run, hash },
            Ok(_) => Signal::Failed {
                run,
                error: WorkflowError::ConfirmationFailed {
                    hash,
                    reason: "transaction reverted".to_string(),
                },
            },
            Err(error) => Signal::Failed { run, error },
        };
        if let Signal::Failed { error, .. } = &signal {
            warn!(run = %run, hash = %hash, error = %error, "Transaction did not confirm");
        }
        self.handle(signal);
    }
}

impl std::fmt::Debug for WorkflowEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkflowEngine")
            .field("action", &self.inner.adapter.kind())
            .field("step", &self.step())
            .finish_non_exhaustive()
    }
}
