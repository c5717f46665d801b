//! `launchflow run`: drive one workflow against the configured chain.

use std::sync::Arc;

use alloy_primitives::U256;
use indicatif::ProgressBar;

use super::command::RunArgs;
use super::confirm::ConfirmingWriter;
use super::console::ConsoleNotifier;
use super::modal;
use super::output::{self, Status};
use crate::adapter::outbound::evm::EvmChain;
use crate::application::workflow::{ChainPorts, RunOutcome, WorkflowSnapshot};
use crate::application::{ActionRequest, AllowanceBook};
use crate::domain::amount::to_base_units;
use crate::domain::{RunId, WorkflowStep};
use crate::error::Result;
use crate::infrastructure::bootstrap::{build_engine, build_notifier_registry, spend_limits};
use crate::infrastructure::config::Config;
use crate::port::outbound::chain::ChainWriter;

/// Execute `launchflow run`.
///
/// # Errors
///
/// Returns an error if configuration is incomplete, the chain cannot be
/// reached, or the run ends in the error step.
pub async fn execute(config: &Config, args: &RunArgs) -> Result<()> {
    let chain = Arc::new(EvmChain::from_config(config)?);
    let writer: Arc<dyn ChainWriter> = if args.yes {
        chain.clone()
    } else {
        Arc::new(ConfirmingWriter::new(chain.clone()))
    };
    let ports = ChainPorts {
        reader: chain.clone(),
        writer,
        allowances: Arc::new(AllowanceBook::new()),
    };
    let notifier = build_notifier_registry(vec![Box::new(ConsoleNotifier)]);
    let engine = build_engine(config, args.action, &ports, Arc::new(notifier))?;

    let amount = if args.action.spends_tokens() {
        to_base_units(args.amount.unwrap_or_default(), config.chain.token_decimals)?
    } else {
        U256::ZERO
    };
    let limits = spend_limits(config, engine.adapter(), chain.as_ref(), ports.writer.account()).await?;
    let request = ActionRequest::new(U256::from(args.id), amount).with_limits(limits);

    output::section(args.action.label());
    output::field("Account", ports.writer.account());
    output::field("Target", engine.adapter().target());
    if args.action.spends_tokens() {
        output::field("Amount", args.amount.unwrap_or_default());
    }

    let run = engine.start(request).await?;
    let outcome = follow(&mut engine.subscribe(), run).await;

    let descriptor = engine.modal();
    modal::print(&descriptor)?;

    match outcome.map(|outcome| outcome.result) {
        Some(Err(err)) => Err(err.into()),
        Some(Ok(_)) => Ok(()),
        None => {
            output::warning("Run was reset before it finished");
            Ok(())
        }
    }
}

/// What the terminal is waiting on, if anything.
fn waiting_on(snapshot: &WorkflowSnapshot) -> Option<&'static str> {
    match snapshot.step {
        WorkflowStep::Approving if snapshot.approval.as_ref().is_some_and(|a| a.hash().is_some()) => {
            Some("Waiting for approval to confirm...")
        }
        WorkflowStep::Confirming => Some("Waiting for confirmation..."),
        _ => None,
    }
}

/// Show progress for `run` until it reaches a terminal step.
async fn follow(
    snapshots: &mut tokio::sync::watch::Receiver<WorkflowSnapshot>,
    run: RunId,
) -> Option<RunOutcome> {
    let mut spinner: Option<ProgressBar> = None;
    let mut waiting = None;

    loop {
        let snapshot = snapshots.borrow_and_update().clone();
        let label = waiting_on(&snapshot);

        if label != waiting {
            if let Some(pb) = spinner.take() {
                finish(&pb, &snapshot);
            }
            spinner = label.map(output::spinner);
            waiting = label;
        }

        if let Some(outcome) = snapshot.outcome_for(run) {
            if let Some(pb) = spinner.take() {
                finish(&pb, &snapshot);
            }
            return Some(outcome.clone());
        }
        if snapshot.run != run || snapshot.step == WorkflowStep::Idle {
            return None;
        }
        if snapshots.changed().await.is_err() {
            return None;
        }
    }
}

fn finish(pb: &ProgressBar, snapshot: &WorkflowSnapshot) {
    if snapshot.step == WorkflowStep::Error {
        output::finish_spinner(pb, Status::Failure, "Failed");
    } else {
        output::finish_spinner(pb, Status::Success, "Done");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::workflow::Workflow;
    use crate::domain::{PendingAction, TransactionKind, TransactionRecord};
    use alloy_primitives::TxHash;

    fn snapshot(step: WorkflowStep, approval_hash: Option<TxHash>) -> WorkflowSnapshot {
        let mut snapshot = Workflow::new(TransactionKind::Contribute).snapshot();
        snapshot.step = step;
        snapshot.pending = Some(PendingAction::new(U256::from(1), U256::from(1)));
        snapshot.approval = Some(match approval_hash {
            Some(hash) => TransactionRecord::new(TransactionKind::Approval).with_hash(hash),
            None => TransactionRecord::new(TransactionKind::Approval),
        });
        snapshot
    }

    #[test]
    fn waits_only_on_mined_transactions() {
        assert_eq!(waiting_on(&snapshot(WorkflowStep::Approving, None)), None);
        assert!(waiting_on(&snapshot(WorkflowStep::Approving, Some(TxHash::ZERO))).is_some());
        assert_eq!(waiting_on(&snapshot(WorkflowStep::Submitting, None)), None);
        assert!(waiting_on(&snapshot(WorkflowStep::Confirming, None)).is_some());
    }
}
