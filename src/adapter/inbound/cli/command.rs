//! Command-line interface definitions.
//!
//! Defines the CLI structure for the launchflow application using `clap`.

use clap::{Parser, Subcommand};
use rust_decimal::Decimal;
use std::path::PathBuf;

use crate::application::ActionKind;
use crate::domain::WorkflowStep;

/// Approval-aware launchpad and AMM transactions
#[derive(Parser, Debug)]
#[command(name = "launchflow")]
#[command(version)]
pub struct Cli {
    /// Path to the configuration file
    #[arg(short, long, global = true, default_value = "launchflow.toml")]
    pub config: PathBuf,

    /// JSON output for scripting
    #[arg(long, global = true)]
    pub json: bool,

    /// Decrease output verbosity
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Increase output verbosity
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// Top-level subcommands for the launchflow CLI.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run one action, approving the token first when needed
    Run(RunArgs),

    /// Show the wallet's current allowance for each spender
    Allowance,

    /// Print the modal a given workflow step would show
    Modal(ModalArgs),
}

/// Arguments for `launchflow run`.
#[derive(Parser, Debug)]
pub struct RunArgs {
    /// Action to perform (contribute, deposit, finalize, refund, withdraw,
    /// add-liquidity, remove-liquidity)
    pub action: ActionKind,

    /// Project or pool identifier
    #[arg(long)]
    pub id: u64,

    /// Amount in token units (ignored by actions that move no tokens)
    #[arg(long)]
    pub amount: Option<Decimal>,

    /// Sign without prompting
    #[arg(short, long)]
    pub yes: bool,
}

/// Arguments for `launchflow modal`.
#[derive(Parser, Debug)]
pub struct ModalArgs {
    /// Workflow step (idle, approving, submitting, confirming, confirmed, error)
    pub step: WorkflowStep,

    /// Action the modal belongs to
    #[arg(long, default_value = "contribute")]
    pub action: ActionKind,

    /// Failure message for the error step
    #[arg(long, conflicts_with = "rejected")]
    pub error: Option<String>,

    /// Render the error step as a wallet rejection
    #[arg(long)]
    pub rejected: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_run() {
        let cli = Cli::parse_from([
            "launchflow",
            "run",
            "add-liquidity",
            "--id",
            "7",
            "--amount",
            "1.5",
            "-y",
        ]);
        let Commands::Run(args) = cli.command else {
            panic!("expected run");
        };
        assert_eq!(args.action, ActionKind::AddLiquidity);
        assert_eq!(args.id, 7);
        assert_eq!(args.amount, Some(Decimal::new(15, 1)));
        assert!(args.yes);
    }

    #[test]
    fn rejects_unknown_action() {
        assert!(Cli::try_parse_from(["launchflow", "run", "stake", "--id", "1"]).is_err());
    }

    #[test]
    fn parses_modal_with_globals() {
        let cli = Cli::parse_from(["launchflow", "modal", "error", "--rejected", "--json"]);
        assert!(cli.json);
        let Commands::Modal(args) = cli.command else {
            panic!("expected modal");
        };
        assert_eq!(args.step, WorkflowStep::Error);
        assert!(args.rejected);
    }
}
