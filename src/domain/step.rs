//! Workflow step machine states.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Step of a transaction workflow run.
///
/// `Idle` is the initial state. `Confirmed` and `Error` are terminal and
/// collapse back to `Idle` after the reset delay or on manual reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WorkflowStep {
    #[default]
    Idle,
    /// Awaiting signature and inclusion of the allowance approval.
    Approving,
    /// Main action sent to the signer; no hash yet.
    Submitting,
    /// Main action hash known; awaiting inclusion.
    Confirming,
    Confirmed,
    Error,
}

impl WorkflowStep {
    /// Terminal steps: the run is over and only the display window remains.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Confirmed | Self::Error)
    }

    /// Steps where the signer or the network still owns the run.
    #[must_use]
    pub const fn is_in_flight(self) -> bool {
        matches!(self, Self::Approving | Self::Submitting | Self::Confirming)
    }

    /// Stable name used in logs and JSON output.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Approving => "approving",
            Self::Submitting => "submitting",
            Self::Confirming => "confirming",
            Self::Confirmed => "confirmed",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for WorkflowStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for WorkflowStep {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "idle" => Ok(Self::Idle),
            "approving" => Ok(Self::Approving),
            "submitting" => Ok(Self::Submitting),
            "confirming" => Ok(Self::Confirming),
            "confirmed" => Ok(Self::Confirmed),
            "error" => Ok(Self::Error),
            other => Err(format!("unknown workflow step '{other}'")),
        }
    }
}
