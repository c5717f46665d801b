use alloy_primitives::{TxHash, U256};
use thiserror::Error;

use crate::domain::step::WorkflowStep;

/// Configuration-related errors with structured variants.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Pre-flight validation failures. Raised before any signer or network call.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("amount must be greater than zero")]
    ZeroAmount,

    #[error("amount {amount} is below the minimum of {minimum}")]
    BelowMinimum { amount: U256, minimum: U256 },

    #[error("amount {amount} exceeds balance {balance}")]
    InsufficientBalance { amount: U256, balance: U256 },

    #[error("amount {amount} exceeds the remaining cap of {cap}")]
    CapExceeded { amount: U256, cap: U256 },

    #[error("action not permitted: {reason}")]
    NotPermitted { reason: String },
}

/// Failures of a single workflow run.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkflowError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("request rejected in wallet")]
    UserRejected,

    #[error("failed to submit transaction: {0}")]
    SubmissionFailed(String),

    #[error("transaction {hash} failed: {reason}")]
    ConfirmationFailed { hash: TxHash, reason: String },

    #[error("a workflow run is already in progress ({step})")]
    Busy { step: WorkflowStep },
}

impl WorkflowError {
    /// Whether the UI should offer a retry control for this failure.
    ///
    /// Validation failures need different input, not a retry; `Busy` is a
    /// caller error and never reaches the `Error` step.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::UserRejected | Self::SubmissionFailed(_) | Self::ConfirmationFailed { .. }
        )
    }
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Workflow(#[from] WorkflowError),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    #[error("connection error: {0}")]
    Connection(String),

    #[error("parse error: {0}")]
    Parse(String),
}

pub type Result<T> = std::result::Result<T, Error>;

impl From<ValidationError> for Error {
    fn from(err: ValidationError) -> Self {
        Error::Workflow(WorkflowError::Validation(err))
    }
}

impl From<dialoguer::Error> for Error {
    fn from(err: dialoguer::Error) -> Self {
        // dialoguer::Error wraps an IO error
        Error::Io(std::io::Error::other(err.to_string()))
    }
}

impl Error {
    /// Collapse any error crossing a chain port into the workflow taxonomy.
    ///
    /// Errors that already carry a workflow classification keep it; anything
    /// else (transport, RPC, parsing) becomes `SubmissionFailed`.
    #[must_use]
    pub fn into_workflow(self) -> WorkflowError {
        match self {
            Error::Workflow(err) => err,
            other => WorkflowError::SubmissionFailed(other.to_string()),
        }
    }

    /// Classify an error raised after `hash` was accepted by the network.
    ///
    /// The transaction may still be mined, so this is never a submission
    /// failure; a reverted receipt keeps its own reason.
    #[must_use]
    pub fn into_confirmation(self, hash: TxHash) -> WorkflowError {
        match self {
            Error::Workflow(err @ WorkflowError::ConfirmationFailed { .. }) => err,
            other => WorkflowError::ConfirmationFailed {
                hash,
                reason: other.to_string(),
            },
        }
    }

    /// Whether retrying the same request may succeed (RPC hiccups).
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn retryable_classes() {
        assert!(WorkflowError::UserRejected.is_retryable());
        assert!(WorkflowError::SubmissionFailed("rpc down".into()).is_retryable());
        assert!(WorkflowError::ConfirmationFailed {
            hash: TxHash::ZERO,
            reason: "reverted".into(),
        }
        .is_retryable());
        assert!(!WorkflowError::Validation(ValidationError::ZeroAmount).is_retryable());
    }

    #[test]
    fn into_workflow_keeps_classification() {
        let err = Error::Workflow(WorkflowError::UserRejected);
        assert_eq!(err.into_workflow(), WorkflowError::UserRejected);
    }

    #[test]
    fn errors_after_submission_are_confirmation_failures() {
        let hash = TxHash::repeat_byte(0x07);
        let err = Error::Connection("502 bad gateway".into()).into_confirmation(hash);
        assert!(matches!(
            &err,
            WorkflowError::ConfirmationFailed { hash: h, reason } if *h == hash && reason.contains("502")
        ));

        let reverted = WorkflowError::ConfirmationFailed {
            hash,
            reason: "approval reverted".into(),
        };
        assert_eq!(Error::Workflow(reverted.clone()).into_confirmation(hash), reverted);
    }

    #[test]
    fn only_connection_errors_are_transient() {
        assert!(Error::Connection("timeout".into()).is_transient());
        assert!(!Error::Parse("bad receipt".into()).is_transient());
        assert!(!Error::Workflow(WorkflowError::UserRejected).is_transient());
    }

    #[test]
    fn into_workflow_wraps_transport_errors() {
        let err = Error::Connection("timeout".into());
        assert!(matches!(
            err.into_workflow(),
            WorkflowError::SubmissionFailed(msg) if msg.contains("timeout")
        ));
    }
}
