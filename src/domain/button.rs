//! Action button projection.

use serde::Serialize;

use super::limits::Eligibility;
use super::step::WorkflowStep;
use crate::error::WorkflowError;

/// What the action button shows. Always derived, never stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ButtonState {
    pub text: String,
    pub disabled: bool,
    pub loading: bool,
}

impl ButtonState {
    fn ready(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            disabled: false,
            loading: false,
        }
    }

    fn busy(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            disabled: true,
            loading: true,
        }
    }
}

/// Project the button for the current step.
///
/// In-flight steps always win over eligibility so a running transaction is
/// never hidden behind an "unavailable" label. The `Error` step offers a
/// retry only when `error` is retryable; otherwise the button starts a fresh
/// attempt, matching the modal.
#[must_use]
pub fn button_state(
    step: WorkflowStep,
    label: &str,
    needs_approval: bool,
    error: Option<&WorkflowError>,
    eligibility: &Eligibility,
) -> ButtonState {
    match step {
        WorkflowStep::Approving => return ButtonState::busy("Approving..."),
        WorkflowStep::Submitting => return ButtonState::busy("Confirm in wallet..."),
        WorkflowStep::Confirming => return ButtonState::busy("Confirming..."),
        WorkflowStep::Idle | WorkflowStep::Confirmed | WorkflowStep::Error => {}
    }

    if !eligibility.permitted {
        return ButtonState {
            text: eligibility
                .reason
                .clone()
                .unwrap_or_else(|| "Unavailable".to_string()),
            disabled: true,
            loading: false,
        };
    }

    match step {
        WorkflowStep::Confirmed => ButtonState {
            text: format!("{label} confirmed"),
            disabled: true,
            loading: false,
        },
        WorkflowStep::Error if error.is_some_and(WorkflowError::is_retryable) => {
            ButtonState::ready("Try again")
        }
        _ if needs_approval => ButtonState::ready(format!("Approve & {label}")),
        _ => ButtonState::ready(label),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;

    #[test]
    fn idle_shows_label() {
        let state = button_state(WorkflowStep::Idle, "Contribute", false, None, &Eligibility::default());
        assert_eq!(state, ButtonState::ready("Contribute"));
    }

    #[test]
    fn idle_with_approval_prefixes_label() {
        let state = button_state(WorkflowStep::Idle, "Deposit", true, None, &Eligibility::default());
        assert_eq!(state.text, "Approve & Deposit");
        assert!(!state.disabled);
    }

    #[test]
    fn in_flight_steps_are_disabled_and_loading() {
        for step in [
            WorkflowStep::Approving,
            WorkflowStep::Submitting,
            WorkflowStep::Confirming,
        ] {
            let state = button_state(step, "Refund", false, None, &Eligibility::denied("closed"));
            assert!(state.disabled && state.loading, "{step}");
        }
    }

    #[test]
    fn ineligible_idle_shows_reason() {
        let state = button_state(
            WorkflowStep::Idle,
            "Finalize",
            false,
            None,
            &Eligibility::denied("Sale still open"),
        );
        assert_eq!(state.text, "Sale still open");
        assert!(state.disabled);
        assert!(!state.loading);
    }

    #[test]
    fn retryable_error_offers_retry() {
        let state = button_state(
            WorkflowStep::Error,
            "Withdraw",
            false,
            Some(&WorkflowError::UserRejected),
            &Eligibility::default(),
        );
        assert_eq!(state.text, "Try again");
        assert!(!state.disabled);
    }

    #[test]
    fn validation_error_does_not_offer_retry() {
        let error = WorkflowError::Validation(ValidationError::ZeroAmount);
        let state = button_state(
            WorkflowStep::Error,
            "Contribute",
            true,
            Some(&error),
            &Eligibility::default(),
        );
        assert_eq!(state, ButtonState::ready("Approve & Contribute"));
    }
}
