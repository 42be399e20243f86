//! Moderation review workflow states and transition rules.
//!
//! Item and user reviews share one status column walking
//! `pending -> in_review -> review_completed`, with an appeal branch
//! `review_completed -> appeal_pending -> appeal_in_review ->
//! appeal_completed`. Transitions are enforced server-side: every workflow
//! mutation calls [`ensure_transition`] before touching the row, and the DB
//! layer applies the update with a compare-and-set on the old status.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Statuses
-------------------------------------------------------------------------- */

/// Review awaiting a moderator.
pub const STATUS_PENDING: &str = "pending";

/// A moderator has started reviewing.
pub const STATUS_IN_REVIEW: &str = "in_review";

/// A decision has been recorded.
pub const STATUS_REVIEW_COMPLETED: &str = "review_completed";

/// The reported party appealed the decision.
pub const STATUS_APPEAL_PENDING: &str = "appeal_pending";

/// A moderator has started reviewing the appeal.
pub const STATUS_APPEAL_IN_REVIEW: &str = "appeal_in_review";

/// An appeal decision has been recorded.
pub const STATUS_APPEAL_COMPLETED: &str = "appeal_completed";

/// All valid review status values.
pub const VALID_STATUSES: &[&str] = &[
    STATUS_PENDING,
    STATUS_IN_REVIEW,
    STATUS_REVIEW_COMPLETED,
    STATUS_APPEAL_PENDING,
    STATUS_APPEAL_IN_REVIEW,
    STATUS_APPEAL_COMPLETED,
];

/* --------------------------------------------------------------------------
Decisions
-------------------------------------------------------------------------- */

/// Review decision: the report was justified.
pub const DECISION_APPROVED: &str = "approved";

/// Review decision: the report was dismissed.
pub const DECISION_REJECTED: &str = "rejected";

/// Appeal decision: the original decision stands.
pub const APPEAL_DECISION_UPHELD: &str = "upheld";

/// Appeal decision: the original decision is reversed.
pub const APPEAL_DECISION_OVERTURNED: &str = "overturned";

/// Valid review decision values.
pub const VALID_DECISIONS: &[&str] = &[DECISION_APPROVED, DECISION_REJECTED];

/// Valid appeal decision values.
pub const VALID_APPEAL_DECISIONS: &[&str] = &[APPEAL_DECISION_UPHELD, APPEAL_DECISION_OVERTURNED];

/// Maximum length for decision notes and appeal reasons.
pub const MAX_NOTES_LENGTH: usize = 10_000;

/* --------------------------------------------------------------------------
Transition rules
-------------------------------------------------------------------------- */

/// Whether `from -> to` is a legal workflow step.
pub fn can_transition(from: &str, to: &str) -> bool {
    matches!(
        (from, to),
        (STATUS_PENDING, STATUS_IN_REVIEW)
            | (STATUS_IN_REVIEW, STATUS_REVIEW_COMPLETED)
            | (STATUS_REVIEW_COMPLETED, STATUS_APPEAL_PENDING)
            | (STATUS_APPEAL_PENDING, STATUS_APPEAL_IN_REVIEW)
            | (STATUS_APPEAL_IN_REVIEW, STATUS_APPEAL_COMPLETED)
    )
}

/// Gate a workflow mutation, returning an illegal-transition error (mapped
/// to 409 by the HTTP layer) for any step outside the state machine.
pub fn ensure_transition(from: &str, to: &str) -> Result<(), CoreError> {
    if can_transition(from, to) {
        Ok(())
    } else {
        Err(CoreError::IllegalTransition {
            from: from.to_string(),
            to: to.to_string(),
        })
    }
}

/// Validate a review decision value.
pub fn validate_decision(decision: &str) -> Result<(), CoreError> {
    if VALID_DECISIONS.contains(&decision) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid decision '{decision}'. Must be one of: {}",
            VALID_DECISIONS.join(", ")
        )))
    }
}

/// Validate an appeal decision value.
pub fn validate_appeal_decision(decision: &str) -> Result<(), CoreError> {
    if VALID_APPEAL_DECISIONS.contains(&decision) {
        Ok(())
    } else {
        Err(CoreError::Validation(format!(
            "Invalid appeal decision '{decision}'. Must be one of: {}",
            VALID_APPEAL_DECISIONS.join(", ")
        )))
    }
}

/// Validate free-text workflow notes (decision notes, appeal reasons).
pub fn validate_notes(notes: &Option<String>) -> Result<(), CoreError> {
    if let Some(n) = notes {
        if n.len() > MAX_NOTES_LENGTH {
            return Err(CoreError::Validation(format!(
                "Notes exceed maximum length of {MAX_NOTES_LENGTH} characters"
            )));
        }
    }
    Ok(())
}

/* --------------------------------------------------------------------------
Tests
-------------------------------------------------------------------------- */

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn happy_path_transitions() {
        assert!(can_transition(STATUS_PENDING, STATUS_IN_REVIEW));
        assert!(can_transition(STATUS_IN_REVIEW, STATUS_REVIEW_COMPLETED));
        assert!(can_transition(STATUS_REVIEW_COMPLETED, STATUS_APPEAL_PENDING));
        assert!(can_transition(STATUS_APPEAL_PENDING, STATUS_APPEAL_IN_REVIEW));
        assert!(can_transition(STATUS_APPEAL_IN_REVIEW, STATUS_APPEAL_COMPLETED));
    }

    #[test]
    fn skipping_states_is_rejected() {
        assert!(!can_transition(STATUS_PENDING, STATUS_REVIEW_COMPLETED));
        assert!(!can_transition(STATUS_PENDING, STATUS_APPEAL_PENDING));
        assert!(!can_transition(STATUS_IN_REVIEW, STATUS_APPEAL_COMPLETED));
    }

    #[test]
    fn no_backwards_transitions() {
        assert!(!can_transition(STATUS_IN_REVIEW, STATUS_PENDING));
        assert!(!can_transition(STATUS_REVIEW_COMPLETED, STATUS_IN_REVIEW));
        assert!(!can_transition(STATUS_APPEAL_COMPLETED, STATUS_APPEAL_PENDING));
    }

    #[test]
    fn terminal_state_has_no_exits() {
        for to in VALID_STATUSES {
            assert!(!can_transition(STATUS_APPEAL_COMPLETED, to));
        }
    }

    #[test]
    fn ensure_transition_carries_both_states() {
        let err = ensure_transition(STATUS_PENDING, STATUS_REVIEW_COMPLETED).unwrap_err();
        match err {
            CoreError::IllegalTransition { from, to } => {
                assert_eq!(from, STATUS_PENDING);
                assert_eq!(to, STATUS_REVIEW_COMPLETED);
            }
            other => panic!("expected IllegalTransition, got {other:?}"),
        }
    }

    #[test]
    fn decision_validation() {
        assert!(validate_decision(DECISION_APPROVED).is_ok());
        assert!(validate_decision(DECISION_REJECTED).is_ok());
        assert!(validate_decision("maybe").is_err());
        assert!(validate_appeal_decision(APPEAL_DECISION_UPHELD).is_ok());
        assert!(validate_appeal_decision(DECISION_APPROVED).is_err());
    }

    #[test]
    fn notes_length_enforced() {
        assert!(validate_notes(&None).is_ok());
        assert!(validate_notes(&Some("fine".to_string())).is_ok());
        assert!(validate_notes(&Some("x".repeat(MAX_NOTES_LENGTH + 1))).is_err());
    }
}
