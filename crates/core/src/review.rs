//! Review record enums and feedback validation.
//!
//! Priority and feedback type literals must match the `CHECK` constraints in
//! `20260301000003_create_review_records.sql`.

use crate::error::CoreError;

/* --------------------------------------------------------------------------
Constants
-------------------------------------------------------------------------- */

/// Maximum length for a feedback comment.
pub const MAX_FEEDBACK_LENGTH: usize = 10_000;

/// Maximum length for free-text reviewer notes.
pub const MAX_NOTES_LENGTH: usize = 5_000;

/* --------------------------------------------------------------------------
Enums
-------------------------------------------------------------------------- */

text_enum! {
    /// Queue priority of a review record.
    Priority ("priority") {
        Urgent = "URGENT",
        High = "HIGH",
        Normal = "NORMAL",
        Low = "LOW",
    }
}

impl Priority {
    /// Sort rank used by the review queue; lower ranks are served first.
    pub fn rank(self) -> i16 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Normal => 2,
            Priority::Low => 3,
        }
    }
}

impl Default for Priority {
    fn default() -> Self {
        Priority::Normal
    }
}

text_enum! {
    /// Kind of decision a feedback entry was written for.
    FeedbackType ("feedback type") {
        Approval = "APPROVAL",
        Rejection = "REJECTION",
        RevisionRequest = "REVISION_REQUEST",
    }
}

/* --------------------------------------------------------------------------
Validation functions
-------------------------------------------------------------------------- */

/// Normalize an optional feedback comment.
///
/// Whitespace-only comments are treated as absent. When `required` is set a
/// missing comment is a validation error; comments longer than
/// [`MAX_FEEDBACK_LENGTH`] are always rejected.
pub fn normalize_feedback(
    feedback: Option<&str>,
    required: bool,
) -> Result<Option<String>, CoreError> {
    let trimmed = feedback.map(str::trim).filter(|f| !f.is_empty());

    match trimmed {
        None if required => Err(CoreError::Validation(
            "Feedback is required for this action".to_string(),
        )),
        None => Ok(None),
        Some(text) if text.chars().count() > MAX_FEEDBACK_LENGTH => {
            Err(CoreError::Validation(format!(
                "Feedback exceeds maximum length of {MAX_FEEDBACK_LENGTH} characters"
            )))
        }
        Some(text) => Ok(Some(text.to_string())),
    }
}

/// Validate reviewer notes length.
pub fn validate_notes(notes: &str) -> Result<(), CoreError> {
    if notes.chars().count() > MAX_NOTES_LENGTH {
        return Err(CoreError::Validation(format!(
            "Notes exceed maximum length of {MAX_NOTES_LENGTH} characters"
        )));
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
    fn priority_round_trips_through_literal() {
        for p in Priority::ALL {
            assert_eq!(p.as_str().parse::<Priority>().unwrap(), *p);
        }
    }

    #[test]
    fn unknown_priority_rejected() {
        let err = "CRITICAL".parse::<Priority>().unwrap_err();
        assert!(err.to_string().contains("Invalid priority 'CRITICAL'"));
        assert!(err.to_string().contains("URGENT, HIGH, NORMAL, LOW"));
    }

    #[test]
    fn priority_rank_orders_urgent_first() {
        let mut all = Priority::ALL.to_vec();
        all.sort_by_key(|p| p.rank());
        assert_eq!(
            all,
            vec![Priority::Urgent, Priority::High, Priority::Normal, Priority::Low]
        );
    }

    #[test]
    fn default_priority_is_normal() {
        assert_eq!(Priority::default(), Priority::Normal);
    }

    #[test]
    fn priority_serializes_as_literal() {
        let json = serde_json::to_string(&Priority::High).unwrap();
        assert_eq!(json, "\"HIGH\"");
        let back: Priority = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(back, Priority::Low);
    }

    #[test]
    fn required_feedback_missing_is_validation_error() {
        assert!(normalize_feedback(None, true).is_err());
        assert!(normalize_feedback(Some("   \n"), true).is_err());
    }

    #[test]
    fn optional_feedback_blank_becomes_none() {
        assert_eq!(normalize_feedback(Some("  "), false).unwrap(), None);
        assert_eq!(normalize_feedback(None, false).unwrap(), None);
    }

    #[test]
    fn feedback_is_trimmed() {
        assert_eq!(
            normalize_feedback(Some("  Fix the intro \n"), true).unwrap(),
            Some("Fix the intro".to_string())
        );
    }

    #[test]
    fn overlong_feedback_rejected() {
        let long = "x".repeat(MAX_FEEDBACK_LENGTH + 1);
        let err = normalize_feedback(Some(&long), false).unwrap_err();
        assert!(err.to_string().contains("maximum length"));
    }

    #[test]
    fn notes_length_enforced() {
        assert!(validate_notes("short").is_ok());
        assert!(validate_notes(&"n".repeat(MAX_NOTES_LENGTH + 1)).is_err());
    }
}
