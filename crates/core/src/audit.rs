//! Activity log action constants and mapping helpers.
//!
//! Literals must match the `CHECK` constraint on `activity_log.action`.

use crate::workflow::ReviewAction;

// ---------------------------------------------------------------------------
// Action constants
// ---------------------------------------------------------------------------

/// Known actions recorded in the activity log.
pub mod actions {
    pub const CREATED: &str = "CREATED";
    pub const UPDATED: &str = "UPDATED";
    pub const SUBMITTED: &str = "SUBMITTED";
    pub const REVIEW_ASSIGNED: &str = "REVIEW_ASSIGNED";
    pub const REVIEW_STARTED: &str = "REVIEW_STARTED";
    pub const APPROVED: &str = "APPROVED";
    pub const REJECTED: &str = "REJECTED";
    pub const CHANGES_REQUESTED: &str = "CHANGES_REQUESTED";
    pub const PRIORITY_CHANGED: &str = "PRIORITY_CHANGED";
    pub const DEADLINE_CHANGED: &str = "DEADLINE_CHANGED";
    pub const SCHEDULED: &str = "SCHEDULED";
    pub const SCHEDULE_CANCELLED: &str = "SCHEDULE_CANCELLED";
    pub const PUBLISHED: &str = "PUBLISHED";

    /// Every known action, for filter validation.
    pub const ALL: &[&str] = &[
        CREATED,
        UPDATED,
        SUBMITTED,
        REVIEW_ASSIGNED,
        REVIEW_STARTED,
        APPROVED,
        REJECTED,
        CHANGES_REQUESTED,
        PRIORITY_CHANGED,
        DEADLINE_CHANGED,
        SCHEDULED,
        SCHEDULE_CANCELLED,
        PUBLISHED,
    ];
}

/// Activity action recorded for a successful review action.
pub fn action_for(action: ReviewAction) -> &'static str {
    match action {
        ReviewAction::Assign => actions::REVIEW_ASSIGNED,
        ReviewAction::StartReview => actions::REVIEW_STARTED,
        ReviewAction::Approve => actions::APPROVED,
        ReviewAction::Reject => actions::REJECTED,
        ReviewAction::RequestChanges => actions::CHANGES_REQUESTED,
        ReviewAction::SetPriority => actions::PRIORITY_CHANGED,
        ReviewAction::SetDeadline => actions::DEADLINE_CHANGED,
    }
}

/// Whether `action` is a known activity action.
pub fn is_known_action(action: &str) -> bool {
    actions::ALL.contains(&action)
}

/// Human-readable detail line for an activity entry.
///
/// `note` carries what changed: the decision feedback, the new priority or
/// deadline, or the publication time.
pub fn describe(action: &str, title: &str, note: Option<&str>) -> String {
    let verb = match action {
        actions::CREATED => "created",
        actions::UPDATED => "updated",
        actions::SUBMITTED => "submitted for review",
        actions::REVIEW_ASSIGNED => "assigned for review",
        actions::REVIEW_STARTED => "review started on",
        actions::APPROVED => "approved",
        actions::REJECTED => "rejected",
        actions::CHANGES_REQUESTED => "requested changes on",
        actions::PRIORITY_CHANGED => "changed priority of",
        actions::DEADLINE_CHANGED => "changed deadline of",
        actions::SCHEDULED => "scheduled",
        actions::SCHEDULE_CANCELLED => "cancelled schedule of",
        actions::PUBLISHED => "published",
        _ => "touched",
    };
    let Some(note) = note else {
        return format!("{verb} \"{title}\"");
    };
    match action {
        actions::PRIORITY_CHANGED | actions::DEADLINE_CHANGED => {
            format!("{verb} \"{title}\" to {note}")
        }
        actions::SCHEDULED => format!("{verb} \"{title}\" for {note}"),
        _ => format!("{verb} \"{title}\": {note}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_review_action_maps_to_known_activity() {
        for action in ReviewAction::ALL {
            assert!(is_known_action(action_for(*action)), "{action}");
        }
    }

    #[test]
    fn start_review_maps_to_review_started() {
        assert_eq!(action_for(ReviewAction::StartReview), actions::REVIEW_STARTED);
    }

    #[test]
    fn unknown_action_rejected() {
        assert!(!is_known_action("DELETED"));
        assert!(!is_known_action("approved"));
    }

    #[test]
    fn describe_includes_title() {
        assert_eq!(
            describe(actions::APPROVED, "Launch day", None),
            "approved \"Launch day\""
        );
        assert_eq!(
            describe(actions::SCHEDULE_CANCELLED, "Draft", None),
            "cancelled schedule of \"Draft\""
        );
    }

    #[test]
    fn describe_appends_what_changed() {
        assert_eq!(
            describe(actions::REJECTED, "Hot take", Some("Plagiarised intro")),
            "rejected \"Hot take\": Plagiarised intro"
        );
        assert_eq!(
            describe(actions::PRIORITY_CHANGED, "Hot take", Some("URGENT")),
            "changed priority of \"Hot take\" to URGENT"
        );
        assert_eq!(
            describe(actions::SCHEDULED, "Weekly", Some("2030-01-01T09:00:00Z")),
            "scheduled \"Weekly\" for 2030-01-01T09:00:00Z"
        );
    }
}
