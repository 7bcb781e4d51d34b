//! Publication schedule rules.
//!
//! Resolves operator schedule-control requests (publish now, schedule,
//! cancel schedule) into a [`ScheduleCommand`] and checks them against the
//! article's current status. Review rejection always takes precedence: a
//! `REJECTED` article can never be scheduled, published, or reverted to
//! draft through schedule control.

use crate::error::CoreError;
use crate::types::Timestamp;
use crate::workflow::ArticleStatus;

/// Default interval between scheduled-publication sweeps.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 300;

/// Default maximum number of posts promoted per sweep.
pub const DEFAULT_SWEEP_BATCH_SIZE: i64 = 100;

/// Statuses from which an operator may publish or schedule a post.
pub const PUBLISHABLE_FROM: &[ArticleStatus] = &[
    ArticleStatus::Draft,
    ArticleStatus::Approved,
    ArticleStatus::Scheduled,
];

/// An operator schedule-control request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScheduleCommand {
    /// Publish immediately. `published_at` overrides the stamp when given.
    PublishNow { published_at: Option<Timestamp> },
    /// Schedule (or reschedule) publication at `at`.
    Schedule { at: Timestamp },
    /// Cancel a pending schedule and revert to draft.
    CancelSchedule,
}

impl ScheduleCommand {
    /// Build a command from a `PATCH` payload.
    ///
    /// | `status`    | Required fields | Command            |
    /// |-------------|-----------------|--------------------|
    /// | `PUBLISHED` | --              | `PublishNow`       |
    /// | `SCHEDULED` | `scheduled_at`  | `Schedule`         |
    /// | `DRAFT`     | --              | `CancelSchedule`   |
    pub fn from_patch(
        status: ArticleStatus,
        scheduled_at: Option<Timestamp>,
        published_at: Option<Timestamp>,
        now: Timestamp,
    ) -> Result<Self, CoreError> {
        match status {
            ArticleStatus::Published => {
                if let Some(at) = published_at {
                    if at > now {
                        return Err(CoreError::Validation(
                            "published_at cannot be in the future; schedule the post instead"
                                .to_string(),
                        ));
                    }
                }
                Ok(ScheduleCommand::PublishNow { published_at })
            }
            ArticleStatus::Scheduled => {
                let at = scheduled_at.ok_or_else(|| {
                    CoreError::Validation(
                        "scheduled_at is required when scheduling a post".to_string(),
                    )
                })?;
                Ok(ScheduleCommand::Schedule { at })
            }
            ArticleStatus::Draft => Ok(ScheduleCommand::CancelSchedule),
            other => Err(CoreError::Validation(format!(
                "Status {other} cannot be set directly; use the review workflow"
            ))),
        }
    }

    /// Status the article ends in after the command.
    pub fn target_status(&self) -> ArticleStatus {
        match self {
            ScheduleCommand::PublishNow { .. } => ArticleStatus::Published,
            ScheduleCommand::Schedule { .. } => ArticleStatus::Scheduled,
            ScheduleCommand::CancelSchedule => ArticleStatus::Draft,
        }
    }

    /// Check the command against the article's current status.
    pub fn validate_from(&self, current: ArticleStatus) -> Result<(), CoreError> {
        if current == ArticleStatus::Rejected {
            return Err(CoreError::Validation(
                "Article was rejected in review; rejection cannot be overridden by schedule control"
                    .to_string(),
            ));
        }

        let allowed = match self {
            ScheduleCommand::PublishNow { .. } | ScheduleCommand::Schedule { .. } => {
                PUBLISHABLE_FROM.contains(&current)
            }
            ScheduleCommand::CancelSchedule => current == ArticleStatus::Scheduled,
        };

        if allowed {
            Ok(())
        } else {
            Err(CoreError::Validation(format!(
                "Cannot move article from {current} to {}",
                self.target_status()
            )))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};

    #[test]
    fn published_patch_is_publish_now() {
        let now = Utc::now();
        let cmd = ScheduleCommand::from_patch(ArticleStatus::Published, None, None, now).unwrap();
        assert_eq!(cmd, ScheduleCommand::PublishNow { published_at: None });
        assert_eq!(cmd.target_status(), ArticleStatus::Published);
    }

    #[test]
    fn future_published_at_rejected() {
        let now = Utc::now();
        let err = ScheduleCommand::from_patch(
            ArticleStatus::Published,
            None,
            Some(now + Duration::hours(1)),
            now,
        )
        .unwrap_err();
        assert!(err.to_string().contains("cannot be in the future"));
    }

    #[test]
    fn scheduled_patch_requires_time() {
        let now = Utc::now();
        assert!(ScheduleCommand::from_patch(ArticleStatus::Scheduled, None, None, now).is_err());
        let at = now + Duration::days(1);
        assert_eq!(
            ScheduleCommand::from_patch(ArticleStatus::Scheduled, Some(at), None, now).unwrap(),
            ScheduleCommand::Schedule { at }
        );
    }

    #[test]
    fn past_schedule_time_is_accepted() {
        let now = Utc::now();
        let at = now - Duration::minutes(1);
        assert!(ScheduleCommand::from_patch(ArticleStatus::Scheduled, Some(at), None, now).is_ok());
    }

    #[test]
    fn draft_patch_is_cancel() {
        let now = Utc::now();
        assert_eq!(
            ScheduleCommand::from_patch(ArticleStatus::Draft, None, None, now).unwrap(),
            ScheduleCommand::CancelSchedule
        );
    }

    #[test]
    fn workflow_statuses_cannot_be_patched() {
        let now = Utc::now();
        for status in [
            ArticleStatus::Approved,
            ArticleStatus::Rejected,
            ArticleStatus::InReview,
            ArticleStatus::PendingReview,
            ArticleStatus::ChangesRequested,
        ] {
            assert!(ScheduleCommand::from_patch(status, None, None, now).is_err());
        }
    }

    #[test]
    fn rejection_wins_over_schedule_control() {
        let at = Utc::now();
        for cmd in [
            ScheduleCommand::PublishNow { published_at: None },
            ScheduleCommand::Schedule { at },
            ScheduleCommand::CancelSchedule,
        ] {
            let err = cmd.validate_from(ArticleStatus::Rejected).unwrap_err();
            assert!(err.to_string().contains("rejected in review"));
        }
    }

    #[test]
    fn publish_allowed_from_draft_approved_scheduled() {
        let cmd = ScheduleCommand::PublishNow { published_at: None };
        assert!(cmd.validate_from(ArticleStatus::Draft).is_ok());
        assert!(cmd.validate_from(ArticleStatus::Approved).is_ok());
        assert!(cmd.validate_from(ArticleStatus::Scheduled).is_ok());
        assert!(cmd.validate_from(ArticleStatus::InReview).is_err());
        assert!(cmd.validate_from(ArticleStatus::Published).is_err());
    }

    #[test]
    fn cancel_only_from_scheduled() {
        let cmd = ScheduleCommand::CancelSchedule;
        assert!(cmd.validate_from(ArticleStatus::Scheduled).is_ok());
        assert!(cmd.validate_from(ArticleStatus::Draft).is_err());
        assert!(cmd.validate_from(ArticleStatus::Approved).is_err());
    }
}
