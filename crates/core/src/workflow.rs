//! Editorial workflow statuses and the review transition table.
//!
//! Every review action is resolved through [`plan`], which maps
//! `(action, review status, article status)` to the target statuses and the
//! side effects the engine must apply. Nothing else in the codebase compares
//! statuses to decide whether an action is allowed.

use crate::error::CoreError;
use crate::review::FeedbackType;

// ---------------------------------------------------------------------------
// Statuses
// ---------------------------------------------------------------------------

text_enum! {
    /// Lifecycle status of an article.
    ArticleStatus ("article status") {
        Draft = "DRAFT",
        PendingReview = "PENDING_REVIEW",
        InReview = "IN_REVIEW",
        ChangesRequested = "CHANGES_REQUESTED",
        Approved = "APPROVED",
        Rejected = "REJECTED",
        Scheduled = "SCHEDULED",
        Published = "PUBLISHED",
    }
}

text_enum! {
    /// Status of the editorial review record attached to an article.
    ReviewStatus ("review status") {
        Pending = "PENDING",
        Assigned = "ASSIGNED",
        InReview = "IN_REVIEW",
        Approved = "APPROVED",
        Rejected = "REJECTED",
        ChangesRequested = "CHANGES_REQUESTED",
    }
}

impl ReviewStatus {
    /// Whether reaching this status records a terminal decision
    /// (`reviewed_at` is stamped).
    pub fn is_decision(self) -> bool {
        matches!(self, ReviewStatus::Approved | ReviewStatus::Rejected)
    }
}

// ---------------------------------------------------------------------------
// Actions
// ---------------------------------------------------------------------------

text_enum! {
    /// An editor action submitted against the review queue.
    ReviewAction ("action") {
        Assign = "assign",
        StartReview = "start_review",
        Approve = "approve",
        Reject = "reject",
        RequestChanges = "request_changes",
        SetPriority = "set_priority",
        SetDeadline = "set_deadline",
    }
}

/// What the engine must do besides moving statuses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    /// Take ownership of the review through the claim gate.
    Claim,
    /// Record a decision; feedback is appended with the given type.
    Decide {
        feedback_type: FeedbackType,
        feedback_required: bool,
    },
    /// Update the priority field only.
    SetPriority,
    /// Update the deadline field only.
    SetDeadline,
}

/// A resolved transition for one action against the current state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    pub action: ReviewAction,
    pub review_from: ReviewStatus,
    pub review_to: ReviewStatus,
    pub article_from: ArticleStatus,
    pub article_to: ArticleStatus,
    pub effect: Effect,
}

impl Transition {
    /// Whether the article row must be rewritten.
    pub fn changes_article(&self) -> bool {
        self.article_from != self.article_to
    }
}

// ---------------------------------------------------------------------------
// Transition table
// ---------------------------------------------------------------------------

/// One row of the transition table. `None` targets keep the current value.
struct Rule {
    action: ReviewAction,
    review_from: &'static [ReviewStatus],
    article_from: &'static [ArticleStatus],
    review_to: Option<ReviewStatus>,
    article_to: Option<ArticleStatus>,
    effect: Effect,
}

/// Statuses in which a decision may be recorded.
const DECIDABLE_REVIEW: &[ReviewStatus] = &[
    ReviewStatus::Pending,
    ReviewStatus::Assigned,
    ReviewStatus::InReview,
];
const DECIDABLE_ARTICLE: &[ArticleStatus] =
    &[ArticleStatus::PendingReview, ArticleStatus::InReview];

const CLAIMABLE_REVIEW: &[ReviewStatus] = &[ReviewStatus::Pending, ReviewStatus::Assigned];
const CLAIMABLE_ARTICLE: &[ArticleStatus] = &[ArticleStatus::PendingReview];

const RULES: &[Rule] = &[
    Rule {
        action: ReviewAction::Assign,
        review_from: CLAIMABLE_REVIEW,
        article_from: CLAIMABLE_ARTICLE,
        review_to: Some(ReviewStatus::Assigned),
        article_to: None,
        effect: Effect::Claim,
    },
    Rule {
        action: ReviewAction::StartReview,
        review_from: CLAIMABLE_REVIEW,
        article_from: CLAIMABLE_ARTICLE,
        review_to: Some(ReviewStatus::InReview),
        article_to: Some(ArticleStatus::InReview),
        effect: Effect::Claim,
    },
    Rule {
        action: ReviewAction::Approve,
        review_from: DECIDABLE_REVIEW,
        article_from: DECIDABLE_ARTICLE,
        review_to: Some(ReviewStatus::Approved),
        article_to: Some(ArticleStatus::Approved),
        effect: Effect::Decide {
            feedback_type: FeedbackType::Approval,
            feedback_required: false,
        },
    },
    Rule {
        action: ReviewAction::Reject,
        review_from: DECIDABLE_REVIEW,
        article_from: DECIDABLE_ARTICLE,
        review_to: Some(ReviewStatus::Rejected),
        article_to: Some(ArticleStatus::Rejected),
        effect: Effect::Decide {
            feedback_type: FeedbackType::Rejection,
            feedback_required: true,
        },
    },
    Rule {
        action: ReviewAction::RequestChanges,
        review_from: DECIDABLE_REVIEW,
        article_from: DECIDABLE_ARTICLE,
        review_to: Some(ReviewStatus::ChangesRequested),
        article_to: Some(ArticleStatus::ChangesRequested),
        effect: Effect::Decide {
            feedback_type: FeedbackType::RevisionRequest,
            feedback_required: true,
        },
    },
    Rule {
        action: ReviewAction::SetPriority,
        review_from: ReviewStatus::ALL,
        article_from: ArticleStatus::ALL,
        review_to: None,
        article_to: None,
        effect: Effect::SetPriority,
    },
    Rule {
        action: ReviewAction::SetDeadline,
        review_from: ReviewStatus::ALL,
        article_from: ArticleStatus::ALL,
        review_to: None,
        article_to: None,
        effect: Effect::SetDeadline,
    },
];

/// Resolve `action` against the current review and article statuses.
///
/// Returns a validation error naming the current state when the action is
/// not permitted from it.
pub fn plan(
    action: ReviewAction,
    review: ReviewStatus,
    article: ArticleStatus,
) -> Result<Transition, CoreError> {
    let rule = RULES
        .iter()
        .find(|r| r.action == action)
        .ok_or_else(|| CoreError::Internal(format!("No transition rule for '{action}'")))?;

    if !rule.review_from.contains(&review) || !rule.article_from.contains(&article) {
        return Err(CoreError::Validation(format!(
            "Cannot {action} while article is {article} and review is {review}"
        )));
    }

    Ok(Transition {
        action,
        review_from: review,
        review_to: rule.review_to.unwrap_or(review),
        article_from: article,
        article_to: rule.article_to.unwrap_or(article),
        effect: rule.effect,
    })
}

// ---------------------------------------------------------------------------
// Submission
// ---------------------------------------------------------------------------

/// Outcome of submitting an article for review.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Submission {
    /// First submission of a draft.
    Initial,
    /// Resubmission after changes were requested; the review cycle advances.
    Resubmission,
}

/// Validate that an article in `status` may be submitted for review.
pub fn plan_submission(status: ArticleStatus) -> Result<Submission, CoreError> {
    match status {
        ArticleStatus::Draft => Ok(Submission::Initial),
        ArticleStatus::ChangesRequested => Ok(Submission::Resubmission),
        other => Err(CoreError::Validation(format!(
            "Cannot submit an article that is {other}; only DRAFT or CHANGES_REQUESTED articles can be submitted"
        ))),
    }
}

/// Whether the author may still edit the article content.
pub fn is_editable(status: ArticleStatus) -> bool {
    matches!(
        status,
        ArticleStatus::Draft | ArticleStatus::ChangesRequested
    )
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
