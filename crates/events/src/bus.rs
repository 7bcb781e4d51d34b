//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! Events are published only after the originating transaction commits, so
//! subscribers never observe a transition that was rolled back.

use chrono::{DateTime, Utc};
use masthead_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// Event types
// ---------------------------------------------------------------------------

/// Dot-separated event names published by the workflow.
pub mod event_types {
    pub const ARTICLE_SUBMITTED: &str = "article.submitted";
    pub const REVIEW_ASSIGNED: &str = "review.assigned";
    pub const REVIEW_STARTED: &str = "review.started";
    pub const REVIEW_APPROVED: &str = "review.approved";
    pub const REVIEW_REJECTED: &str = "review.rejected";
    pub const REVIEW_CHANGES_REQUESTED: &str = "review.changes_requested";
    pub const ARTICLE_SCHEDULED: &str = "article.scheduled";
    pub const ARTICLE_PUBLISHED: &str = "article.published";

    /// Events the author is notified about.
    pub const AUTHOR_FACING: &[&str] = &[
        REVIEW_APPROVED,
        REVIEW_REJECTED,
        REVIEW_CHANGES_REQUESTED,
    ];
}

// ---------------------------------------------------------------------------
// PlatformEvent
// ---------------------------------------------------------------------------

/// A committed workflow transition on one article.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PlatformEvent {
    /// One of the [`event_types`] constants.
    pub event_type: String,
    pub article_id: DbId,
    pub article_title: String,
    pub author_id: DbId,
    /// Acting user; `None` for the system actor.
    pub actor_user_id: Option<DbId>,
    /// Reviewer feedback attached to the transition, if any.
    pub feedback: Option<String>,
    pub payload: serde_json::Value,
    pub timestamp: DateTime<Utc>,
}

impl PlatformEvent {
    pub fn new(
        event_type: impl Into<String>,
        article_id: DbId,
        article_title: impl Into<String>,
        author_id: DbId,
    ) -> Self {
        Self {
            event_type: event_type.into(),
            article_id,
            article_title: article_title.into(),
            author_id,
            actor_user_id: None,
            feedback: None,
            payload: serde_json::Value::Object(Default::default()),
            timestamp: Utc::now(),
        }
    }

    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }

    pub fn with_feedback(mut self, feedback: Option<String>) -> Self {
        self.feedback = feedback;
        self
    }

    pub fn with_payload(mut self, payload: serde_json::Value) -> Self {
        self.payload = payload;
        self
    }

    /// Whether the article's author should hear about this event.
    pub fn is_author_facing(&self) -> bool {
        event_types::AUTHOR_FACING.contains(&self.event_type.as_str())
    }
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 1024;

/// In-process fan-out event bus, shared as `Arc<EventBus>`.
///
/// ```rust
/// use masthead_events::bus::{event_types, EventBus, PlatformEvent};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(PlatformEvent::new(event_types::REVIEW_APPROVED, 1, "Launch", 2));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<PlatformEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity. Slow receivers observe
    /// `RecvError::Lagged` once the buffer overflows.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers. Dropped when nobody
    /// is subscribed.
    pub fn publish(&self, event: PlatformEvent) {
        let _ = self.sender.send(event);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<PlatformEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publish_and_receive() {
        let bus = EventBus::default();
        let mut rx = bus.subscribe();

        bus.publish(
            PlatformEvent::new(event_types::REVIEW_REJECTED, 42, "Launch", 7)
                .with_actor(3)
                .with_feedback(Some("Off topic".into())),
        );

        let received = rx.recv().await.expect("should receive the event");
        assert_eq!(received.event_type, "review.rejected");
        assert_eq!(received.article_id, 42);
        assert_eq!(received.author_id, 7);
        assert_eq!(received.actor_user_id, Some(3));
        assert_eq!(received.feedback.as_deref(), Some("Off topic"));
    }

    #[test]
    fn publish_with_no_subscribers_does_not_panic() {
        let bus = EventBus::default();
        bus.publish(PlatformEvent::new(event_types::ARTICLE_PUBLISHED, 1, "t", 1));
    }

    #[test]
    fn only_decisions_are_author_facing() {
        let facing = PlatformEvent::new(event_types::REVIEW_CHANGES_REQUESTED, 1, "t", 1);
        let internal = PlatformEvent::new(event_types::REVIEW_STARTED, 1, "t", 1);
        assert!(facing.is_author_facing());
        assert!(!internal.is_author_facing());
    }
}
