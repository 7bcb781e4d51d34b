//! Author notification delivery.
//!
//! The notification router composes a [`Notification`] for each
//! author-facing event and hands it to a [`NotificationSink`]. Sink failures
//! are reported to the caller, which logs and discards them.

use async_trait::async_trait;

use crate::bus::{event_types, PlatformEvent};

pub mod email;
pub mod log;

/// Error type for notification delivery failures.
#[derive(Debug, thiserror::Error)]
pub enum DeliveryError {
    /// SMTP transport-level failure (authentication, connection, etc.).
    #[error("SMTP transport error: {0}")]
    Transport(#[from] lettre::transport::smtp::Error),

    /// The recipient or sender address could not be parsed.
    #[error("Email address parse error: {0}")]
    Address(#[from] lettre::address::AddressError),

    /// The message could not be assembled.
    #[error("Message build error: {0}")]
    Build(String),
}

/// A message addressed to one recipient.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub recipient: String,
    pub subject: String,
    pub body: String,
}

impl Notification {
    /// Compose the author notification for a decision event.
    ///
    /// Returns `None` for events the author is not told about.
    pub fn for_event(event: &PlatformEvent, recipient: &str) -> Option<Self> {
        let title = &event.article_title;
        let (subject, lead) = match event.event_type.as_str() {
            event_types::REVIEW_APPROVED => (
                format!("Your article \"{title}\" was approved"),
                "Your article has been approved and is ready for publication.",
            ),
            event_types::REVIEW_REJECTED => (
                format!("Your article \"{title}\" was rejected"),
                "Your article was not accepted.",
            ),
            event_types::REVIEW_CHANGES_REQUESTED => (
                format!("Changes requested on \"{title}\""),
                "An editor has requested changes before your article can be approved.",
            ),
            _ => return None,
        };

        let body = match event.feedback.as_deref() {
            Some(feedback) => format!("{lead}\n\nEditor feedback:\n{feedback}"),
            None => lead.to_string(),
        };

        Some(Self {
            recipient: recipient.to_string(),
            subject,
            body,
        })
    }
}

/// A delivery channel for author notifications.
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Short channel name used in logs.
    fn name(&self) -> &'static str;

    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError>;
}
