//! Log-only sink used when SMTP is not configured.

use async_trait::async_trait;

use super::{DeliveryError, Notification, NotificationSink};

/// Writes notifications to the tracing log instead of sending them.
#[derive(Debug, Default)]
pub struct LogSink;

#[async_trait]
impl NotificationSink for LogSink {
    fn name(&self) -> &'static str {
        "log"
    }

    async fn deliver(&self, notification: &Notification) -> Result<(), DeliveryError> {
        tracing::info!(
            to = %notification.recipient,
            subject = %notification.subject,
            "Notification (log sink)",
        );
        Ok(())
    }
}
