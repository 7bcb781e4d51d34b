//! Event-to-notification routing.
//!
//! Delivery runs after the workflow transaction has committed and is
//! bounded by a timeout; a slow or failing sink is logged and never
//! reaches the request that produced the event.

use std::sync::Arc;
use std::time::Duration;

use masthead_db::repositories::UserRepo;
use masthead_db::DbPool;
use masthead_events::{Notification, NotificationSink, PlatformEvent};
use tokio::sync::broadcast;

/// Routes decision events to the article author through a [`NotificationSink`].
pub struct NotificationRouter {
    pool: DbPool,
    sink: Arc<dyn NotificationSink>,
    timeout: Duration,
}

impl NotificationRouter {
    pub fn new(pool: DbPool, sink: Arc<dyn NotificationSink>, timeout: Duration) -> Self {
        Self {
            pool,
            sink,
            timeout,
        }
    }

    /// Run the routing loop until the [`EventBus`](masthead_events::EventBus)
    /// is dropped.
    pub async fn run(self, mut receiver: broadcast::Receiver<PlatformEvent>) {
        tracing::info!(sink = self.sink.name(), "Notification router started");
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    if let Err(e) = self.route_event(&event).await {
                        tracing::error!(
                            error = %e,
                            event_type = %event.event_type,
                            article_id = event.article_id,
                            "Failed to route event"
                        );
                    }
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Notification router lagged");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!("Event bus closed, notification router shutting down");
                    break;
                }
            }
        }
    }

    /// Notify the author of one event, if it is author-facing.
    ///
    /// Delivery failures and timeouts are logged here; only the author
    /// lookup can return an error.
    pub async fn route_event(&self, event: &PlatformEvent) -> Result<(), sqlx::Error> {
        if !event.is_author_facing() {
            return Ok(());
        }

        let Some(author) = UserRepo::find_by_id(&self.pool, event.author_id).await? else {
            tracing::warn!(
                author_id = event.author_id,
                article_id = event.article_id,
                "Author not found, skipping notification"
            );
            return Ok(());
        };

        let Some(notification) = Notification::for_event(event, &author.email) else {
            return Ok(());
        };

        match tokio::time::timeout(self.timeout, self.sink.deliver(&notification)).await {
            Ok(Ok(())) => {
                tracing::info!(
                    sink = self.sink.name(),
                    event_type = %event.event_type,
                    article_id = event.article_id,
                    author_id = author.id,
                    "Author notified"
                );
            }
            Ok(Err(e)) => {
                tracing::warn!(
                    error = %e,
                    sink = self.sink.name(),
                    article_id = event.article_id,
                    "Notification delivery failed"
                );
            }
            Err(_) => {
                tracing::warn!(
                    sink = self.sink.name(),
                    timeout_secs = self.timeout.as_secs(),
                    article_id = event.article_id,
                    "Notification delivery timed out"
                );
            }
        }

        Ok(())
    }
}
