//! Masthead event bus and author notification delivery.
//!
//! - [`EventBus`]: in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`; the workflow engine publishes after commit.
//! - [`PlatformEvent`]: the workflow event envelope.
//! - [`delivery`]: the [`NotificationSink`] seam with SMTP and log-only
//!   implementations.

pub mod bus;
pub mod delivery;

pub use bus::{event_types, EventBus, PlatformEvent};
pub use delivery::email::{EmailConfig, EmailDelivery};
pub use delivery::log::LogSink;
pub use delivery::{DeliveryError, Notification, NotificationSink};
