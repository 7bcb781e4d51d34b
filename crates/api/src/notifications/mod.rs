//! Author notification routing.
//!
//! The [`NotificationRouter`] subscribes to the event bus and delivers a
//! notification to the article's author for every review decision.

pub mod router;

pub use router::NotificationRouter;
