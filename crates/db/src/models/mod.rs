//! Domain model structs and DTOs.
//!
//! Each submodule contains:
//! - A `FromRow` + `Serialize` entity struct matching the database row
//! - A create DTO for inserts where rows are inserted directly
//!
//! Status columns are kept as `String`; the engine parses them into the
//! `masthead_core` enums before planning a transition.

pub mod activity;
pub mod article;
pub mod category;
pub mod feedback;
pub mod queue;
pub mod review;
pub mod user;
