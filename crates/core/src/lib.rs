//! Masthead core domain logic.
//!
//! This crate has zero internal dependencies so it can be shared by the
//! repository layer, the HTTP server, and any future CLI tooling. It holds
//! the workflow transition table, domain enums, validation helpers, and the
//! shared error type.

#[macro_use]
mod text_enum;

pub mod article;
pub mod audit;
pub mod error;
pub mod pagination;
pub mod publishing;
pub mod review;
pub mod roles;
pub mod types;
pub mod workflow;
