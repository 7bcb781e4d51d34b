//! Authentication primitives.
//!
//! - [`jwt`] -- access-token generation and validation.
//! - [`secret`] -- constant-shape comparison for shared trigger secrets.

pub mod jwt;
pub mod secret;
