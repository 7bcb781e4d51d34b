//! Request extractors: authentication, authorization and JSON bodies.
//!
//! - [`auth::AuthUser`] -- the caller identified by a JWT Bearer token.
//! - [`rbac::RequireEditor`] -- requires the `editor` or `admin` role.
//! - [`rbac::RequireAuth`] -- requires any authenticated user.
//! - [`cron::CronAuth`] -- requires the configured cron secret.
//! - [`json::AppJson`] -- a JSON body whose rejections use the API error shape.

pub mod auth;
pub mod cron;
pub mod json;
pub mod rbac;
