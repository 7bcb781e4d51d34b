//! Well-known role name constants.
//!
//! These must match the `CHECK` constraint on `users.role` in
//! `20260301000001_create_users_and_categories.sql`.

pub const ROLE_ADMIN: &str = "admin";
pub const ROLE_EDITOR: &str = "editor";
pub const ROLE_WRITER: &str = "writer";

/// Role snapshot recorded on activity entries written by background jobs.
pub const ROLE_SYSTEM: &str = "system";

/// Roles allowed to perform review and publishing actions.
pub const EDITOR_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR];

/// All roles a user row may carry.
pub const VALID_ROLES: &[&str] = &[ROLE_ADMIN, ROLE_EDITOR, ROLE_WRITER];

/// Whether `role` may act as an editor (review, approve, schedule, publish).
pub fn is_editor_capable(role: &str) -> bool {
    EDITOR_ROLES.contains(&role)
}
