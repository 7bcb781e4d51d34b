//! Shared-secret extractor for the scheduled-publication trigger.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use masthead_core::error::CoreError;

use super::auth::bearer_token;
use crate::auth::secret::secret_matches;
use crate::error::AppError;
use crate::state::AppState;

/// Proof that the caller presented `Bearer <CRON_SECRET>`.
///
/// Every call is rejected with 401 while no secret is configured.
pub struct CronAuth;

impl FromRequestParts<AppState> for CronAuth {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let Some(expected) = state.config.cron_secret.as_deref() else {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Cron trigger is not configured".into(),
            )));
        };

        let provided = bearer_token(parts)?;
        if !secret_matches(provided, expected) {
            return Err(AppError::Core(CoreError::Unauthorized(
                "Invalid cron secret".into(),
            )));
        }
        Ok(CronAuth)
    }
}
