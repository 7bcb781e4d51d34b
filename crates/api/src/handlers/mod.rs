pub mod activity;
pub mod cron;
pub mod posts;
pub mod review;

use chrono::{DateTime, Utc};
use masthead_core::types::Timestamp;
use serde::{Deserialize, Deserializer};

use crate::error::{AppError, AppResult};

/// Parse an ISO-8601 timestamp from a request body field.
pub(crate) fn parse_timestamp(field: &str, raw: &str) -> AppResult<Timestamp> {
    DateTime::parse_from_rfc3339(raw.trim())
        .map(|t| t.with_timezone(&Utc))
        .map_err(|_| {
            AppError::validation(format!(
                "Invalid {field} '{raw}'. Expected an ISO-8601 timestamp"
            ))
        })
}

pub(crate) fn parse_optional_timestamp(
    field: &str,
    raw: Option<&str>,
) -> AppResult<Option<Timestamp>> {
    raw.map(|r| parse_timestamp(field, r)).transpose()
}

/// Distinguish an explicit `null` (`Some(None)`) from an absent field (`None`).
/// Pair with `#[serde(default)]`.
pub(crate) fn explicit_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_utc_and_offset_timestamps() {
        let a = parse_timestamp("deadline", "2026-03-01T12:00:00Z").unwrap();
        let b = parse_timestamp("deadline", "2026-03-01T14:00:00+02:00").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn rejects_garbage_timestamp() {
        let err = parse_timestamp("deadline", "tomorrow").unwrap_err();
        assert!(err.to_string().contains("Invalid deadline 'tomorrow'"));
    }
}
