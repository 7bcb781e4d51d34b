use std::time::Duration;

use masthead_core::publishing::{DEFAULT_SWEEP_BATCH_SIZE, DEFAULT_SWEEP_INTERVAL_SECS};

use crate::auth::jwt::JwtConfig;

/// Default timeout for a single notification delivery attempt.
const DEFAULT_NOTIFICATION_TIMEOUT_SECS: u64 = 10;

/// Server configuration loaded from environment variables.
///
/// All fields have sensible defaults suitable for local development.
/// In production, override via environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Bind address (default: `0.0.0.0`).
    pub host: String,
    /// Bind port (default: `3000`).
    pub port: u16,
    /// Allowed CORS origins, parsed from comma-separated `CORS_ORIGINS` env var.
    pub cors_origins: Vec<String>,
    /// HTTP request timeout in seconds (default: `30`).
    pub request_timeout_secs: u64,
    /// How long background tasks get to drain after the listener stops.
    pub shutdown_timeout_secs: u64,
    pub jwt: JwtConfig,
    /// Shared secret for the scheduled-publication trigger. The endpoint
    /// refuses every call when unset.
    pub cron_secret: Option<String>,
    pub sweeper: SweeperConfig,
    /// Upper bound on one notification delivery, in seconds.
    pub notification_timeout_secs: u64,
}

/// In-process scheduled-publication sweep settings.
#[derive(Debug, Clone)]
pub struct SweeperConfig {
    pub enabled: bool,
    pub interval_secs: u64,
    pub batch_size: i64,
}

impl Default for SweeperConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            batch_size: DEFAULT_SWEEP_BATCH_SIZE,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables with defaults.
    ///
    /// | Env Var                     | Default                    |
    /// |-----------------------------|----------------------------|
    /// | `HOST`                      | `0.0.0.0`                  |
    /// | `PORT`                      | `3000`                     |
    /// | `CORS_ORIGINS`              | `http://localhost:5173`    |
    /// | `REQUEST_TIMEOUT_SECS`      | `30`                       |
    /// | `SHUTDOWN_TIMEOUT_SECS`     | `30`                       |
    /// | `CRON_SECRET`               | unset (trigger disabled)   |
    /// | `SWEEPER_ENABLED`           | `true`                     |
    /// | `SWEEP_INTERVAL_SECS`       | `300`                      |
    /// | `SWEEP_BATCH_SIZE`          | `100`                      |
    /// | `NOTIFICATION_TIMEOUT_SECS` | `10`                       |
    pub fn from_env() -> Self {
        let host = std::env::var("HOST").unwrap_or_else(|_| "0.0.0.0".into());

        let port: u16 = std::env::var("PORT")
            .unwrap_or_else(|_| "3000".into())
            .parse()
            .expect("PORT must be a valid u16");

        let cors_origins = parse_origins(
            &std::env::var("CORS_ORIGINS").unwrap_or_else(|_| "http://localhost:5173".into()),
        );

        let request_timeout_secs: u64 = std::env::var("REQUEST_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("REQUEST_TIMEOUT_SECS must be a valid u64");

        let shutdown_timeout_secs: u64 = std::env::var("SHUTDOWN_TIMEOUT_SECS")
            .unwrap_or_else(|_| "30".into())
            .parse()
            .expect("SHUTDOWN_TIMEOUT_SECS must be a valid u64");

        let cron_secret = std::env::var("CRON_SECRET")
            .ok()
            .filter(|s| !s.trim().is_empty());

        let sweeper = SweeperConfig {
            enabled: std::env::var("SWEEPER_ENABLED")
                .map(|v| parse_flag(&v))
                .unwrap_or(true),
            interval_secs: std::env::var("SWEEP_INTERVAL_SECS")
                .unwrap_or_else(|_| DEFAULT_SWEEP_INTERVAL_SECS.to_string())
                .parse()
                .expect("SWEEP_INTERVAL_SECS must be a valid u64"),
            batch_size: std::env::var("SWEEP_BATCH_SIZE")
                .unwrap_or_else(|_| DEFAULT_SWEEP_BATCH_SIZE.to_string())
                .parse()
                .expect("SWEEP_BATCH_SIZE must be a valid i64"),
        };
        assert!(sweeper.interval_secs > 0, "SWEEP_INTERVAL_SECS must be positive");
        assert!(sweeper.batch_size > 0, "SWEEP_BATCH_SIZE must be positive");

        let notification_timeout_secs: u64 = std::env::var("NOTIFICATION_TIMEOUT_SECS")
            .unwrap_or_else(|_| DEFAULT_NOTIFICATION_TIMEOUT_SECS.to_string())
            .parse()
            .expect("NOTIFICATION_TIMEOUT_SECS must be a valid u64");

        let jwt = JwtConfig::from_env();

        Self {
            host,
            port,
            cors_origins,
            request_timeout_secs,
            shutdown_timeout_secs,
            jwt,
            cron_secret,
            sweeper,
            notification_timeout_secs,
        }
    }

    pub fn notification_timeout(&self) -> Duration {
        Duration::from_secs(self.notification_timeout_secs)
    }

    pub fn shutdown_timeout(&self) -> Duration {
        Duration::from_secs(self.shutdown_timeout_secs)
    }
}

/// Split a comma-separated origin list, dropping blanks.
fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect()
}

fn parse_flag(raw: &str) -> bool {
    !matches!(
        raw.trim().to_ascii_lowercase().as_str(),
        "0" | "false" | "no" | "off"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn origins_are_trimmed_and_blanks_dropped() {
        assert_eq!(
            parse_origins(" http://a.test , ,http://b.test"),
            vec!["http://a.test".to_string(), "http://b.test".to_string()]
        );
    }

    #[test]
    fn flag_parsing() {
        assert!(parse_flag("true"));
        assert!(parse_flag("1"));
        assert!(!parse_flag("false"));
        assert!(!parse_flag(" OFF "));
    }

    #[test]
    fn sweeper_defaults() {
        let cfg = SweeperConfig::default();
        assert!(cfg.enabled);
        assert_eq!(cfg.interval_secs, 300);
        assert_eq!(cfg.batch_size, 100);
    }
}
