//! Periodic promotion of due scheduled articles.
//!
//! Runs [`sweeper::sweep`](crate::engine::sweeper::sweep) on a fixed
//! interval until cancelled. Disable with `SWEEPER_ENABLED=false` when an
//! external scheduler calls the cron endpoint instead.

use std::sync::Arc;
use std::time::Duration;

use masthead_db::DbPool;
use masthead_events::EventBus;
use tokio_util::sync::CancellationToken;

use crate::config::SweeperConfig;
use crate::engine::sweeper;

/// Run the sweep loop until `cancel` is triggered.
pub async fn run(
    pool: DbPool,
    bus: Arc<EventBus>,
    config: SweeperConfig,
    cancel: CancellationToken,
) {
    tracing::info!(
        interval_secs = config.interval_secs,
        batch_size = config.batch_size,
        "Scheduled publication sweeper started"
    );

    let mut interval = tokio::time::interval(Duration::from_secs(config.interval_secs));

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Scheduled publication sweeper stopping");
                break;
            }
            _ = interval.tick() => {
                match sweeper::sweep(&pool, &bus, config.batch_size).await {
                    Ok(report) if report.published_count == 0 && report.failed_count == 0 => {
                        tracing::debug!("Sweeper: nothing due");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::error!(error = %e, "Sweeper: listing due articles failed");
                    }
                }
            }
        }
    }
}
