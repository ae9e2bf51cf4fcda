use crate::fallback::FallbackEngine;
use anyhow::Result;
use std::sync::Arc;
use std::time::Duration;
use tokio_cron_scheduler::{Job, JobScheduler};
use tracing::{debug, info};

/// Start the periodic cache sweeper.
///
/// Every `interval` the engine's cache drops expired entries and evicts one
/// batch of rarely used ones. The returned scheduler must be kept
/// alive (and shut down) by the caller.
pub async fn start_cache_sweeper(
    engine: Arc<FallbackEngine>,
    interval: Duration,
) -> Result<JobScheduler> {
    let scheduler = JobScheduler::new().await?;

    info!("Scheduling cache sweep every {}s", interval.as_secs());

    let job = Job::new_repeated_async(interval, move |_uuid, _l| {
        let engine = Arc::clone(&engine);

        Box::pin(async move {
            let report = engine.sweep_cache();
            if report.removed() > 0 {
                info!(
                    "Cache sweep removed {} expired and {} cold entries",
                    report.expired, report.evicted
                );
            } else {
                debug!("Cache sweep found nothing to remove");
            }
        })
    })?;

    scheduler.add(job).await?;
    scheduler.start().await?;
    info!("✓ Cache sweeper started");

    Ok(scheduler)
}
