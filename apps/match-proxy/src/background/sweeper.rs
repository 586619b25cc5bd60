//! Periodic purge of expired in-memory rate limit windows.

use std::sync::Arc;
use std::time::Duration;

use breedmatch_infra::InMemoryRateLimiter;

/// Spawn a task that drops expired windows every `every`, so the volatile
/// map does not keep one entry per client ever seen.
pub fn spawn_window_sweeper(limiter: Arc<InMemoryRateLimiter>, every: Duration) {
    actix_rt::spawn(async move {
        let mut interval = tokio::time::interval(every);
        // The first tick completes immediately.
        interval.tick().await;

        loop {
            interval.tick().await;
            let purged = limiter.purge_expired().await;
            if purged > 0 {
                tracing::debug!(purged, "Purged expired rate limit windows");
            }
        }
    });

    tracing::info!(interval_secs = every.as_secs(), "Rate limit window sweeper started");
}
