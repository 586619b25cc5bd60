//! Durable-first rate limiter that falls back to process-local counters.

use std::sync::Arc;

use async_trait::async_trait;

use breedmatch_core::domain::ClientId;
use breedmatch_core::ports::{RateLimitError, RateLimitStatus, RateLimiter};

use super::InMemoryRateLimiter;

/// Composes an optional durable backend with an always-available in-memory
/// one.
///
/// Every call goes to the durable backend first. If it is absent or errors,
/// the same call is answered by the in-memory counters and the error is only
/// logged, so callers never see which backend served them. This wrapper
/// itself never returns an error.
pub struct FallbackRateLimiter {
    durable: Option<Arc<dyn RateLimiter>>,
    fallback: Arc<InMemoryRateLimiter>,
}

impl FallbackRateLimiter {
    pub fn new(durable: Option<Arc<dyn RateLimiter>>, fallback: Arc<InMemoryRateLimiter>) -> Self {
        Self { durable, fallback }
    }

    /// In-memory counters only.
    pub fn memory_only(fallback: Arc<InMemoryRateLimiter>) -> Self {
        Self::new(None, fallback)
    }

    pub fn fallback(&self) -> &Arc<InMemoryRateLimiter> {
        &self.fallback
    }
}

#[async_trait]
impl RateLimiter for FallbackRateLimiter {
    async fn query(&self, client: &ClientId) -> Result<RateLimitStatus, RateLimitError> {
        if let Some(durable) = &self.durable {
            match durable.query(client).await {
                Ok(status) => return Ok(status),
                Err(e) => tracing::warn!(
                    backend = durable.backend(),
                    client = %client,
                    error = %e,
                    "Durable rate limit query failed, using in-memory counters"
                ),
            }
        }

        self.fallback.query(client).await
    }

    async fn increment(&self, client: &ClientId) -> Result<(), RateLimitError> {
        if let Some(durable) = &self.durable {
            match durable.increment(client).await {
                Ok(()) => return Ok(()),
                Err(e) => tracing::warn!(
                    backend = durable.backend(),
                    client = %client,
                    error = %e,
                    "Durable rate limit increment failed, using in-memory counters"
                ),
            }
        }

        self.fallback.increment(client).await
    }

    fn backend(&self) -> &'static str {
        match &self.durable {
            Some(durable) => durable.backend(),
            None => self.fallback.backend(),
        }
    }
}
