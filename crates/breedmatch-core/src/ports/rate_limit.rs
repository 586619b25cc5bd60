//! Rate limiting port.

use async_trait::async_trait;

use crate::domain::ClientId;

/// Rate limiter trait - abstraction over quota counter backends.
///
/// Reading the quota and spending it are separate calls: a request only
/// spends quota once its match has been produced.
#[async_trait]
pub trait RateLimiter: Send + Sync {
    /// Report whether `client` may make one more attempt, and how many remain.
    /// Does not consume quota.
    async fn query(&self, client: &ClientId) -> Result<RateLimitStatus, RateLimitError>;

    /// Record one consumed attempt for `client`.
    async fn increment(&self, client: &ClientId) -> Result<(), RateLimitError>;

    /// Short backend label for logs and health output.
    fn backend(&self) -> &'static str;
}

/// Answer to a quota query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitStatus {
    pub allowed: bool,
    pub remaining: u32,
}

impl RateLimitStatus {
    /// Status for a client that has used `count` of `max` attempts.
    pub fn from_count(count: u32, max: u32) -> Self {
        Self {
            allowed: count < max,
            remaining: max.saturating_sub(count),
        }
    }

    /// Status for a client with an untouched window.
    pub fn fresh(max: u32) -> Self {
        Self::from_count(0, max)
    }
}

/// Rate limit errors.
#[derive(Debug, thiserror::Error)]
pub enum RateLimitError {
    #[error("Backend error: {0}")]
    Backend(String),
}
