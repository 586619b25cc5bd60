//! # Breedmatch Infrastructure
//!
//! Concrete implementations of the ports defined in `breedmatch-core`:
//! quota counters and the inference API client.
//!
//! ## Feature Flags
//!
//! - `full` (default) - All features enabled
//! - `minimal` - No external store, in-memory counters only
//! - `redis` - Redis-backed durable rate limit counters

pub mod inference;
pub mod rate_limit;

// Re-exports - In-Memory
pub use rate_limit::{FallbackRateLimiter, InMemoryRateLimiter, RateLimitConfig};

pub use inference::{AnthropicConfig, AnthropicMatcher};

// Re-exports - Redis
#[cfg(feature = "redis")]
pub use rate_limit::{RedisConfig, RedisRateLimitConfig, RedisRateLimiter};
