//! Rate limiting implementations.

mod fallback;
mod memory;

pub use fallback::FallbackRateLimiter;
pub use memory::{InMemoryRateLimiter, RateLimitConfig};

#[cfg(feature = "redis")]
mod redis;
#[cfg(feature = "redis")]
pub use self::redis::{RedisConfig, RedisRateLimitConfig, RedisRateLimiter};
