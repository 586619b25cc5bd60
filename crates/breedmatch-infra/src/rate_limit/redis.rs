//! Redis rate limiter - durable day-scoped counters shared across instances.

use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, Script};

use breedmatch_core::domain::ClientId;
use breedmatch_core::ports::{RateLimitError, RateLimitStatus, RateLimiter};

use super::RateLimitConfig;

/// Redis connection configuration.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis URL (e.g., redis://localhost:6379)
    pub url: String,
    /// Connection timeout
    pub connect_timeout: Duration,
}

impl RedisConfig {
    /// Load configuration from environment variables. `None` when `REDIS_URL`
    /// is unset.
    pub fn from_env() -> Option<Self> {
        let url = std::env::var("REDIS_URL").ok().filter(|s| !s.is_empty())?;
        Some(Self {
            url,
            connect_timeout: Duration::from_secs(
                std::env::var("REDIS_CONNECT_TIMEOUT_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(5),
            ),
        })
    }
}

/// Redis rate limiter configuration.
#[derive(Debug, Clone)]
pub struct RedisRateLimitConfig {
    /// Redis connection config
    pub redis: RedisConfig,
    /// Quota and window
    pub limits: RateLimitConfig,
    /// Key prefix for rate limit keys
    pub key_prefix: String,
}

impl RedisRateLimitConfig {
    /// Reads the key prefix from `RATE_LIMIT_KEY_PREFIX` (default `ratelimit`).
    pub fn from_env(redis: RedisConfig, limits: RateLimitConfig) -> Self {
        Self {
            redis,
            limits,
            key_prefix: std::env::var("RATE_LIMIT_KEY_PREFIX")
                .unwrap_or_else(|_| "ratelimit".to_string()),
        }
    }
}

/// Redis-backed rate limiter using one expiring counter per client.
///
/// The key's TTL is the window: the counter is created at 1 with the window
/// as expiry and disappears on its own once the window ends.
pub struct RedisRateLimiter {
    conn: ConnectionManager,
    config: RedisRateLimitConfig,
    /// Lua script for atomic increment with expiry
    script: Script,
}

impl RedisRateLimiter {
    pub async fn new(config: RedisRateLimitConfig) -> Result<Self, RateLimitError> {
        let client = Client::open(config.redis.url.as_str())
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        // Use timeout to prevent hanging if Redis is unreachable
        let conn_manager_fut = ConnectionManager::new(client);
        let conn = tokio::time::timeout(config.redis.connect_timeout, conn_manager_fut)
            .await
            .map_err(|_| RateLimitError::Backend("Connection timed out".to_string()))?
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        // INCR creates a missing key at 1; only then is the expiry attached,
        // so later increments never extend the window.
        let script = Script::new(
            r#"
            local current = redis.call('INCR', KEYS[1])
            if current == 1 then
                redis.call('EXPIRE', KEYS[1], tonumber(ARGV[1]))
            end
            return current
            "#,
        );

        tracing::info!(url = %config.redis.url, "Connected to Redis rate limiter");

        Ok(Self {
            conn,
            config,
            script,
        })
    }

    fn make_key(&self, client: &ClientId) -> String {
        format!("{}:{}", self.config.key_prefix, client)
    }

    fn window_secs(&self) -> u64 {
        self.config.limits.window.as_secs().max(1)
    }
}

#[async_trait]
impl RateLimiter for RedisRateLimiter {
    async fn query(&self, client: &ClientId) -> Result<RateLimitStatus, RateLimitError> {
        let key = self.make_key(client);
        let mut conn = self.conn.clone();

        let count: Option<u32> = conn
            .get(&key)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        let max = self.config.limits.max_requests;
        Ok(match count {
            Some(count) => RateLimitStatus::from_count(count, max),
            None => RateLimitStatus::fresh(max),
        })
    }

    async fn increment(&self, client: &ClientId) -> Result<(), RateLimitError> {
        let key = self.make_key(client);
        let mut conn = self.conn.clone();

        let current: i64 = self
            .script
            .key(&key)
            .arg(self.window_secs())
            .invoke_async(&mut conn)
            .await
            .map_err(|e| RateLimitError::Backend(e.to_string()))?;

        tracing::debug!(key = %key, count = current, "Rate limit counter incremented");
        Ok(())
    }

    fn backend(&self) -> &'static str {
        "redis"
    }
}
