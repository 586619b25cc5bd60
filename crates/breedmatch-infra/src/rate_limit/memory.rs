//! In-memory rate limiter - volatile per-process counters.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use breedmatch_core::domain::ClientId;
use breedmatch_core::ports::{RateLimitError, RateLimitStatus, RateLimiter};

/// Rate limiter configuration shared by every backend.
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum attempts per window.
    pub max_requests: u32,
    /// Window duration.
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 5,
            window: Duration::from_secs(24 * 60 * 60),
        }
    }
}

impl RateLimitConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            max_requests: std::env::var("RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_requests),
            window: std::env::var("RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.window),
        }
    }
}

struct WindowEntry {
    window_start: Instant,
    count: u32,
}

/// Fixed-window counter per client, held in a process-local map.
///
/// Windows open lazily on the first query and reset once older than the
/// configured window. Counts are lost on restart and not shared between
/// instances.
pub struct InMemoryRateLimiter {
    windows: RwLock<HashMap<ClientId, WindowEntry>>,
    config: RateLimitConfig,
}

impl InMemoryRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            windows: RwLock::new(HashMap::new()),
            config,
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    fn is_expired(&self, entry: &WindowEntry, now: Instant) -> bool {
        now.duration_since(entry.window_start) > self.config.window
    }

    /// Drop every window that has run past its duration. Returns how many
    /// entries were removed.
    pub async fn purge_expired(&self) -> usize {
        let now = Instant::now();
        let mut windows = self.windows.write().await;
        let before = windows.len();
        windows.retain(|_, entry| !self.is_expired(entry, now));
        before - windows.len()
    }

    pub async fn tracked_clients(&self) -> usize {
        self.windows.read().await.len()
    }
}

#[async_trait]
impl RateLimiter for InMemoryRateLimiter {
    async fn query(&self, client: &ClientId) -> Result<RateLimitStatus, RateLimitError> {
        let now = Instant::now();
        let mut windows = self.windows.write().await;

        let live_count = windows
            .get(client)
            .filter(|entry| !self.is_expired(entry, now))
            .map(|entry| entry.count);

        match live_count {
            Some(count) => Ok(RateLimitStatus::from_count(count, self.config.max_requests)),
            None => {
                windows.insert(
                    client.clone(),
                    WindowEntry {
                        window_start: now,
                        count: 0,
                    },
                );
                Ok(RateLimitStatus::fresh(self.config.max_requests))
            }
        }
    }

    async fn increment(&self, client: &ClientId) -> Result<(), RateLimitError> {
        let now = Instant::now();
        let mut windows = self.windows.write().await;

        if let Some(entry) = windows.get_mut(client) {
            if !self.is_expired(entry, now) {
                entry.count += 1;
                return Ok(());
            }
        }

        // No live window: the query was answered elsewhere (durable backend
        // failing mid-request), so open one holding this attempt.
        windows.insert(
            client.clone(),
            WindowEntry {
                window_start: now,
                count: 1,
            },
        );

        Ok(())
    }

    fn backend(&self) -> &'static str {
        "memory"
    }
}
