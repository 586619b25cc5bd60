//! Application configuration loaded from environment variables.

use std::env;
use std::path::PathBuf;
use std::time::Duration;

use breedmatch_infra::{AnthropicConfig, RateLimitConfig};

#[cfg(feature = "redis")]
use breedmatch_infra::RedisConfig;

use crate::middleware::cors::CorsPolicy;
use crate::telemetry::TelemetryConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub host: String,
    pub port: u16,
    pub rate_limit: RateLimitConfig,
    /// How often expired in-memory windows are purged.
    pub sweep_interval: Duration,
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
    /// `None` when no API key is set; match requests then fail with 500.
    pub anthropic: Option<AnthropicConfig>,
    pub prompt_template_path: Option<PathBuf>,
    pub cors: CorsPolicy,
    pub telemetry: TelemetryConfig,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            host: env::var("HOST").unwrap_or_else(|_| "127.0.0.1".to_string()),
            port: env::var("PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            rate_limit: RateLimitConfig::from_env(),
            sweep_interval: Duration::from_secs(
                env::var("RATE_LIMIT_SWEEP_SECS")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .filter(|secs: &u64| *secs > 0)
                    .unwrap_or(3600),
            ),
            #[cfg(feature = "redis")]
            redis: RedisConfig::from_env(),
            anthropic: AnthropicConfig::from_env(),
            prompt_template_path: env::var("PROMPT_TEMPLATE_PATH").ok().map(PathBuf::from),
            cors: env::var("ALLOWED_ORIGINS")
                .ok()
                .map(|origins| CorsPolicy::from_list(&origins))
                .unwrap_or_default(),
            telemetry: TelemetryConfig::from_env(),
        }
    }
}
