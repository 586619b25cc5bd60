//! Application state - shared across all handlers.

use std::sync::Arc;

use breedmatch_core::domain::PromptTemplate;
use breedmatch_core::ports::{BreedMatcher, RateLimiter};
use breedmatch_infra::{AnthropicMatcher, FallbackRateLimiter, InMemoryRateLimiter};

#[cfg(feature = "redis")]
use breedmatch_infra::{RedisRateLimitConfig, RedisRateLimiter};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub limiter: Arc<dyn RateLimiter>,
    /// In-memory counters, kept for the background sweep.
    pub memory_limiter: Arc<InMemoryRateLimiter>,
    /// `None` when no API credential is configured.
    pub matcher: Option<Arc<dyn BreedMatcher>>,
    pub max_requests: u32,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> Self {
        let memory_limiter = Arc::new(InMemoryRateLimiter::new(config.rate_limit.clone()));
        let durable = Self::durable_limiter(config).await;
        let limiter: Arc<dyn RateLimiter> = Arc::new(FallbackRateLimiter::new(
            durable,
            memory_limiter.clone(),
        ));

        let matcher: Option<Arc<dyn BreedMatcher>> = match &config.anthropic {
            Some(anthropic) => {
                let prompt = Self::load_prompt(config);
                match AnthropicMatcher::new(anthropic.clone(), prompt) {
                    Ok(matcher) => {
                        tracing::info!(
                            model = %anthropic.model,
                            timeout_secs = anthropic.timeout.as_secs(),
                            max_retries = anthropic.max_retries,
                            "Inference client configured"
                        );
                        Some(Arc::new(matcher))
                    }
                    Err(e) => {
                        tracing::error!("Failed to build inference client: {}", e);
                        None
                    }
                }
            }
            None => {
                tracing::warn!("ANTHROPIC_API_KEY not set. Match requests will fail with 500.");
                None
            }
        };

        tracing::info!(
            rate_limit_backend = limiter.backend(),
            max_requests = config.rate_limit.max_requests,
            window_secs = config.rate_limit.window.as_secs(),
            "Application state initialized"
        );

        Self::from_parts(limiter, memory_limiter, matcher, config.rate_limit.max_requests)
    }

    pub fn from_parts(
        limiter: Arc<dyn RateLimiter>,
        memory_limiter: Arc<InMemoryRateLimiter>,
        matcher: Option<Arc<dyn BreedMatcher>>,
        max_requests: u32,
    ) -> Self {
        Self {
            limiter,
            memory_limiter,
            matcher,
            max_requests,
        }
    }

    #[cfg(feature = "redis")]
    async fn durable_limiter(config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
        let Some(redis) = &config.redis else {
            tracing::warn!("REDIS_URL not set. Rate limiting with in-memory counters only.");
            return None;
        };

        let redis_config = RedisRateLimitConfig::from_env(redis.clone(), config.rate_limit.clone());
        match RedisRateLimiter::new(redis_config).await {
            Ok(limiter) => Some(Arc::new(limiter)),
            Err(e) => {
                tracing::error!(
                    "Failed to connect to Redis: {}. Using in-memory rate limiting.",
                    e
                );
                None
            }
        }
    }

    #[cfg(not(feature = "redis"))]
    async fn durable_limiter(_config: &AppConfig) -> Option<Arc<dyn RateLimiter>> {
        tracing::info!("Running without redis feature - using in-memory rate limiting");
        None
    }

    fn load_prompt(config: &AppConfig) -> PromptTemplate {
        let Some(path) = &config.prompt_template_path else {
            return PromptTemplate::default();
        };

        match std::fs::read_to_string(path) {
            Ok(text) => PromptTemplate::new(text).unwrap_or_else(|| {
                tracing::warn!(
                    path = %path.display(),
                    "Prompt template has no {{slug_list}} marker, using built-in template"
                );
                PromptTemplate::default()
            }),
            Err(e) => {
                tracing::warn!(
                    path = %path.display(),
                    error = %e,
                    "Failed to read prompt template, using built-in template"
                );
                PromptTemplate::default()
            }
        }
    }
}
