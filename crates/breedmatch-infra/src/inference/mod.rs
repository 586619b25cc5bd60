//! Inference API clients.

mod anthropic;

pub use anthropic::{AnthropicConfig, AnthropicMatcher};
