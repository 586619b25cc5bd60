//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod matcher;
mod rate_limit;

pub use matcher::{BreedMatcher, MatchError};
pub use rate_limit::{RateLimitError, RateLimitStatus, RateLimiter};
