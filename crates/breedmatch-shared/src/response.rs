//! Error envelope returned on every non-200 response.

use serde::{Deserialize, Serialize};

/// `{ "error": ... }`, optionally with a user-facing message and the
/// remaining quota (set on rate-limit rejections).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub remaining: Option<u32>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            message: None,
            remaining: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_remaining(mut self, remaining: u32) -> Self {
        self.remaining = Some(remaining);
        self
    }

    // Common error constructors
    pub fn method_not_allowed() -> Self {
        Self::new("Method not allowed")
    }

    pub fn internal_error() -> Self {
        Self::new("Internal server error")
    }

    pub fn rate_limited(max_requests: u32) -> Self {
        Self::new("rate_limit")
            .with_message(format!(
                "Vous avez atteint la limite de {max_requests} essais par jour. Revenez demain !"
            ))
            .with_remaining(0)
    }
}
