//! Breed matcher port - the external vision/language model.

use async_trait::async_trait;

use crate::domain::MatchRequest;

/// Sends one image plus catalog to an inference backend and returns its reply.
#[async_trait]
pub trait BreedMatcher: Send + Sync {
    /// Returns the backend's parsed JSON body on success. The body is relayed
    /// to the caller as-is, so it must be a JSON object.
    async fn match_breed(
        &self,
        request: &MatchRequest,
    ) -> Result<serde_json::Map<String, serde_json::Value>, MatchError>;
}

/// Breed matcher errors.
#[derive(Debug, thiserror::Error)]
pub enum MatchError {
    /// The backend answered with a non-success status.
    #[error("Upstream returned {status}")]
    Upstream { status: u16, message: Option<String> },

    #[error("Transport failed: {0}")]
    Transport(String),

    #[error("Invalid upstream response: {0}")]
    InvalidResponse(String),

    #[error("Client setup failed: {0}")]
    Setup(String),
}
