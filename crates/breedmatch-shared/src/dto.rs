//! Data Transfer Objects - request/response types for the API.

use serde::{Deserialize, Serialize};

/// Body of `POST /api/match-breed`.
///
/// Every field is optional on the wire so that missing fields surface as a
/// validation error rather than a deserialization failure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MatchRequestBody {
    #[serde(default)]
    pub image_base64: Option<String>,
    #[serde(default)]
    pub mime_type: Option<String>,
    /// Breed catalog text inserted into the prompt: a bare slug list or a
    /// richer annotated listing.
    #[serde(default)]
    pub slug_list: Option<String>,
}

/// Body of `GET /api/health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub timestamp: String,
    pub rate_limit_backend: String,
    pub matcher_configured: bool,
}
