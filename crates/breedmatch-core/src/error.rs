//! Domain-level error types.

use thiserror::Error;

/// Domain errors - business rule failures on an inbound match request.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum DomainError {
    #[error("Missing required fields")]
    MissingFields,

    #[error("Type d'image non supporté")]
    UnsupportedMimeType(String),

    #[error("Image trop volumineuse (2MB max)")]
    ImageTooLarge { len: usize, max: usize },

    /// The raw body overran the read ceiling before it could be parsed.
    #[error("Image trop volumineuse (2MB max)")]
    BodyTooLarge { limit: usize },
}
