//! Error handling - maps failures onto the `{ "error": ... }` envelope.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use breedmatch_core::DomainError;
use breedmatch_core::ports::MatchError;
use breedmatch_shared::ErrorBody;

/// Application-level error type returned by handlers.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Method not allowed")]
    MethodNotAllowed,

    #[error("Rate limit exceeded")]
    RateLimited { max_requests: u32 },

    /// Deployment fault, e.g. a missing credential.
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Upstream returned {status}")]
    Upstream { status: u16, message: Option<String> },

    #[error("Internal error: {0}")]
    Internal(String),
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Configuration(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Upstream { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let body = match self {
            AppError::BadRequest(detail) => ErrorBody::new(detail.clone()),
            AppError::MethodNotAllowed => ErrorBody::method_not_allowed(),
            AppError::RateLimited { max_requests } => ErrorBody::rate_limited(*max_requests),
            AppError::Configuration(detail) => {
                tracing::error!("Configuration error: {}", detail);
                ErrorBody::new(detail.clone())
            }
            AppError::Upstream { message, .. } => {
                ErrorBody::new(message.clone().unwrap_or_else(|| "API error".to_string()))
            }
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorBody::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(body)
    }
}

// Conversion from domain errors
impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<MatchError> for AppError {
    fn from(err: MatchError) -> Self {
        match err {
            MatchError::Upstream { status, message } => AppError::Upstream { status, message },
            other => AppError::Internal(other.to_string()),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
