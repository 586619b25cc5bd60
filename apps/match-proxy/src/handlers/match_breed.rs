//! Breed-match proxy handler.

use actix_web::{
    HttpRequest, HttpResponse, ResponseError,
    http::header::{HeaderName, HeaderValue},
    web,
};
use serde_json::Value;

use breedmatch_core::DomainError;
use breedmatch_core::domain::{ClientId, MatchRequest};
use breedmatch_core::ports::{MatchError, RateLimitStatus};
use breedmatch_shared::dto::MatchRequestBody;

use super::MAX_BODY_BYTES;
use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

const RATE_LIMIT_LIMIT: &str = "x-ratelimit-limit";
const RATE_LIMIT_REMAINING: &str = "x-ratelimit-remaining";
const FORWARDED_FOR: &str = "x-forwarded-for";

/// POST /api/match-breed
///
/// The body stream is only read once the quota and credential gates have
/// passed, so an oversized upload still gets a 429 or a JSON 400. Quota
/// headers are attached to every outcome.
pub async fn match_breed(
    req: HttpRequest,
    state: web::Data<AppState>,
    payload: web::Payload,
) -> HttpResponse {
    let client = ClientId::from_forwarded_for(
        req.headers()
            .get(FORWARDED_FOR)
            .and_then(|v| v.to_str().ok()),
    );

    let quota = match state.limiter.query(&client).await {
        Ok(quota) => quota,
        Err(e) => return AppError::Internal(e.to_string()).error_response(),
    };

    let mut response = match proxy_match(&state, &client, quota, payload).await {
        Ok(response) => response,
        Err(e) => e.error_response(),
    };

    let headers = response.headers_mut();
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_LIMIT),
        HeaderValue::from(state.max_requests),
    );
    headers.insert(
        HeaderName::from_static(RATE_LIMIT_REMAINING),
        HeaderValue::from(quota.remaining),
    );

    response
}

async fn proxy_match(
    state: &AppState,
    client: &ClientId,
    quota: RateLimitStatus,
    payload: web::Payload,
) -> AppResult<HttpResponse> {
    if !quota.allowed {
        tracing::warn!(client = %client, "Rate limit exceeded");
        return Err(AppError::RateLimited {
            max_requests: state.max_requests,
        });
    }

    let matcher = state
        .matcher
        .as_ref()
        .ok_or_else(|| AppError::Configuration("API key not configured".to_string()))?;

    let body = payload
        .to_bytes_limited(MAX_BODY_BYTES)
        .await
        .map_err(|_| DomainError::BodyTooLarge {
            limit: MAX_BODY_BYTES,
        })?
        .map_err(|e| AppError::BadRequest(format!("Invalid request body: {e}")))?;

    let body: MatchRequestBody = serde_json::from_slice(&body)
        .map_err(|_| AppError::BadRequest("Invalid JSON body".to_string()))?;
    let request = MatchRequest::parse(body.image_base64, body.mime_type, body.slug_list)?;

    let mut result = matcher.match_breed(&request).await.map_err(|e| {
        if let MatchError::Upstream { status, message } = &e {
            tracing::warn!(
                client = %client,
                status,
                message = message.as_deref().unwrap_or(""),
                "Inference API returned an error"
            );
        }
        AppError::from(e)
    })?;

    // Quota is spent only once a match exists.
    if let Err(e) = state.limiter.increment(client).await {
        tracing::error!(client = %client, error = %e, "Failed to record match attempt");
    }

    let remaining = quota.remaining.saturating_sub(1);
    result.insert("remaining".to_string(), Value::from(remaining));

    tracing::info!(
        client = %client,
        mime_type = %request.mime_type,
        remaining,
        "Breed match served"
    );

    Ok(HttpResponse::Ok().json(Value::Object(result)))
}

/// OPTIONS /api/match-breed
pub async fn preflight() -> HttpResponse {
    HttpResponse::Ok().finish()
}

/// Any other method on /api/match-breed.
pub async fn method_not_allowed() -> HttpResponse {
    AppError::MethodNotAllowed.error_response()
}
