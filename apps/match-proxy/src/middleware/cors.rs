//! CORS middleware - attaches cross-origin headers to every response.

use actix_web::{
    Error,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::header::{self, HeaderValue},
};
use std::future::{Future, Ready, ready};
use std::pin::Pin;
use std::sync::Arc;

const ALLOWED_METHODS: &str = "POST, OPTIONS";
const ALLOWED_HEADERS: &str = "Content-Type";

/// Which origins may read responses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum CorsPolicy {
    /// `Access-Control-Allow-Origin: *`
    #[default]
    AnyOrigin,
    /// Echo the request origin only when it is listed.
    AllowList(Vec<String>),
}

impl CorsPolicy {
    /// Parse a comma-separated origin list. An empty list or a `*` entry
    /// allows any origin.
    pub fn from_list(origins: &str) -> Self {
        let origins: Vec<String> = origins
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|s| s.trim_end_matches('/').to_string())
            .collect();

        if origins.is_empty() || origins.iter().any(|o| o == "*") {
            CorsPolicy::AnyOrigin
        } else {
            CorsPolicy::AllowList(origins)
        }
    }

    /// Value for `Access-Control-Allow-Origin`, or `None` to omit it.
    pub fn allow_origin(&self, origin: Option<&str>) -> Option<String> {
        match self {
            CorsPolicy::AnyOrigin => Some("*".to_string()),
            CorsPolicy::AllowList(allowed) => origin
                .filter(|o| allowed.iter().any(|a| a == o))
                .map(str::to_string),
        }
    }
}

/// Middleware factory that sets CORS headers per [`CorsPolicy`].
pub struct CorsMiddleware {
    policy: Arc<CorsPolicy>,
}

impl CorsMiddleware {
    pub fn new(policy: CorsPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for CorsMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Transform = CorsService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(CorsService {
            service,
            policy: self.policy.clone(),
        }))
    }
}

pub struct CorsService<S> {
    service: S,
    policy: Arc<CorsPolicy>,
}

impl<S, B> Service<ServiceRequest> for CorsService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>>>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let allow_origin = self.policy.allow_origin(
            req.headers()
                .get(header::ORIGIN)
                .and_then(|v| v.to_str().ok()),
        );
        let vary_origin = matches!(*self.policy, CorsPolicy::AllowList(_));

        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;
            let headers = res.headers_mut();

            if let Some(origin) = allow_origin.and_then(|o| HeaderValue::from_str(&o).ok()) {
                headers.insert(header::ACCESS_CONTROL_ALLOW_ORIGIN, origin);
            }
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_METHODS,
                HeaderValue::from_static(ALLOWED_METHODS),
            );
            headers.insert(
                header::ACCESS_CONTROL_ALLOW_HEADERS,
                HeaderValue::from_static(ALLOWED_HEADERS),
            );
            if vary_origin {
                headers.insert(header::VARY, HeaderValue::from_static("Origin"));
            }

            Ok(res)
        })
    }
}
