//! HTTP handlers and route configuration.

mod health;
mod match_breed;


use actix_web::{http::Method, web};
use breedmatch_core::domain::MAX_IMAGE_BASE64_LEN;

/// Read ceiling for the match request body. Kept well above the image
/// ceiling so that an oversized image is still parsed and reported by
/// payload validation; anything past it is refused with the same 400.
pub const MAX_BODY_BYTES: usize = 4 * MAX_IMAGE_BASE64_LEN;

/// Configure all application routes.
pub fn configure_routes(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::scope("/api")
            .route("/health", web::get().to(health::health_check))
            .service(
                web::resource("/match-breed")
                    .route(web::post().to(match_breed::match_breed))
                    .route(web::method(Method::OPTIONS).to(match_breed::preflight))
                    .default_service(web::to(match_breed::method_not_allowed)),
            ),
    );
}
