//! # Match Proxy
//!
//! Rate-limited proxy that forwards a visitor's photo to a vision/language
//! model and returns which dog breed they resemble.

use actix_web::{App, HttpServer, web};
use tracing_actix_web::TracingLogger;

mod background;
mod config;
mod handlers;
mod middleware;
mod state;
mod telemetry;

use config::AppConfig;
use middleware::cors::CorsMiddleware;
use state::AppState;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::from_env();

    // Initialize tracing
    telemetry::init_telemetry(&config.telemetry);

    tracing::info!(
        "Starting match proxy on {}:{}",
        config.host,
        config.port
    );

    // Build application state
    let state = AppState::new(&config).await;

    background::spawn_window_sweeper(state.memory_limiter.clone(), config.sweep_interval);

    let cors = config.cors.clone();

    // Start HTTP server
    HttpServer::new(move || {
        App::new()
            .wrap(CorsMiddleware::new(cors.clone()))
            .wrap(TracingLogger::default())
            .app_data(web::Data::new(state.clone()))
            .configure(handlers::configure_routes)
    })
    .bind((config.host.as_str(), config.port))?
    .run()
    .await
}
