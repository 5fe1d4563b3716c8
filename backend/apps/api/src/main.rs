//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;
mod docs;
mod health;
mod logging;

use analytics::{AnalyticsConfig, PgPageviewRepository, analytics_router};
use axum::{
    Router,
    http::{HeaderValue, Method},
};
use config::Settings;
use contact::{ContactConfig, PgContactRepository, SlackContactNotifier, contact_router};
use kernel::error::app_error::AppError;
use platform::rate_limit::RateLimiter;
use platform::rate_limit::limiter::DEFAULT_PURGE_INTERVAL;
use platform::slack::SlackWebhook;
use sqlx::postgres::PgPoolOptions;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    let settings = Settings::from_env()?;
    // Keeps the file writer flushing until shutdown
    let _log_guard = logging::init_tracing(&settings)?;

    tracing::info!(
        app_env = %settings.app_env,
        rate_limit_enabled = settings.rate_limit.enabled,
        rate_limit_backend = settings.rate_limit.backend_url.is_some(),
        docs_enabled = settings.docs_enabled(),
        "Starting API"
    );

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&settings.database_url)
        .await?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // One limiter for the whole process; both features count through it
    let limiter = Arc::new(RateLimiter::new(settings.rate_limit.clone()));
    limiter.spawn_purge_task(DEFAULT_PURGE_INTERVAL);

    let webhook = SlackWebhook::new(settings.slack_webhook_url.clone())?;
    if !webhook.is_configured() {
        tracing::warn!("SLACK_WEBHOOK_URL is not configured; contact notifications are disabled");
    }

    let contact = contact_router(
        PgContactRepository::new(pool.clone()),
        SlackContactNotifier::new(webhook),
        limiter.clone(),
        ContactConfig::new(settings.rate_limit_contact.clone()),
    );

    let analytics = analytics_router(
        PgPageviewRepository::new(pool.clone()),
        limiter,
        AnalyticsConfig::new(settings.rate_limit_analytics.clone()),
    );

    // Build router
    let app = Router::new()
        .merge(health::health_router())
        .merge(contact)
        .merge(analytics);

    let app = docs::with_docs(app, settings.docs_enabled())
        .fallback(|| async { AppError::not_found("Not found") })
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(logging::request_span)
                .on_response(logging::log_response),
        )
        .layer(cors_layer(&settings.cors_origins));

    // Start server
    tracing::info!("Listening on {}", settings.bind_addr);

    let listener = TcpListener::bind(settings.bind_addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allowed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::any())
}
