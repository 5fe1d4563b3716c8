//! Analytics Router

use crate::application::config::AnalyticsConfig;
use crate::domain::repository::PageviewRepository;
use crate::infra::postgres::PgPageviewRepository;
use crate::presentation::handlers::{self, AnalyticsAppState};
use axum::{Router, routing::post};
use platform::rate_limit::RateLimiter;
use std::sync::Arc;

/// Create the analytics router with PostgreSQL storage
pub fn analytics_router(
    repo: PgPageviewRepository,
    limiter: Arc<RateLimiter>,
    config: AnalyticsConfig,
) -> Router {
    analytics_router_generic(repo, limiter, config)
}

/// Create an analytics router for any repository implementation
pub fn analytics_router_generic<R>(
    repo: R,
    limiter: Arc<RateLimiter>,
    config: AnalyticsConfig,
) -> Router
where
    R: PageviewRepository + Clone + Send + Sync + 'static,
{
    let state = AnalyticsAppState {
        repo: Arc::new(repo),
        limiter,
        config: Arc::new(config),
    };

    Router::new()
        .route("/v1/analytics/pageview", post(handlers::record_pageview::<R>))
        .with_state(state)
}
