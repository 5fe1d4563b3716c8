//! Contact Router

use crate::application::config::ContactConfig;
use crate::domain::repository::{ContactNotifier, ContactRepository};
use crate::infra::postgres::PgContactRepository;
use crate::infra::slack::SlackContactNotifier;
use crate::presentation::handlers::{self, ContactAppState};
use axum::{Router, routing::post};
use platform::rate_limit::RateLimiter;
use std::sync::Arc;

/// Create the contact router with PostgreSQL storage and Slack notifications
pub fn contact_router(
    repo: PgContactRepository,
    notifier: SlackContactNotifier,
    limiter: Arc<RateLimiter>,
    config: ContactConfig,
) -> Router {
    contact_router_generic(repo, notifier, limiter, config)
}

/// Create a contact router for any repository / notifier implementation
pub fn contact_router_generic<R, N>(
    repo: R,
    notifier: N,
    limiter: Arc<RateLimiter>,
    config: ContactConfig,
) -> Router
where
    R: ContactRepository + Clone + Send + Sync + 'static,
    N: ContactNotifier + Clone + Send + Sync + 'static,
{
    let state = ContactAppState {
        repo: Arc::new(repo),
        notifier: Arc::new(notifier),
        limiter,
        config: Arc::new(config),
    };

    Router::new()
        .route("/v1/contact", post(handlers::submit_contact::<R, N>))
        .with_state(state)
}
