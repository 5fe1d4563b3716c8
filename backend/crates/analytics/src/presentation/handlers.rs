//! HTTP Handlers

use crate::application::config::AnalyticsConfig;
use crate::application::record_pageview::{RecordPageviewInput, RecordPageviewUseCase};
use crate::domain::repository::PageviewRepository;
use crate::error::AnalyticsResult;
use crate::presentation::dto::PageviewRequest;
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use platform::client::{extract_client_ip, extract_user_agent};
use platform::rate_limit::RateLimiter;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared state for analytics handlers
#[derive(Clone)]
pub struct AnalyticsAppState<R>
where
    R: PageviewRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub limiter: Arc<RateLimiter>,
    pub config: Arc<AnalyticsConfig>,
}

/// POST /v1/analytics/pageview
#[utoipa::path(
    post,
    path = "/v1/analytics/pageview",
    request_body = PageviewRequest,
    responses(
        (status = 204, description = "Pageview recorded"),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "A field failed validation"),
        (status = 429, description = "Rate limit exceeded"),
    ),
    tag = "analytics"
)]
pub async fn record_pageview<R>(
    State(state): State<AnalyticsAppState<R>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    payload: Result<Json<PageviewRequest>, JsonRejection>,
) -> AnalyticsResult<StatusCode>
where
    R: PageviewRepository + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let use_case =
        RecordPageviewUseCase::new(state.repo.clone(), state.limiter.clone(), state.config.clone());

    let input = RecordPageviewInput {
        path: req.path,
        title: req.title,
        referrer: req.referrer,
        session_id: req.session_id,
        user_agent: extract_user_agent(&headers),
        client_ip: extract_client_ip(&headers, Some(addr.ip())),
    };

    use_case.execute(input).await?;

    Ok(StatusCode::NO_CONTENT)
}
