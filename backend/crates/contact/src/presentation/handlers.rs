//! HTTP Handlers

use crate::application::config::ContactConfig;
use crate::application::submit_contact::{
    SubmitContactInput, SubmitContactOutput, SubmitContactUseCase,
};
use crate::domain::repository::{ContactNotifier, ContactRepository};
use crate::error::ContactResult;
use crate::presentation::dto::{ContactSubmissionRequest, ContactSubmissionResponse};
use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::extract::{ConnectInfo, State};
use axum::http::{HeaderMap, StatusCode};
use platform::client::extract_client_ip;
use platform::rate_limit::RateLimiter;
use std::net::SocketAddr;
use std::sync::Arc;

/// Shared state for contact handlers
#[derive(Clone)]
pub struct ContactAppState<R, N>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
    N: ContactNotifier + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
    pub notifier: Arc<N>,
    pub limiter: Arc<RateLimiter>,
    pub config: Arc<ContactConfig>,
}

/// POST /v1/contact
#[utoipa::path(
    post,
    path = "/v1/contact",
    request_body = ContactSubmissionRequest,
    responses(
        (status = 201, description = "Submission accepted", body = ContactSubmissionResponse),
        (status = 400, description = "Malformed JSON body"),
        (status = 422, description = "A field failed validation"),
        (status = 429, description = "Rate limit exceeded"),
    ),
    tag = "contact"
)]
pub async fn submit_contact<R, N>(
    State(state): State<ContactAppState<R, N>>,
    headers: HeaderMap,
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    payload: Result<Json<ContactSubmissionRequest>, JsonRejection>,
) -> ContactResult<(StatusCode, Json<ContactSubmissionResponse>)>
where
    R: ContactRepository + Clone + Send + Sync + 'static,
    N: ContactNotifier + Clone + Send + Sync + 'static,
{
    let Json(req) = payload?;
    let client_ip = extract_client_ip(&headers, Some(addr.ip()));

    let use_case = SubmitContactUseCase::new(
        state.repo.clone(),
        state.notifier.clone(),
        state.limiter.clone(),
        state.config.clone(),
    );

    let input = SubmitContactInput {
        name: req.name,
        email: req.email,
        message: req.message,
        website: req.website,
        client_ip,
    };

    let response = match use_case.execute(input).await? {
        SubmitContactOutput::Stored(submission) => ContactSubmissionResponse {
            ok: true,
            id: Some(submission.id),
            created_at: Some(submission.created_at),
        },
        SubmitContactOutput::Discarded => ContactSubmissionResponse {
            ok: true,
            id: None,
            created_at: None,
        },
    };

    Ok((StatusCode::CREATED, Json(response)))
}
