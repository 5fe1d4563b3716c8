//! HTTP-level tests for the contact crate

use crate::application::config::ContactConfig;
use crate::domain::entities::{ContactSubmission, NewContactSubmission};
use crate::domain::repository::{ContactNotifier, ContactRepository};
use crate::error::{ContactError, ContactResult};
use crate::presentation::router::contact_router_generic;
use axum::Router;
use axum::body::Body;
use axum::extract::ConnectInfo;
use axum::http::{Request, StatusCode, header};
use chrono::Utc;
use http_body_util::BodyExt;
use platform::rate_limit::{RateLimitSettings, RateLimiter};
use serde_json::{Value, json};
use std::net::SocketAddr;
use std::sync::{Arc, Mutex};
use tower::ServiceExt;

#[derive(Clone, Default)]
struct InMemoryContactRepository {
    rows: Arc<Mutex<Vec<ContactSubmission>>>,
}

impl InMemoryContactRepository {
    fn rows(&self) -> Vec<ContactSubmission> {
        self.rows.lock().unwrap().clone()
    }
}

impl ContactRepository for InMemoryContactRepository {
    async fn create(&self, submission: &NewContactSubmission) -> ContactResult<ContactSubmission> {
        let mut rows = self.rows.lock().unwrap();
        let stored = ContactSubmission {
            id: rows.len() as i64 + 1,
            name: submission.name.as_str().to_string(),
            email: submission.email.as_str().to_string(),
            message: submission.message.as_str().to_string(),
            created_at: Utc::now(),
        };
        rows.push(stored.clone());
        Ok(stored)
    }
}

#[derive(Clone, Default)]
struct RecordingNotifier {
    calls: Arc<Mutex<Vec<i64>>>,
    should_fail: bool,
}

impl RecordingNotifier {
    fn failing() -> Self {
        Self {
            should_fail: true,
            ..Self::default()
        }
    }

    fn calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }
}

impl ContactNotifier for RecordingNotifier {
    async fn notify(&self, submission: &ContactSubmission) -> ContactResult<()> {
        self.calls.lock().unwrap().push(submission.id);
        if self.should_fail {
            return Err(ContactError::Notification("webhook returned 500".into()));
        }
        Ok(())
    }
}

struct Harness {
    app: Router,
    repo: InMemoryContactRepository,
    notifier: RecordingNotifier,
}

fn harness(settings: RateLimitSettings, policy: &str, notifier: RecordingNotifier) -> Harness {
    let repo = InMemoryContactRepository::default();
    let app = contact_router_generic(
        repo.clone(),
        notifier.clone(),
        Arc::new(RateLimiter::new(settings)),
        ContactConfig::new(policy),
    );
    Harness {
        app,
        repo,
        notifier,
    }
}

fn unlimited() -> Harness {
    harness(
        RateLimitSettings::default(),
        "10/minute",
        RecordingNotifier::default(),
    )
}

fn valid_payload() -> Value {
    json!({
        "name": "Ada Lovelace",
        "email": "ada@example.com",
        "message": "I would love to collaborate on an AI project.",
        "website": "",
    })
}

fn contact_request(body: &Value, forwarded_for: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/v1/contact")
        .header(header::CONTENT_TYPE, "application/json");
    if let Some(ip) = forwarded_for {
        builder = builder.header("x-forwarded-for", ip);
    }

    let mut request = builder.body(Body::from(body.to_string())).unwrap();
    request
        .extensions_mut()
        .insert(ConnectInfo(SocketAddr::from(([127, 0, 0, 1], 40123))));
    request
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

#[tokio::test]
async fn test_submission_is_persisted_and_notified() {
    let h = unlimited();

    let (status, body) = send(&h.app, contact_request(&valid_payload(), None)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ok"], true);
    assert_eq!(body["id"], 1);
    assert!(body["created_at"].is_string());
    assert_eq!(h.repo.rows().len(), 1);
    assert_eq!(h.notifier.calls(), 1);
}

#[tokio::test]
async fn test_honeypot_returns_success_without_persistence() {
    let h = unlimited();
    let mut payload = valid_payload();
    payload["website"] = json!("https://spam.example");

    let (status, body) = send(&h.app, contact_request(&payload, None)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body, json!({"ok": true, "id": null, "created_at": null}));
    assert!(h.repo.rows().is_empty());
    assert_eq!(h.notifier.calls(), 0);
}

#[tokio::test]
async fn test_slack_failure_does_not_break_submission() {
    let h = harness(
        RateLimitSettings::default(),
        "10/minute",
        RecordingNotifier::failing(),
    );

    let (status, body) = send(&h.app, contact_request(&valid_payload(), None)).await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["ok"], true);
    assert_eq!(h.repo.rows().len(), 1);
    assert_eq!(h.notifier.calls(), 1);
}

#[tokio::test]
async fn test_invalid_email_is_rejected() {
    let h = unlimited();
    let mut payload = valid_payload();
    payload["email"] = json!("not-an-email");

    let (status, body) = send(&h.app, contact_request(&payload, None)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    assert!(h.repo.rows().is_empty());
}

#[tokio::test]
async fn test_fields_are_normalized_before_persistence() {
    let h = unlimited();
    let mut payload = valid_payload();
    payload["name"] = json!("  Ada Lovelace  ");
    payload["message"] = json!("  I would love to collaborate.  ");
    payload["website"] = json!("   ");

    let (status, _) = send(&h.app, contact_request(&payload, None)).await;

    assert_eq!(status, StatusCode::CREATED);
    let rows = h.repo.rows();
    assert_eq!(rows[0].name, "Ada Lovelace");
    assert_eq!(rows[0].message, "I would love to collaborate.");
    assert_eq!(h.notifier.calls(), 1);
}

#[tokio::test]
async fn test_blank_required_fields_are_rejected() {
    let h = unlimited();
    let mut payload = valid_payload();
    payload["name"] = json!("   ");
    payload["message"] = json!("   ");

    let (status, _) = send(&h.app, contact_request(&payload, None)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(h.repo.rows().is_empty());
}

#[tokio::test]
async fn test_missing_field_is_rejected() {
    let h = unlimited();

    let (status, body) = send(&h.app, contact_request(&json!({"name": "Ada"}), None)).await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(body["status"], 422);
    assert_eq!(body["title"], "Unprocessable Entity");
    assert!(body["detail"].as_str().unwrap().contains("missing field"));
    assert!(h.repo.rows().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_a_problem_document() {
    let h = unlimited();

    let mut request = contact_request(&json!({}), None);
    *request.body_mut() = Body::from("{\"name\": ");
    let (status, body) = send(&h.app, request).await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["status"], 400);
    assert!(body["type"].is_string());

    let mut request = contact_request(&valid_payload(), None);
    request.headers_mut().remove(header::CONTENT_TYPE);
    let (status, body) = send(&h.app, request).await;

    assert_eq!(status, StatusCode::UNSUPPORTED_MEDIA_TYPE);
    assert_eq!(body["status"], 415);
    assert!(h.repo.rows().is_empty());
}

#[tokio::test]
async fn test_rate_limiting_blocks_after_threshold() {
    let h = harness(
        RateLimitSettings::local(),
        "2/minute",
        RecordingNotifier::default(),
    );
    let ip = Some("198.51.100.123");

    let (first, _) = send(&h.app, contact_request(&valid_payload(), ip)).await;
    let (second, _) = send(&h.app, contact_request(&valid_payload(), ip)).await;
    let (third, body) = send(&h.app, contact_request(&valid_payload(), ip)).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::CREATED);
    assert_eq!(third, StatusCode::TOO_MANY_REQUESTS);
    assert_eq!(body["detail"], "rate_limit_exceeded");
    assert_eq!(h.repo.rows().len(), 2);

    // Another client still has its own budget
    let (other, _) = send(
        &h.app,
        contact_request(&valid_payload(), Some("203.0.113.9")),
    )
    .await;
    assert_eq!(other, StatusCode::CREATED);
}

#[tokio::test]
async fn test_honeypot_submissions_are_still_counted() {
    let h = harness(
        RateLimitSettings::local(),
        "1/minute",
        RecordingNotifier::default(),
    );
    let mut spam = valid_payload();
    spam["website"] = json!("https://spam.example");

    let (first, _) = send(&h.app, contact_request(&spam, None)).await;
    let (second, _) = send(&h.app, contact_request(&valid_payload(), None)).await;

    assert_eq!(first, StatusCode::CREATED);
    assert_eq!(second, StatusCode::TOO_MANY_REQUESTS);
    assert!(h.repo.rows().is_empty());
}

#[tokio::test]
async fn test_rejected_submissions_are_not_counted() {
    let h = harness(
        RateLimitSettings::local(),
        "1/minute",
        RecordingNotifier::default(),
    );
    let ip = Some("198.51.100.40");
    let mut invalid = valid_payload();
    invalid["email"] = json!("not-an-email");

    let (rejected, _) = send(&h.app, contact_request(&invalid, ip)).await;
    let (accepted, _) = send(&h.app, contact_request(&valid_payload(), ip)).await;

    assert_eq!(rejected, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(accepted, StatusCode::CREATED);

    // Over the limit, a bad payload still reports the validation failure
    let (over_limit, _) = send(&h.app, contact_request(&invalid, ip)).await;
    assert_eq!(over_limit, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(h.repo.rows().len(), 1);
}

#[tokio::test]
async fn test_invalid_policy_is_server_error() {
    let h = harness(
        RateLimitSettings::local(),
        "10/fortnight",
        RecordingNotifier::default(),
    );

    let (status, body) = send(&h.app, contact_request(&valid_payload(), None)).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["detail"], "Internal server error");
    assert!(h.repo.rows().is_empty());
}
