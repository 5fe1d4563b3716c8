//! Liveness probe

use axum::{Json, Router, routing::get};
use serde_json::{Value, json};

pub fn health_router() -> Router {
    Router::new().route("/healthz", get(healthz))
}

/// GET /healthz
#[utoipa::path(
    get,
    path = "/healthz",
    responses((status = 200, description = "Service is up")),
    tag = "health"
)]
pub(crate) async fn healthz() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use tower::ServiceExt;

    #[tokio::test]
    async fn test_healthz() {
        let response = health_router()
            .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::OK);
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let body: Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(body, json!({"status": "ok"}));
    }
}
