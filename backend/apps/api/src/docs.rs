//! OpenAPI document and the interactive viewers
//!
//! Serves `/openapi.json`, Swagger UI at `/docs` and ReDoc at `/redoc`.
//! The viewers are static pages that load their assets from a CDN.

use axum::response::Html;
use axum::routing::get;
use axum::{Json, Router};
use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Contact & Analytics API",
        version = "0.1.0",
        description = "Public write endpoints for the contact form and pageview analytics. \
                       Errors are RFC 7807 problem documents."
    ),
    paths(
        crate::health::healthz,
        contact::presentation::handlers::submit_contact,
        analytics::presentation::handlers::record_pageview,
    ),
    components(schemas(
        contact::presentation::dto::ContactSubmissionRequest,
        contact::presentation::dto::ContactSubmissionResponse,
        analytics::presentation::dto::PageviewRequest,
    )),
    tags(
        (name = "health", description = "Liveness"),
        (name = "contact", description = "Contact form submissions"),
        (name = "analytics", description = "Pageview tracking"),
    )
)]
pub struct ApiDoc;

const SWAGGER_UI_HTML: &str = r##"<!DOCTYPE html>
<html>
<head>
<title>Contact & Analytics API - Swagger UI</title>
<link rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
<script>SwaggerUIBundle({ url: "/openapi.json", dom_id: "#swagger-ui" });</script>
</body>
</html>"##;

const REDOC_HTML: &str = r#"<!DOCTYPE html>
<html>
<head>
<title>Contact & Analytics API - ReDoc</title>
</head>
<body>
<redoc spec-url="/openapi.json"></redoc>
<script src="https://cdn.jsdelivr.net/npm/redoc@2/bundles/redoc.standalone.js"></script>
</body>
</html>"#;

pub fn docs_router() -> Router {
    Router::new()
        .route("/openapi.json", get(openapi_json))
        .route("/docs", get(|| async { Html(SWAGGER_UI_HTML) }))
        .route("/redoc", get(|| async { Html(REDOC_HTML) }))
}

/// Mount the documentation routes only when `enabled`
pub fn with_docs(app: Router, enabled: bool) -> Router {
    if enabled {
        app.merge(docs_router())
    } else {
        app
    }
}

/// GET /openapi.json
async fn openapi_json() -> Json<utoipa::openapi::OpenApi> {
    Json(ApiDoc::openapi())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use http_body_util::BodyExt;
    use serde_json::Value;
    use tower::ServiceExt;

    const DOC_PATHS: [&str; 3] = ["/docs", "/redoc", "/openapi.json"];

    fn app_for(app_env: &str) -> Router {
        let env = app_env.to_string();
        let settings = Settings::from_lookup(|name| (name == "APP_ENV").then(|| env.clone()))
            .unwrap();
        with_docs(crate::health::health_router(), settings.docs_enabled())
    }

    async fn status(app: &Router, uri: &str) -> StatusCode {
        app.clone()
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap()
            .status()
    }

    #[tokio::test]
    async fn test_docs_served_in_development() {
        let app = app_for("development");
        for path in DOC_PATHS {
            assert_eq!(status(&app, path).await, StatusCode::OK, "{path}");
        }
    }

    #[tokio::test]
    async fn test_docs_hidden_in_staging_and_production() {
        for env in ["staging", "production", "prod"] {
            let app = app_for(env);
            for path in DOC_PATHS {
                assert_eq!(status(&app, path).await, StatusCode::NOT_FOUND, "{env} {path}");
            }
            assert_eq!(status(&app, "/healthz").await, StatusCode::OK);
        }
    }

    #[tokio::test]
    async fn test_openapi_lists_every_endpoint() {
        let response = docs_router()
            .oneshot(Request::get("/openapi.json").body(Body::empty()).unwrap())
            .await
            .unwrap();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        let doc: Value = serde_json::from_slice(&bytes).unwrap();

        assert!(doc["paths"]["/healthz"]["get"].is_object());
        assert!(doc["paths"]["/v1/contact"]["post"].is_object());
        assert!(doc["paths"]["/v1/analytics/pageview"]["post"].is_object());
        assert!(doc["components"]["schemas"]["ContactSubmissionRequest"].is_object());
    }
}
