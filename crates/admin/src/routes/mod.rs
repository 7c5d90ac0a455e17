//! HTTP routes for the admin JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Liveness
//! GET    /health/ready                 - Readiness (database ping)
//!
//! # Auth
//! POST   /api/auth/login               - Sign in (admin profile required)
//! POST   /api/auth/logout              - Sign out
//! GET    /api/auth/me                  - Signed-in admin
//!
//! # Catalog (everything below requires an admin)
//! GET    /api/categories               - List
//! POST   /api/categories               - Create
//! PATCH  /api/categories/{id}          - Update
//! DELETE /api/categories/{id}          - Delete with subcategories and products
//! GET    /api/subcategories            - List with category name
//! POST   /api/subcategories            - Create
//! PATCH  /api/subcategories/{id}       - Update
//! DELETE /api/subcategories/{id}       - Delete with products
//! GET    /api/products                 - List with subcategory and category names
//! POST   /api/products                 - Create
//! PATCH  /api/products/{id}            - Update
//! DELETE /api/products/{id}            - Delete
//!
//! # Users
//! GET    /api/users                    - List with role
//! PATCH  /api/users/{id}               - Update names or activation
//!
//! # Files
//! POST   /api/uploads                  - Image upload (multipart: file, folder)
//! POST   /api/import?dry_run=          - Spreadsheet import (multipart: file)
//! ```

pub mod auth;
pub mod categories;
pub mod import;
pub mod products;
pub mod subcategories;
pub mod uploads;
pub mod users;

use axum::{
    Router,
    extract::{DefaultBodyLimit, State},
    http::{HeaderValue, StatusCode, header::STRICT_TRANSPORT_SECURITY},
    middleware::from_fn,
    routing::{get, patch, post},
};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    create_session_layer, request_id_middleware, security_headers, security_headers_middleware,
};
use crate::state::AppState;
use crate::storage::MAX_IMAGE_BYTES;

/// Room for multipart framing around a maximum-size image.
const UPLOAD_BODY_LIMIT: usize = MAX_IMAGE_BYTES + 64 * 1024;

/// Workbooks carry base64 images inline, so they get far more room.
const IMPORT_BODY_LIMIT: usize = 50 * 1024 * 1024;

fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", post(auth::login))
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(categories::list).post(categories::create))
        .route(
            "/categories/{id}",
            patch(categories::update).delete(categories::delete),
        )
        .route(
            "/subcategories",
            get(subcategories::list).post(subcategories::create),
        )
        .route(
            "/subcategories/{id}",
            patch(subcategories::update).delete(subcategories::delete),
        )
        .route("/products", get(products::list).post(products::create))
        .route(
            "/products/{id}",
            patch(products::update).delete(products::delete),
        )
}

fn file_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/uploads",
            post(uploads::upload).layer(DefaultBodyLimit::max(UPLOAD_BODY_LIMIT)),
        )
        .route(
            "/import",
            post(import::import).layer(DefaultBodyLimit::max(IMPORT_BODY_LIMIT)),
        )
}

/// All `/api` routes, without middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth_routes())
        .merge(catalog_routes())
        .route("/users", get(users::list))
        .route("/users/{id}", patch(users::update))
        .merge(file_routes())
}

/// Build the complete admin application. Sentry layers are added by the
/// binary.
///
/// # Errors
///
/// Returns an error if the session store cannot be configured.
pub fn app(state: AppState) -> Result<Router, String> {
    let session_layer = create_session_layer(state.pool(), state.config())?;
    let hsts = state.config().is_secure();

    let router = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
        .layer(session_layer)
        .layer(from_fn(security_headers_middleware))
        .layer(from_fn(request_id_middleware))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|request: &axum::http::Request<_>| {
                    tracing::info_span!(
                        "http_request",
                        method = %request.method(),
                        uri = %request.uri(),
                        request_id = tracing::field::Empty,
                        status = tracing::field::Empty,
                        latency_ms = tracing::field::Empty,
                    )
                })
                .on_response(
                    |response: &axum::http::Response<_>,
                     latency: std::time::Duration,
                     span: &Span| {
                        span.record("status", response.status().as_u16());
                        span.record(
                            "latency_ms",
                            u64::try_from(latency.as_millis()).unwrap_or(u64::MAX),
                        );
                        DefaultOnResponse::default().on_response(response, latency, span);
                    },
                ),
        )
        .with_state(state);

    Ok(if hsts {
        router.layer(SetResponseHeaderLayer::if_not_present(
            STRICT_TRANSPORT_SECURITY,
            HeaderValue::from_static(security_headers::HSTS_VALUE),
        ))
    } else {
        router
    })
}

async fn health() -> &'static str {
    "ok"
}

/// 503 until the database answers.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use std::path::PathBuf;

    use axum::body::Body;
    use axum::http::{Method, Request, header};
    use secrecy::SecretString;
    use sqlx::postgres::PgPoolOptions;
    use tower::ServiceExt;

    use super::*;
    use crate::config::{AdminConfig, MediaConfig};

    fn test_app(base_url: &str) -> Router {
        let config = AdminConfig {
            database_url: SecretString::from("postgres://jagmart@127.0.0.1:1/jagmart"),
            host: "127.0.0.1".parse().unwrap(),
            port: 3001,
            base_url: base_url.to_string(),
            session_secret: SecretString::from("k".repeat(32)),
            media: MediaConfig {
                dir: PathBuf::from("./media"),
                base_url: "/media".to_string(),
            },
            json_logs: false,
            sentry_dsn: None,
            sentry_environment: None,
            tls: None,
        };
        // Never connects unless a handler touches the database.
        let pool = PgPoolOptions::new()
            .connect_lazy("postgres://jagmart@127.0.0.1:1/jagmart")
            .unwrap();
        app(AppState::new(config, pool)).unwrap()
    }

    async fn send(app: Router, method: Method, uri: &str) -> axum::response::Response {
        app.oneshot(
            Request::builder()
                .method(method)
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_health_and_headers() {
        let response = send(test_app("http://localhost:3001"), Method::GET, "/health").await;

        assert_eq!(response.status(), StatusCode::OK);
        let headers = response.headers();
        assert_eq!(headers[header::X_FRAME_OPTIONS], "DENY");
        assert_eq!(headers[header::CACHE_CONTROL], "no-store");
        assert!(headers.contains_key("x-request-id"));
        assert!(!headers.contains_key(header::STRICT_TRANSPORT_SECURITY));
    }

    #[tokio::test]
    async fn test_hsts_when_https() {
        let response = send(test_app("https://admin.jagmart.in"), Method::GET, "/health").await;
        assert!(
            response
                .headers()
                .contains_key(header::STRICT_TRANSPORT_SECURITY)
        );
    }

    #[tokio::test]
    async fn test_api_requires_admin_session() {
        for (method, uri) in [
            (Method::GET, "/api/categories"),
            (Method::GET, "/api/subcategories"),
            (Method::DELETE, "/api/products/4"),
            (Method::GET, "/api/users"),
            (Method::GET, "/api/auth/me"),
            (Method::POST, "/api/uploads"),
            (Method::POST, "/api/import"),
        ] {
            let response = send(test_app("http://localhost:3001"), method.clone(), uri).await;
            assert_eq!(
                response.status(),
                StatusCode::UNAUTHORIZED,
                "{method} {uri}"
            );
        }
    }

    #[tokio::test]
    async fn test_login_rejects_malformed_body() {
        let response = test_app("http://localhost:3001")
            .oneshot(
                Request::builder()
                    .method(Method::POST)
                    .uri("/api/auth/login")
                    .header(header::CONTENT_TYPE, "application/json")
                    .body(Body::from(r#"{"email":"owner@jagmart.in"}"#))
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn test_unknown_route_is_404() {
        let response = send(test_app("http://localhost:3001"), Method::GET, "/api/orders").await;
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
