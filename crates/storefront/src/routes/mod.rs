//! HTTP routes for the storefront JSON API.
//!
//! # Route Structure
//!
//! ```text
//! GET    /health                       - Liveness
//! GET    /health/ready                 - Readiness (database ping)
//! GET    /media/*                      - Uploaded images
//!
//! # Catalog
//! GET    /api/navigation               - Header menu (cached)
//! GET    /api/home/categories          - Home page category cards (cached)
//! GET    /api/categories/{id}          - Category with its products
//! GET    /api/subcategories/{id}       - Subcategory with parent and products
//! GET    /api/products?q=&category=    - Product search
//! GET    /api/products/{id}            - Single product
//!
//! # Auth (register and login are rate limited)
//! POST   /api/auth/register            - Create account and sign in
//! POST   /api/auth/login               - Sign in
//! POST   /api/auth/logout              - Sign out
//! GET    /api/auth/me                  - Current user or null
//!
//! # Account and cart (require auth)
//! GET    /api/account                  - Profile
//! GET    /api/cart                     - Cart with totals
//! DELETE /api/cart                     - Clear cart
//! POST   /api/cart/items               - Add product
//! PATCH  /api/cart/items/{product_id}  - Set quantity
//! DELETE /api/cart/items/{product_id}  - Remove product
//! ```

pub mod auth;
pub mod cart;
pub mod catalog;

use axum::{
    Router,
    extract::State,
    http::{HeaderValue, StatusCode, header::STRICT_TRANSPORT_SECURITY},
    middleware::from_fn,
    routing::{delete, get, patch, post},
};
use tower_http::services::ServeDir;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::{DefaultOnResponse, OnResponse, TraceLayer};
use tracing::Span;

use crate::middleware::{
    auth_rate_limiter, create_session_layer, request_id_middleware, security_headers,
    security_headers_middleware,
};
use crate::state::AppState;

fn catalog_routes() -> Router<AppState> {
    Router::new()
        .route("/navigation", get(catalog::navigation))
        .route("/home/categories", get(catalog::home_categories))
        .route("/categories/{id}", get(catalog::category))
        .route("/subcategories/{id}", get(catalog::subcategory))
        .route("/products", get(catalog::products))
        .route("/products/{id}", get(catalog::product))
}

/// Only credential-accepting routes are rate limited; `layer` applies to
/// routes added before it.
fn auth_routes() -> Router<AppState> {
    let limited = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login));

    let limited = match auth_rate_limiter() {
        Some(limiter) => limited.layer(limiter),
        None => {
            tracing::warn!("Auth rate limiter misconfigured; running without it");
            limited
        }
    };

    limited
        .route("/logout", post(auth::logout))
        .route("/me", get(auth::me))
}

fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show).delete(cart::clear))
        .route("/items", post(cart::add))
        .route(
            "/items/{product_id}",
            patch(cart::update).delete(cart::remove),
        )
}

/// All `/api` routes, without middleware.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .merge(catalog_routes())
        .nest("/auth", auth_routes())
        .route("/account", get(auth::account))
        .nest("/cart", cart_routes())
}

/// Build the complete storefront application.
///
/// Includes sessions, tracing, request IDs, security headers, and media
/// serving. Sentry layers are added by the binary.
///
/// # Errors
///
/// Returns an error if the session layer cannot be configured.
pub fn app(state: AppState) -> Result<Router, String> {
    let config = state.config();
    let session_layer = create_session_layer(state.pool(), config)?;
    let media = ServeDir::new(&config.media_dir);
    let hsts = config.is_secure();

    let router = Router::new()
        .route("/health", get(health))
        .route("/health/ready", get(readiness))
        .nest("/api", api_routes())
        .nest_service("/media", media)
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

/// Liveness: the process is up. Does not check dependencies.
async fn health() -> &'static str {
    "ok"
}

/// Readiness: 503 until the database answers.
async fn readiness(State(state): State<AppState>) -> StatusCode {
    match sqlx::query("SELECT 1").fetch_one(state.pool()).await {
        Ok(_) => StatusCode::OK,
        Err(e) => {
            tracing::warn!(error = %e, "Readiness check failed");
            StatusCode::SERVICE_UNAVAILABLE
        }
    }
}
