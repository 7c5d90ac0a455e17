//! Security headers for JSON and media responses.
//!
//! The storefront serves no HTML, so the policy is simple: nothing may frame
//! it, nothing may sniff it, and API responses are never cached. Media files
//! are sandboxed so an uploaded file can never run script on this origin.
//! HSTS is added separately in the router when the base URL is HTTPS.

use axum::{
    extract::Request,
    http::{
        HeaderName, HeaderValue,
        header::{
            CACHE_CONTROL, CONTENT_SECURITY_POLICY, REFERRER_POLICY, X_CONTENT_TYPE_OPTIONS,
            X_FRAME_OPTIONS,
        },
    },
    middleware::Next,
    response::Response,
};

/// `max-age` of one year.
pub const HSTS_VALUE: &str = "max-age=31536000; includeSubDomains";

/// Policy for files under `/media`.
pub const MEDIA_CSP: &str = "default-src 'none'; sandbox";

pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let path = request.uri().path();
    let is_api = path.starts_with("/api/");
    let is_media = path.starts_with("/media/");
    let mut response = next.run(request).await;
    let headers = response.headers_mut();

    headers.insert(X_FRAME_OPTIONS, HeaderValue::from_static("DENY"));
    headers.insert(X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff"));
    headers.insert(
        REFERRER_POLICY,
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        HeaderName::from_static("permissions-policy"),
        HeaderValue::from_static(
            "camera=(), microphone=(), geolocation=(), payment=(), usb=(), interest-cohort=()",
        ),
    );

    // Carts and account data must not sit in shared caches
    if is_api {
        headers.insert(CACHE_CONTROL, HeaderValue::from_static("no-store, max-age=0"));
    }

    if is_media {
        headers.insert(CONTENT_SECURITY_POLICY, HeaderValue::from_static(MEDIA_CSP));
    }

    response
}
