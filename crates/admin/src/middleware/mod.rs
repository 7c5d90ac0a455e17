//! HTTP middleware stack for admin.
//!
//! # Middleware Order (outermost first)
//!
//! 1. Sentry layers (added by the binary)
//! 2. `TraceLayer` (request span)
//! 3. Request ID (record `x-request-id` on the span)
//! 4. Security headers
//! 5. Session layer (tower-sessions, `admin.session` table)
//!
//! Authentication is enforced per handler by the [`RequireAdmin`] extractor.

pub mod auth;
pub mod request_id;
pub mod security_headers;
pub mod session;

pub use auth::{RequireAdmin, clear_current_admin, set_current_admin};
pub use request_id::request_id_middleware;
pub use security_headers::security_headers_middleware;
pub use session::create_session_layer;
