//! Request middleware.
//!
//! Purpose: Define middleware components for request lifecycle concerns such as
//! tracing, cross-origin policy, rate limiting and response hardening.

pub mod cors;
pub mod error_detail;
pub mod rate_limit;
pub mod trace;

use actix_web::middleware::DefaultHeaders;

pub use cors::cors_policy;
pub use error_detail::ErrorDetail;
pub use rate_limit::{RateLimit, RateLimitConfig};
pub use trace::Trace;

/// Hardening headers added to every response unless a handler set them.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use product_service::middleware::security_headers;
///
/// let app = App::new().wrap(security_headers());
/// ```
pub fn security_headers() -> DefaultHeaders {
    DefaultHeaders::new()
        .add(("X-Content-Type-Options", "nosniff"))
        .add(("X-Frame-Options", "DENY"))
        .add(("Referrer-Policy", "no-referrer"))
}
