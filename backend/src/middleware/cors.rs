//! Cross-origin resource sharing policy.
//!
//! With no configured origins every origin is echoed back; otherwise only
//! exact matches are allowed. Credentials are always permitted, so the
//! wildcard `*` is never sent.

use actix_cors::Cors;
use actix_web::http::{Method, header};

/// Build the CORS middleware for the given allow-list.
///
/// # Examples
/// ```
/// use actix_web::App;
/// use product_service::middleware::cors_policy;
///
/// let origins = vec!["https://shop.example".to_owned()];
/// let app = App::new().wrap(cors_policy(&origins));
/// ```
pub fn cors_policy(allowed_origins: &[String]) -> Cors {
    let cors = Cors::default()
        .allowed_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allowed_headers([header::CONTENT_TYPE, header::AUTHORIZATION, header::ACCEPT])
        .expose_headers([
            header::HeaderName::from_static("trace-id"),
            header::HeaderName::from_static("ratelimit-limit"),
            header::HeaderName::from_static("ratelimit-remaining"),
            header::HeaderName::from_static("ratelimit-reset"),
        ])
        .supports_credentials()
        .max_age(3600);

    if allowed_origins.is_empty() {
        return cors.allow_any_origin();
    }

    let allowed: Vec<String> = allowed_origins.to_vec();
    cors.allowed_origin_fn(move |origin, _head| {
        origin
            .to_str()
            .is_ok_and(|origin| allowed.iter().any(|candidate| candidate == origin))
    })
}
