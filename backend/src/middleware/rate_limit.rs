//! Fixed-window request rate limiting keyed by client address.
//!
//! Every client gets `max_requests` requests per `window`. Responses carry
//! `RateLimit-Limit`, `RateLimit-Remaining` and `RateLimit-Reset` headers.
//! Once the allowance is spent the request is answered with 429 and a
//! `Retry-After` header without reaching the inner service.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::{Arc, Mutex, PoisonError};
use std::task::{Context, Poll};
use std::time::Duration;

use actix_web::body::{BoxBody, MessageBody};
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderMap, HeaderName, HeaderValue, RETRY_AFTER};
use actix_web::{Error, ResponseError};
use chrono::{DateTime, TimeDelta, Utc};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use mockable::{Clock, DefaultClock};
use tracing::warn;

use crate::domain::Error as DomainError;

/// Message returned once a client exhausts its allowance.
pub const RATE_LIMITED_MESSAGE: &str = "Too many requests, please try again later.";

/// Default window length: fifteen minutes.
pub const DEFAULT_WINDOW: Duration = Duration::from_secs(15 * 60);

/// Default number of requests allowed per window.
pub const DEFAULT_MAX_REQUESTS: u32 = 100;

/// Tracked clients above which expired windows are pruned.
const PRUNE_THRESHOLD: usize = 10_000;

const UNKNOWN_CLIENT: &str = "unknown";

/// Window length and allowance for [`RateLimit`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimitConfig {
    pub window: Duration,
    pub max_requests: u32,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            window: DEFAULT_WINDOW,
            max_requests: DEFAULT_MAX_REQUESTS,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct Window {
    started: DateTime<Utc>,
    count: u32,
}

/// Outcome of counting one request against a client's window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Decision {
    allowed: bool,
    remaining: u32,
    reset_after_secs: u64,
}

/// Shared fixed-window counters.
struct RateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    windows: Mutex<HashMap<String, Window>>,
}

impl RateLimiter {
    fn window_delta(&self) -> TimeDelta {
        TimeDelta::from_std(self.config.window).unwrap_or(TimeDelta::MAX)
    }

    fn check(&self, key: &str) -> Decision {
        let now = self.clock.utc();
        let window_delta = self.window_delta();
        let mut windows = self.windows.lock().unwrap_or_else(PoisonError::into_inner);

        if windows.len() > PRUNE_THRESHOLD {
            windows.retain(|_, window| now - window.started < window_delta);
        }

        let window = windows.entry(key.to_owned()).or_insert(Window {
            started: now,
            count: 0,
        });
        if now - window.started >= window_delta {
            *window = Window {
                started: now,
                count: 0,
            };
        }

        let allowed = window.count < self.config.max_requests;
        if allowed {
            window.count += 1;
        }

        let elapsed = (now - window.started).to_std().unwrap_or_default();
        let reset_after = self.config.window.saturating_sub(elapsed);
        Decision {
            allowed,
            remaining: self.config.max_requests.saturating_sub(window.count),
            reset_after_secs: reset_after.as_secs() + u64::from(reset_after.subsec_nanos() > 0),
        }
    }
}

/// Middleware limiting how often each client may call the wrapped scope.
///
/// Counters live in the transform, so every worker created from one
/// [`RateLimit`] value shares the same allowance.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use product_service::middleware::{RateLimit, RateLimitConfig};
///
/// let limit = RateLimit::new(RateLimitConfig::default());
/// let app = App::new().service(web::scope("/api").wrap(limit));
/// ```
#[derive(Clone)]
pub struct RateLimit {
    limiter: Arc<RateLimiter>,
}

impl RateLimit {
    /// Create a limiter measuring windows with the system clock.
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(DefaultClock))
    }

    /// Create a limiter measuring windows with `clock`.
    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            limiter: Arc::new(RateLimiter {
                config,
                clock,
                windows: Mutex::new(HashMap::new()),
            }),
        }
    }
}

impl<S, B> Transform<S, ServiceRequest> for RateLimit
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = RateLimitMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RateLimitMiddleware {
            service: Rc::new(service),
            limiter: Arc::clone(&self.limiter),
        }))
    }
}

/// Service wrapper produced by [`RateLimit`].
pub struct RateLimitMiddleware<S> {
    service: Rc<S>,
    limiter: Arc<RateLimiter>,
}

impl<S, B> Service<ServiceRequest> for RateLimitMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: MessageBody + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let client = req
            .connection_info()
            .realip_remote_addr()
            .unwrap_or(UNKNOWN_CLIENT)
            .to_owned();
        let decision = self.limiter.check(&client);
        let limit = self.limiter.config.max_requests;

        if !decision.allowed {
            warn!(client = %client, path = req.path(), "rate limit exceeded");
            let mut response = DomainError::rate_limited(RATE_LIMITED_MESSAGE).error_response();
            let headers = response.headers_mut();
            insert_limit_headers(headers, limit, decision);
            headers.insert(RETRY_AFTER, HeaderValue::from(decision.reset_after_secs));
            return Box::pin(ready(Ok(req.into_response(response))));
        }

        let service = Rc::clone(&self.service);
        Box::pin(async move {
            let mut res = service.call(req).await?;
            insert_limit_headers(res.headers_mut(), limit, decision);
            Ok(res.map_into_boxed_body())
        })
    }
}

fn insert_limit_headers(headers: &mut HeaderMap, limit: u32, decision: Decision) {
    headers.insert(
        HeaderName::from_static("ratelimit-limit"),
        HeaderValue::from(limit),
    );
    headers.insert(
        HeaderName::from_static("ratelimit-remaining"),
        HeaderValue::from(decision.remaining),
    );
    headers.insert(
        HeaderName::from_static("ratelimit-reset"),
        HeaderValue::from(decision.reset_after_secs),
    );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::MutableClock;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test, web};
    use chrono::TimeZone;
    use rstest::{fixture, rstest};
    use serde_json::Value;

    #[fixture]
    fn clock() -> Arc<MutableClock> {
        let now = Utc
            .with_ymd_and_hms(2026, 3, 1, 12, 0, 0)
            .single()
            .expect("valid fixture timestamp");
        Arc::new(MutableClock::new(now))
    }

    fn limiter(max_requests: u32, clock: Arc<MutableClock>) -> RateLimit {
        RateLimit::with_clock(
            RateLimitConfig {
                window: Duration::from_secs(60),
                max_requests,
            },
            clock,
        )
    }

    fn header(res: &ServiceResponse, name: &str) -> Option<String> {
        res.headers()
            .get(name)
            .and_then(|v| v.to_str().ok())
            .map(str::to_owned)
    }

    #[rstest]
    fn counts_down_then_rejects(clock: Arc<MutableClock>) {
        let limit = limiter(2, clock);
        let first = limit.limiter.check("10.0.0.1");
        let second = limit.limiter.check("10.0.0.1");
        let third = limit.limiter.check("10.0.0.1");

        assert!(first.allowed);
        assert_eq!(first.remaining, 1);
        assert!(second.allowed);
        assert_eq!(second.remaining, 0);
        assert!(!third.allowed);
        assert_eq!(third.reset_after_secs, 60);
    }

    #[rstest]
    fn clients_are_counted_separately(clock: Arc<MutableClock>) {
        let limit = limiter(1, clock);
        assert!(limit.limiter.check("10.0.0.1").allowed);
        assert!(limit.limiter.check("10.0.0.2").allowed);
        assert!(!limit.limiter.check("10.0.0.1").allowed);
    }

    #[rstest]
    fn allowance_resets_after_window(clock: Arc<MutableClock>) {
        let limit = limiter(1, Arc::clone(&clock));
        assert!(limit.limiter.check("10.0.0.1").allowed);
        clock.advance(Duration::from_secs(30));
        let blocked = limit.limiter.check("10.0.0.1");
        assert!(!blocked.allowed);
        assert_eq!(blocked.reset_after_secs, 30);

        clock.advance(Duration::from_secs(30));
        assert!(limit.limiter.check("10.0.0.1").allowed);
    }

    #[rstest]
    #[actix_rt::test]
    async fn rejected_requests_get_429_with_headers(clock: Arc<MutableClock>) {
        let app = actix_test::init_service(
            App::new().service(
                web::scope("/api")
                    .wrap(limiter(1, clock))
                    .route("/ping", web::get().to(HttpResponse::Ok)),
            ),
        )
        .await;

        let ping = || actix_test::TestRequest::get().uri("/api/ping").to_request();

        let ok = actix_test::call_service(&app, ping()).await;
        assert_eq!(ok.status(), StatusCode::OK);
        assert_eq!(header(&ok, "ratelimit-limit").as_deref(), Some("1"));
        assert_eq!(header(&ok, "ratelimit-remaining").as_deref(), Some("0"));

        let rejected = actix_test::call_service(&app, ping()).await;
        assert_eq!(rejected.status(), StatusCode::TOO_MANY_REQUESTS);
        assert_eq!(header(&rejected, "retry-after").as_deref(), Some("60"));
        let body: Value = actix_test::read_body_json(rejected).await;
        assert_eq!(
            body.get("error").and_then(Value::as_str),
            Some(RATE_LIMITED_MESSAGE)
        );
        assert_eq!(body.get("status").and_then(Value::as_u64), Some(429));
    }
}
