//! Shared harness wiring the full routing table to an in-memory repository.

use std::sync::Arc;
use std::time::Duration;

use actix_web::web;
use chrono::{TimeZone, Utc};
use mockable::Clock;
use product_service::domain::ProductService;
use product_service::inbound::http::health::HealthState;
use product_service::inbound::http::state::HttpState;
use product_service::middleware::{RateLimit, RateLimitConfig};
use product_service::server::AppDependencies;
use product_service::test_support::{InMemoryProductRepository, MutableClock};

/// Handles a test keeps after building the application.
pub struct Harness {
    pub repo: Arc<InMemoryProductRepository>,
    pub clock: Arc<MutableClock>,
    pub deps: AppDependencies,
}

/// Options differing between suites.
pub struct HarnessOptions {
    pub cors_origins: Vec<String>,
    pub rate_limit: RateLimitConfig,
    pub expose_error_detail: bool,
}

impl Default for HarnessOptions {
    fn default() -> Self {
        Self {
            cors_origins: Vec::new(),
            rate_limit: RateLimitConfig {
                window: Duration::from_secs(900),
                max_requests: 1_000,
            },
            expose_error_detail: false,
        }
    }
}

pub fn harness(options: HarnessOptions) -> Harness {
    let start = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    let clock = Arc::new(MutableClock::new(start));
    let repo = Arc::new(InMemoryProductRepository::with_clock(
        Arc::clone(&clock) as Arc<dyn Clock>
    ));
    let service = Arc::new(ProductService::new(Arc::clone(&repo)));
    let health_state = web::Data::new(HealthState::new());
    health_state.mark_ready();

    let deps = AppDependencies {
        health_state,
        http_state: web::Data::new(HttpState::from_service(service)),
        cors_origins: options.cors_origins,
        rate_limit: RateLimit::with_clock(
            options.rate_limit,
            Arc::clone(&clock) as Arc<dyn Clock>,
        ),
        expose_error_detail: options.expose_error_detail,
    };
    Harness { repo, clock, deps }
}
