//! Server construction and middleware wiring.

mod config;
mod pool_settings;
mod settings;
mod state_builders;

pub use config::ServerConfig;
pub use pool_settings::PoolSettings;
pub use settings::{RuntimeMode, ServiceSettings, SettingsError};

use state_builders::build_http_state;

use actix_web::body::MessageBody;
use actix_web::dev::{Server, ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::{App, HttpServer, web};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

#[cfg(debug_assertions)]
use crate::doc::ApiDoc;
use crate::inbound::http::error::json_error_handler;
use crate::inbound::http::health::{HealthState, health, live, ready};
use crate::inbound::http::not_found::endpoint_not_found;
use crate::inbound::http::products::{
    create_product, delete_product, get_product, list_products, update_product,
};
use crate::inbound::http::service_info::service_info;
use crate::inbound::http::state::HttpState;
use crate::middleware::{ErrorDetail, RateLimit, Trace, cors_policy, security_headers};

/// Everything one application instance needs; cloned into each worker.
///
/// The [`RateLimit`] counters are shared between clones, so all workers
/// enforce one allowance per client.
#[derive(Clone)]
pub struct AppDependencies {
    pub health_state: web::Data<HealthState>,
    pub http_state: web::Data<HttpState>,
    pub cors_origins: Vec<String>,
    pub rate_limit: RateLimit,
    pub expose_error_detail: bool,
}

/// Assemble the routing table and middleware stack.
///
/// Product endpoints live under `/api` behind the rate limiter. Requests
/// matching no route get the JSON 404 from
/// [`endpoint_not_found`].
pub fn build_app(
    deps: AppDependencies,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    let AppDependencies {
        health_state,
        http_state,
        cors_origins,
        rate_limit,
        expose_error_detail,
    } = deps;

    let api = web::scope("/api")
        .wrap(rate_limit)
        .service(create_product)
        .service(list_products)
        .service(get_product)
        .service(update_product)
        .service(delete_product);

    let app = App::new()
        .app_data(health_state)
        .app_data(http_state)
        .app_data(web::JsonConfig::default().error_handler(json_error_handler))
        .wrap(ErrorDetail::new(expose_error_detail))
        .wrap(security_headers())
        .wrap(cors_policy(&cors_origins))
        .wrap(Trace)
        .service(api)
        .service(health)
        .service(ready)
        .service(live)
        .service(service_info)
        .default_service(web::to(endpoint_not_found));

    #[cfg(debug_assertions)]
    let app = app.service(SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi()));

    app
}

/// Construct an Actix HTTP server using the provided health state and configuration.
///
/// # Parameters
/// - `health_state`: shared readiness state updated once the server is initialised.
/// - `config`: pre-built [`ServerConfig`] containing binding, middleware and
///   optional database settings.
///
/// # Returns
/// A spawned [`Server`] that must be awaited to drive the listener.
///
/// # Errors
/// Propagates [`std::io::Error`] when binding the socket or starting the server fails.
pub fn create_server(
    health_state: web::Data<HealthState>,
    config: ServerConfig,
) -> std::io::Result<Server> {
    let server_health_state = health_state.clone();
    let http_state = build_http_state(config.db_pool.as_ref());
    let ServerConfig {
        bind_addr,
        cors_origins,
        rate_limit,
        expose_error_detail,
        db_pool: _,
    } = config;
    let deps = AppDependencies {
        health_state: server_health_state,
        http_state,
        cors_origins,
        rate_limit: RateLimit::new(rate_limit),
        expose_error_detail,
    };

    let server = HttpServer::new(move || build_app(deps.clone()))
        .bind(bind_addr)?
        .run();

    health_state.mark_ready();
    Ok(server)
}
