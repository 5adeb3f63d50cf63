//! Backend entry-point: loads settings, opens the database pool and serves
//! the product API.

use actix_web::web;
use mockable::DefaultEnv;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, fmt};

use product_service::inbound::http::health::HealthState;
use product_service::outbound::persistence::{DbPool, PoolConfig};
use product_service::server::{PoolSettings, ServerConfig, ServiceSettings, create_server};

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(error) = dotenvy::dotenv() {
        if !error.not_found() {
            return Err(std::io::Error::other(format!("failed to load .env: {error}")));
        }
    }

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(e) = fmt().with_env_filter(filter).json().try_init() {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServiceSettings::from_env(&DefaultEnv::new())
        .map_err(|e| std::io::Error::other(format!("invalid configuration: {e}")))?;
    let pool_settings = PoolSettings::load_for("product-service")
        .map_err(|e| std::io::Error::other(format!("invalid pool configuration: {e}")))?;
    let pool = DbPool::new(pool_settings.apply(PoolConfig::new(settings.database_url.clone())))
        .await
        .map_err(|e| std::io::Error::other(format!("database unavailable: {e}")))?;

    let config = ServerConfig::from_settings(&settings).with_db_pool(pool);
    let bind_addr = config.bind_addr();
    let health_state = web::Data::new(HealthState::new());
    let server = create_server(health_state, config)?;

    info!(
        port = settings.port,
        mode = settings.mode.as_str(),
        %bind_addr,
        "product service listening"
    );
    server.await
}
