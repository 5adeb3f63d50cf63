//! HTTP server configuration object and helpers.

use std::net::SocketAddr;

use crate::middleware::RateLimitConfig;
use crate::outbound::persistence::DbPool;

use super::ServiceSettings;

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) bind_addr: SocketAddr,
    pub(crate) cors_origins: Vec<String>,
    pub(crate) rate_limit: RateLimitConfig,
    pub(crate) expose_error_detail: bool,
    pub(crate) db_pool: Option<DbPool>,
}

impl ServerConfig {
    /// Construct a configuration with permissive CORS, the default rate
    /// limit, redacted errors and no database.
    #[must_use]
    pub fn new(bind_addr: SocketAddr) -> Self {
        Self {
            bind_addr,
            cors_origins: Vec::new(),
            rate_limit: RateLimitConfig::default(),
            expose_error_detail: false,
            db_pool: None,
        }
    }

    /// Construct a configuration from validated environment settings.
    ///
    /// # Examples
    /// ```
    /// use std::net::IpAddr;
    ///
    /// use product_service::middleware::RateLimitConfig;
    /// use product_service::server::{RuntimeMode, ServerConfig, ServiceSettings};
    ///
    /// let settings = ServiceSettings {
    ///     database_url: "postgres://localhost/products".to_owned(),
    ///     host: IpAddr::from([127, 0, 0, 1]),
    ///     port: 3000,
    ///     cors_origins: Vec::new(),
    ///     rate_limit: RateLimitConfig::default(),
    ///     mode: RuntimeMode::Development,
    /// };
    /// let config = ServerConfig::from_settings(&settings);
    /// assert_eq!(config.bind_addr().port(), 3000);
    /// ```
    #[must_use]
    pub fn from_settings(settings: &ServiceSettings) -> Self {
        Self::new(settings.bind_addr())
            .with_cors_origins(settings.cors_origins.clone())
            .with_rate_limit(settings.rate_limit)
            .with_error_detail(settings.mode.exposes_error_detail())
    }

    /// Restrict CORS to the given origins; an empty list allows any origin.
    #[must_use]
    pub fn with_cors_origins(mut self, origins: Vec<String>) -> Self {
        self.cors_origins = origins;
        self
    }

    /// Override the `/api` rate limit.
    #[must_use]
    pub fn with_rate_limit(mut self, rate_limit: RateLimitConfig) -> Self {
        self.rate_limit = rate_limit;
        self
    }

    /// Add unredacted internal error messages to error bodies.
    #[must_use]
    pub fn with_error_detail(mut self, enabled: bool) -> Self {
        self.expose_error_detail = enabled;
        self
    }

    /// Attach a database connection pool for persistence adapters.
    ///
    /// Without a pool the product endpoints are served by fixture ports.
    #[must_use]
    pub fn with_db_pool(mut self, pool: DbPool) -> Self {
        self.db_pool = Some(pool);
        self
    }

    /// Return the socket address the server will bind to.
    #[must_use]
    pub fn bind_addr(&self) -> SocketAddr {
        self.bind_addr
    }
}
