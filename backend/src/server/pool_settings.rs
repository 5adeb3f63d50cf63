//! Database pool tuning loaded via OrthoConfig.

use std::ffi::OsString;
use std::time::Duration;

use ortho_config::{OrthoConfig, OrthoResult};
use serde::Deserialize;

use crate::outbound::persistence::PoolConfig;

/// Optional overrides for the connection pool limits.
#[derive(Debug, Clone, Default, Deserialize, OrthoConfig)]
#[ortho_config(prefix = "PRODUCT_DB")]
pub struct PoolSettings {
    /// Maximum number of pooled connections.
    pub max_connections: Option<u32>,
    /// Connections kept open while idle.
    pub min_idle: Option<u32>,
    /// Seconds to wait for a free connection.
    pub connection_timeout_secs: Option<u64>,
}

impl PoolSettings {
    /// Load `PRODUCT_DB_*` overrides for the named program, without reading
    /// command-line arguments.
    ///
    /// # Examples
    /// ```
    /// use product_service::outbound::persistence::PoolConfig;
    /// use product_service::server::PoolSettings;
    ///
    /// let settings = PoolSettings::load_for("product-service").expect("pool settings load");
    /// let _config = settings.apply(PoolConfig::new("postgres://localhost/products"));
    /// ```
    ///
    /// # Errors
    /// Returns the loader error when a variable cannot be parsed.
    pub fn load_for(program: &str) -> OrthoResult<Self> {
        Self::load_from_iter([OsString::from(program)])
    }

    /// Overlay the configured values on `config`.
    ///
    /// # Examples
    /// ```
    /// use product_service::outbound::persistence::PoolConfig;
    /// use product_service::server::PoolSettings;
    ///
    /// let settings = PoolSettings {
    ///     max_connections: Some(4),
    ///     ..PoolSettings::default()
    /// };
    /// let config = settings.apply(PoolConfig::new("postgres://localhost/products"));
    /// assert_eq!(config.max_size(), 4);
    /// assert_eq!(config.min_idle(), Some(2));
    /// ```
    #[must_use]
    pub fn apply(&self, mut config: PoolConfig) -> PoolConfig {
        if let Some(max_connections) = self.max_connections {
            config = config.with_max_size(max_connections);
        }
        if let Some(min_idle) = self.min_idle {
            config = config.with_min_idle(Some(min_idle));
        }
        if let Some(secs) = self.connection_timeout_secs {
            config = config.with_connection_timeout(Duration::from_secs(secs));
        }
        config
    }
}
