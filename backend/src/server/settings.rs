//! Environment-driven service settings.
//!
//! Everything the process needs at startup is read once through
//! [`mockable::Env`], validated, and handed to the server as a
//! [`ServiceSettings`] bundle.

use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;

use mockable::Env;

use crate::middleware::RateLimitConfig;
use crate::middleware::rate_limit::{DEFAULT_MAX_REQUESTS, DEFAULT_WINDOW};

const DATABASE_URL_ENV: &str = "DATABASE_URL";
const HOST_ENV: &str = "HOST";
const PORT_ENV: &str = "PORT";
const CORS_ORIGINS_ENV: &str = "CORS_ORIGINS";
const RATE_LIMIT_WINDOW_ENV: &str = "RATE_LIMIT_WINDOW_MS";
const RATE_LIMIT_MAX_ENV: &str = "RATE_LIMIT_MAX";
const APP_ENV_ENV: &str = "APP_ENV";

const DEFAULT_HOST: IpAddr = IpAddr::V4(std::net::Ipv4Addr::UNSPECIFIED);
const DEFAULT_PORT: u16 = 3000;

/// Deployment mode selected with `APP_ENV`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RuntimeMode {
    Production,
    #[default]
    Development,
    Test,
}

impl RuntimeMode {
    /// Whether unredacted internal error messages may reach clients.
    pub fn exposes_error_detail(self) -> bool {
        !matches!(self, Self::Production)
    }

    /// Lower-case name used in logs and `APP_ENV`.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Production => "production",
            Self::Development => "development",
            Self::Test => "test",
        }
    }
}

impl FromStr for RuntimeMode {
    type Err = ();

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "production" | "prod" => Ok(Self::Production),
            "development" | "dev" => Ok(Self::Development),
            "test" => Ok(Self::Test),
            _ => Err(()),
        }
    }
}

/// Errors raised while reading service settings.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum SettingsError {
    /// A required environment variable is missing or blank.
    #[error("missing required environment variable: {name}")]
    MissingEnv { name: &'static str },
    /// A variable is present but contains an invalid value.
    #[error("invalid value for {name}='{value}'; expected {expected}")]
    InvalidEnv {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
}

/// Validated startup configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceSettings {
    pub database_url: String,
    pub host: IpAddr,
    pub port: u16,
    /// Allowed CORS origins; empty allows any origin.
    pub cors_origins: Vec<String>,
    pub rate_limit: RateLimitConfig,
    pub mode: RuntimeMode,
}

impl ServiceSettings {
    /// Read and validate settings from `env`.
    ///
    /// # Examples
    ///
    /// ```rust
    /// use mockable::MockEnv;
    /// use product_service::server::{RuntimeMode, ServiceSettings};
    ///
    /// let mut env = MockEnv::new();
    /// env.expect_string().returning(|name| match name {
    ///     "DATABASE_URL" => Some("postgres://localhost/products".to_owned()),
    ///     "APP_ENV" => Some("production".to_owned()),
    ///     _ => None,
    /// });
    ///
    /// let settings = ServiceSettings::from_env(&env)?;
    /// assert_eq!(settings.port, 3000);
    /// assert_eq!(settings.mode, RuntimeMode::Production);
    /// # Ok::<(), product_service::server::SettingsError>(())
    /// ```
    pub fn from_env<E: Env>(env: &E) -> Result<Self, SettingsError> {
        let database_url = non_blank(env, DATABASE_URL_ENV).ok_or(SettingsError::MissingEnv {
            name: DATABASE_URL_ENV,
        })?;
        let host = parse_or(env, HOST_ENV, DEFAULT_HOST, "an IP address")?;
        let port = parse_or(env, PORT_ENV, DEFAULT_PORT, "a port number")?;
        let cors_origins = non_blank(env, CORS_ORIGINS_ENV)
            .map(|raw| split_origins(&raw))
            .unwrap_or_default();
        let window_ms = parse_or(
            env,
            RATE_LIMIT_WINDOW_ENV,
            millis(DEFAULT_WINDOW),
            "a positive number of milliseconds",
        )?;
        let max_requests = parse_or(
            env,
            RATE_LIMIT_MAX_ENV,
            DEFAULT_MAX_REQUESTS,
            "a positive request count",
        )?;
        if window_ms == 0 {
            return Err(invalid(RATE_LIMIT_WINDOW_ENV, "0", "a positive number of milliseconds"));
        }
        if max_requests == 0 {
            return Err(invalid(RATE_LIMIT_MAX_ENV, "0", "a positive request count"));
        }
        let mode = match non_blank(env, APP_ENV_ENV) {
            Some(value) => value
                .parse()
                .map_err(|()| invalid(APP_ENV_ENV, &value, "production|development|test"))?,
            None => RuntimeMode::default(),
        };

        Ok(Self {
            database_url,
            host,
            port,
            cors_origins,
            rate_limit: RateLimitConfig {
                window: Duration::from_millis(window_ms),
                max_requests,
            },
            mode,
        })
    }

    /// Address the HTTP listener binds to.
    pub fn bind_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }
}

fn non_blank<E: Env>(env: &E, name: &str) -> Option<String> {
    env.string(name)
        .map(|value| value.trim().to_owned())
        .filter(|value| !value.is_empty())
}

fn parse_or<E: Env, T: FromStr>(
    env: &E,
    name: &'static str,
    default: T,
    expected: &'static str,
) -> Result<T, SettingsError> {
    match non_blank(env, name) {
        Some(value) => value
            .parse()
            .map_err(|_| invalid(name, &value, expected)),
        None => Ok(default),
    }
}

fn invalid(name: &'static str, value: &str, expected: &'static str) -> SettingsError {
    SettingsError::InvalidEnv {
        name,
        value: value.to_owned(),
        expected,
    }
}

fn split_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|origin| !origin.is_empty())
        .map(str::to_owned)
        .collect()
}

fn millis(duration: Duration) -> u64 {
    u64::try_from(duration.as_millis()).unwrap_or(u64::MAX)
}

#[cfg(test)]
#[path = "settings_tests.rs"]
mod tests;
