//! PostgreSQL persistence adapters using Diesel ORM.
//!
//! Repository implementations only translate between Diesel rows and domain
//! types. Row structs (`models.rs`) and table definitions (`schema.rs`) stay
//! private to this module.
//!
//! # Example
//!
//! ```no_run
//! use product_service::outbound::persistence::{DbPool, DieselProductRepository, PoolConfig};
//!
//! # async fn run() -> Result<(), product_service::outbound::persistence::PoolError> {
//! let pool = DbPool::new(PoolConfig::new("postgres://localhost/products")).await?;
//! let repo = DieselProductRepository::new(pool);
//! # let _ = repo;
//! # Ok(())
//! # }
//! ```

mod diesel_product_repository;
mod models;
mod pool;
mod schema;

pub use diesel_product_repository::DieselProductRepository;
pub use pool::{
    DEFAULT_CONNECTION_TIMEOUT, DEFAULT_MAX_SIZE, DEFAULT_MIN_IDLE, DbPool, PoolConfig, PoolError,
};
