//! HTTP inbound adapter exposing REST endpoints.

pub mod error;
pub mod health;
pub mod not_found;
pub mod products;
pub mod schemas;
pub mod service_info;
pub mod state;
pub mod validation;

pub use error::ApiResult;
