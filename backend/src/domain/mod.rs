//! Domain primitives, aggregates and use-case services.
//!
//! Purpose: hold the product model and its rules independently of HTTP and
//! SQL. Adapters depend on this module, never the other way round.
//!
//! Public surface:
//! - Error / ErrorCode: transport-agnostic failure payload.
//! - Product / ProductId / NewProduct / ProductChanges / DeletedProduct.
//! - Field: presence-aware payload field (absent, null, value).
//! - ProductInput: raw client payload with validation and sanitisation.
//! - ProductService: implementation of the product driving ports.
//! - TraceId: request-scoped correlation identifier.

pub mod error;
pub mod field;
pub mod ports;
pub mod product;
pub mod product_service;
pub mod product_validation;
pub mod trace_id;

pub use self::error::{Error, ErrorCode};
pub use self::field::Field;
pub use self::product::{DeletedProduct, NewProduct, Product, ProductChanges, ProductId};
pub use self::product_service::{PRODUCT_NOT_FOUND, ProductService};
pub use self::product_validation::{
    NAME_MAX_CHARS, ProductInput, ProductValidationError, StockValue, TextValue,
    UNIT_MAX_CHARS, ValidationMode, escape_html,
};
pub use self::trace_id::{TRACE_ID_HEADER, TraceId};

/// Convenient API result alias.
///
/// # Examples
/// ```
/// use product_service::domain::{ApiResult, Error};
///
/// fn handler() -> ApiResult<()> {
///     Err(Error::not_found("nope"))
/// }
/// assert!(handler().is_err());
/// ```
pub type ApiResult<T> = Result<T, Error>;
