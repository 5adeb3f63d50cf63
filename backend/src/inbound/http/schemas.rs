//! OpenAPI schema definitions for domain types.
//!
//! Domain types stay framework-agnostic by not deriving `ToSchema`. The
//! wrappers here mirror their wire shape and live in the inbound adapter,
//! where framework concerns belong.

use utoipa::ToSchema;

/// OpenAPI schema for [`crate::domain::ErrorCode`].
#[derive(ToSchema)]
#[schema(as = ErrorCode)]
pub enum ErrorCodeSchema {
    /// The request is malformed or fails validation.
    #[schema(rename = "invalid_request")]
    InvalidRequest,
    /// The requested resource does not exist.
    #[schema(rename = "not_found")]
    NotFound,
    /// The client exceeded its request allowance.
    #[schema(rename = "rate_limited")]
    RateLimited,
    /// An unexpected error occurred on the server.
    #[schema(rename = "internal_error")]
    InternalError,
}

/// OpenAPI schema for [`crate::inbound::http::error::ErrorBody`].
#[derive(ToSchema)]
#[schema(as = Error, rename_all = "camelCase")]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ErrorSchema {
    /// HTTP status code repeated in the body.
    #[schema(example = 400)]
    status: u16,
    /// Human-readable message; internal failures are redacted.
    #[schema(example = "validation failed")]
    error: String,
    /// Stable machine-readable error code.
    code: ErrorCodeSchema,
    /// Correlation identifier, also sent in the `trace-id` header.
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    trace_id: Option<String>,
    /// Supplementary details, e.g. `{"errors": [...]}` for validation.
    details: Option<serde_json::Value>,
    /// Unredacted internal message; omitted in production.
    debug: Option<String>,
}

/// OpenAPI schema for [`crate::domain::Product`].
#[derive(ToSchema)]
#[schema(as = Product)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProductSchema {
    #[schema(example = "3fa85f64-5717-4562-b3fc-2c963f66afa6")]
    id: uuid::Uuid,
    #[schema(example = "Widget")]
    name: String,
    picture: Option<String>,
    supplier_name: Option<String>,
    unit: Option<String>,
    #[schema(example = 5, minimum = 0)]
    stock: i32,
    specification: Option<String>,
    created_at: chrono::DateTime<chrono::Utc>,
    updated_at: chrono::DateTime<chrono::Utc>,
}

/// OpenAPI schema for [`crate::domain::ProductInput`].
///
/// Every key is optional on update. On create `name` and `stock` are
/// required. `null` or blank text clears an optional column.
#[derive(ToSchema)]
#[schema(as = ProductPayload)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct ProductPayloadSchema {
    #[schema(example = "Widget", max_length = 255)]
    name: Option<String>,
    picture: Option<String>,
    #[schema(max_length = 255)]
    supplier_name: Option<String>,
    #[schema(max_length = 50)]
    unit: Option<String>,
    /// Non-negative integer; numeric strings are accepted.
    #[schema(value_type = Option<i64>, example = 5, minimum = 0)]
    stock: Option<serde_json::Value>,
    specification: Option<String>,
}

/// OpenAPI schema for [`crate::domain::DeletedProduct`].
#[derive(ToSchema)]
#[schema(as = DeletedProduct)]
#[expect(
    dead_code,
    reason = "Used only for OpenAPI schema generation via utoipa"
)]
pub struct DeletedProductSchema {
    id: uuid::Uuid,
    name: String,
}
