//! OpenAPI documentation configuration.
//!
//! This module defines the [`ApiDoc`] struct which generates the OpenAPI
//! specification for the REST API. It registers:
//!
//! - **Paths**: every HTTP endpoint from the inbound layer (products, health,
//!   service info)
//! - **Schemas**: domain type wrappers ([`ErrorSchema`], [`ProductSchema`],
//!   [`ProductPayloadSchema`] and friends) that provide OpenAPI definitions
//!   without coupling domain types to the utoipa framework
//!
//! The generated specification is used by Swagger UI (debug builds) and
//! exported via `cargo run --bin openapi-dump` for external tooling.

use crate::inbound::http::health::HealthStatus;
use crate::inbound::http::products::{DeleteProductResponse, ProductListResponse};
use crate::inbound::http::schemas::{
    DeletedProductSchema, ErrorCodeSchema, ErrorSchema, ProductPayloadSchema, ProductSchema,
};
use crate::inbound::http::service_info::{ServiceEndpoints, ServiceInfo};
use utoipa::OpenApi;

/// OpenAPI document for the REST API.
/// Swagger UI is enabled in debug builds only and used by tooling.
#[derive(OpenApi)]
#[openapi(
    info(
        title = "Product API Service",
        description = "CRUD interface for the product catalogue plus health probes.",
    ),
    servers(
        (url = "/", description = "Relative to the deployment base URL")
    ),
    paths(
        crate::inbound::http::products::create_product,
        crate::inbound::http::products::list_products,
        crate::inbound::http::products::get_product,
        crate::inbound::http::products::update_product,
        crate::inbound::http::products::delete_product,
        crate::inbound::http::health::health,
        crate::inbound::http::health::ready,
        crate::inbound::http::health::live,
        crate::inbound::http::service_info::service_info,
    ),
    components(schemas(
        ProductSchema,
        ProductPayloadSchema,
        DeletedProductSchema,
        ProductListResponse,
        DeleteProductResponse,
        ErrorSchema,
        ErrorCodeSchema,
        HealthStatus,
        ServiceInfo,
        ServiceEndpoints,
    )),
    tags(
        (name = "products", description = "Product catalogue operations"),
        (name = "health", description = "Endpoints for health checks"),
        (name = "service", description = "Service metadata")
    )
)]
pub struct ApiDoc;
