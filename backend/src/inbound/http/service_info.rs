//! Root endpoint describing the service.

use actix_web::{get, web};
use serde::{Deserialize, Serialize};

/// Entry points advertised by `GET /`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ServiceEndpoints {
    #[schema(example = "/api/products")]
    pub products: String,
    #[schema(example = "/health")]
    pub health: String,
}

/// Body of `GET /`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ServiceInfo {
    #[schema(example = "Product API Service")]
    pub message: String,
    #[schema(example = "0.1.0")]
    pub version: String,
    pub endpoints: ServiceEndpoints,
}

/// Service name and entry points.
#[utoipa::path(
    get,
    path = "/",
    tags = ["service"],
    responses((status = 200, description = "Service metadata", body = ServiceInfo))
)]
#[get("/")]
pub async fn service_info() -> web::Json<ServiceInfo> {
    web::Json(ServiceInfo {
        message: "Product API Service".to_owned(),
        version: env!("CARGO_PKG_VERSION").to_owned(),
        endpoints: ServiceEndpoints {
            products: "/api/products".to_owned(),
            health: "/health".to_owned(),
        },
    })
}
