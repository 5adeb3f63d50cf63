//! Product API handlers.
//!
//! ```text
//! POST   /api/products      {"name":"Widget","stock":5}
//! GET    /api/products
//! GET    /api/products/{id}
//! PUT    /api/products/{id} {"stock":3}
//! DELETE /api/products/{id}
//! ```
//!
//! Handlers parse transport input, call a driving port, and shape the
//! response. Validation and persistence live behind the ports.

use actix_web::{HttpResponse, delete, get, post, put, web};
use serde::{Deserialize, Serialize};

use crate::domain::{DeletedProduct, Product, ProductInput};
use crate::inbound::http::ApiResult;
use crate::inbound::http::schemas::{
    DeletedProductSchema, ErrorSchema, ProductPayloadSchema, ProductSchema,
};
use crate::inbound::http::state::HttpState;
use crate::inbound::http::validation::parse_product_id;

/// Confirmation message returned by `DELETE /api/products/{id}`.
pub const PRODUCT_DELETED: &str = "Product deleted";

/// Response body for `GET /api/products`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct ProductListResponse {
    #[schema(value_type = Vec<ProductSchema>)]
    pub data: Vec<Product>,
    pub count: usize,
}

/// Response body for `DELETE /api/products/{id}`.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct DeleteProductResponse {
    pub message: String,
    #[schema(value_type = DeletedProductSchema)]
    pub deleted_product: DeletedProduct,
}

/// Create a product.
#[utoipa::path(
    post,
    path = "/api/products",
    request_body = ProductPayloadSchema,
    responses(
        (status = 201, description = "Product created", body = ProductSchema),
        (status = 400, description = "Validation failed or malformed JSON", body = ErrorSchema),
        (status = 429, description = "Rate limit exceeded", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "createProduct"
)]
#[post("/products")]
pub async fn create_product(
    state: web::Data<HttpState>,
    payload: web::Json<ProductInput>,
) -> ApiResult<HttpResponse> {
    let product = state.products.create(payload.into_inner()).await?;
    Ok(HttpResponse::Created().json(product))
}

/// List every product, newest first.
///
/// # Examples
/// ```
/// use actix_web::{App, web};
/// use product_service::inbound::http::products::list_products;
///
/// let app = App::new().service(web::scope("/api").service(list_products));
/// ```
#[utoipa::path(
    get,
    path = "/api/products",
    responses(
        (status = 200, description = "All products", body = ProductListResponse),
        (status = 429, description = "Rate limit exceeded", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "listProducts"
)]
#[get("/products")]
pub async fn list_products(state: web::Data<HttpState>) -> ApiResult<web::Json<ProductListResponse>> {
    let data = state.products_query.list().await?;
    let count = data.len();
    Ok(web::Json(ProductListResponse { data, count }))
}

/// Fetch one product.
#[utoipa::path(
    get,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product", body = ProductSchema),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown id", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "getProduct"
)]
#[get("/products/{id}")]
pub async fn get_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<Product>> {
    let id = parse_product_id(&path.into_inner())?;
    let product = state.products_query.get(id).await?;
    Ok(web::Json(product))
}

/// Replace any subset of a product's fields.
#[utoipa::path(
    put,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product UUID")),
    request_body = ProductPayloadSchema,
    responses(
        (status = 200, description = "Updated product", body = ProductSchema),
        (status = 400, description = "Malformed id, validation failure or empty update", body = ErrorSchema),
        (status = 404, description = "Unknown id", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "updateProduct"
)]
#[put("/products/{id}")]
pub async fn update_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
    payload: web::Json<ProductInput>,
) -> ApiResult<web::Json<Product>> {
    let id = parse_product_id(&path.into_inner())?;
    let product = state.products.update(id, payload.into_inner()).await?;
    Ok(web::Json(product))
}

/// Permanently remove a product.
#[utoipa::path(
    delete,
    path = "/api/products/{id}",
    params(("id" = String, Path, description = "Product UUID")),
    responses(
        (status = 200, description = "Product deleted", body = DeleteProductResponse),
        (status = 400, description = "Malformed id", body = ErrorSchema),
        (status = 404, description = "Unknown id", body = ErrorSchema),
        (status = 500, description = "Internal server error", body = ErrorSchema)
    ),
    tags = ["products"],
    operation_id = "deleteProduct"
)]
#[delete("/products/{id}")]
pub async fn delete_product(
    state: web::Data<HttpState>,
    path: web::Path<String>,
) -> ApiResult<web::Json<DeleteProductResponse>> {
    let id = parse_product_id(&path.into_inner())?;
    let deleted_product = state.products.delete(id).await?;
    Ok(web::Json(DeleteProductResponse {
        message: PRODUCT_DELETED.to_owned(),
        deleted_product,
    }))
}

#[cfg(test)]
#[path = "products_tests.rs"]
mod tests;
