//! Fallback for requests no route matched.

use actix_web::{HttpRequest, HttpResponse};
use serde::{Deserialize, Serialize};

/// Body of the 404 fallback.
#[derive(Debug, Serialize, Deserialize, utoipa::ToSchema)]
pub struct EndpointNotFound {
    pub status: u16,
    pub error: String,
    pub path: String,
    pub method: String,
}

/// Default service answering 404 with the unmatched path and method.
pub async fn endpoint_not_found(req: HttpRequest) -> HttpResponse {
    HttpResponse::NotFound().json(EndpointNotFound {
        status: 404,
        error: "Endpoint not found".to_owned(),
        path: req.path().to_owned(),
        method: req.method().to_string(),
    })
}
