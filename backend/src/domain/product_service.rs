//! Product use-case service.
//!
//! Implements the driving ports on top of a [`ProductRepository`]: payloads
//! are validated and sanitised here, repository outcomes are translated into
//! domain errors, and nothing is written unless the whole payload is valid.

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::json;

use crate::domain::ports::{
    ProductCommand, ProductQuery, ProductRepository, ProductRepositoryError,
};
use crate::domain::{
    DeletedProduct, Error, Product, ProductId, ProductInput, ProductValidationError,
};

/// Message returned when a product id does not match any row.
pub const PRODUCT_NOT_FOUND: &str = "Product not found";

/// Product service implementing [`ProductCommand`] and [`ProductQuery`].
pub struct ProductService<R> {
    repo: Arc<R>,
}

impl<R> Clone for ProductService<R> {
    fn clone(&self) -> Self {
        Self {
            repo: Arc::clone(&self.repo),
        }
    }
}

impl<R> ProductService<R> {
    /// Create a service over the given repository.
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }
}

impl<R> ProductService<R>
where
    R: ProductRepository,
{
    fn map_repository_error(error: ProductRepositoryError) -> Error {
        match error {
            ProductRepositoryError::NotFound { .. } => Error::not_found(PRODUCT_NOT_FOUND),
            ProductRepositoryError::Connection { message } => {
                Error::internal(format!("product repository unavailable: {message}"))
            }
            ProductRepositoryError::Query { message } => {
                Error::internal(format!("product repository error: {message}"))
            }
        }
    }

    fn validation_error(error: ProductValidationError) -> Error {
        Error::invalid_request("validation failed").with_details(json!({
            "errors": error.errors,
            "code": "validation_failed",
        }))
    }
}

#[async_trait]
impl<R> ProductCommand for ProductService<R>
where
    R: ProductRepository,
{
    async fn create(&self, input: ProductInput) -> Result<Product, Error> {
        let product = input.into_new_product().map_err(Self::validation_error)?;
        self.repo
            .create(&product)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product, Error> {
        let changes = input.into_changes().map_err(Self::validation_error)?;
        if changes.is_empty() {
            return Err(Error::invalid_request("no fields to update")
                .with_details(json!({ "code": "empty_update" })));
        }
        self.repo
            .update(&id, &changes)
            .await
            .map_err(Self::map_repository_error)
    }

    async fn delete(&self, id: ProductId) -> Result<DeletedProduct, Error> {
        self.repo
            .delete(&id)
            .await
            .map_err(Self::map_repository_error)
    }
}

#[async_trait]
impl<R> ProductQuery for ProductService<R>
where
    R: ProductRepository,
{
    async fn list(&self) -> Result<Vec<Product>, Error> {
        self.repo
            .list_all()
            .await
            .map_err(Self::map_repository_error)
    }

    async fn get(&self, id: ProductId) -> Result<Product, Error> {
        self.repo
            .find_by_id(&id)
            .await
            .map_err(Self::map_repository_error)?
            .ok_or_else(|| Error::not_found(PRODUCT_NOT_FOUND))
    }
}
