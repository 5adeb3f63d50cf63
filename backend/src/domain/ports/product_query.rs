//! Driving port for product reads.

use async_trait::async_trait;

use crate::domain::{Error, Product, ProductId};

/// Driving port for listing and fetching products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductQuery: Send + Sync {
    /// All products, newest first.
    async fn list(&self) -> Result<Vec<Product>, Error>;

    /// A single product.
    ///
    /// # Errors
    ///
    /// `not_found` when no product has this id.
    async fn get(&self, id: ProductId) -> Result<Product, Error>;
}

/// Fixture implementation backed by an empty catalogue.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductQuery;

#[async_trait]
impl ProductQuery for FixtureProductQuery {
    async fn list(&self) -> Result<Vec<Product>, Error> {
        Ok(Vec::new())
    }

    async fn get(&self, _id: ProductId) -> Result<Product, Error> {
        Err(Error::not_found("Product not found"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ErrorCode;

    #[tokio::test]
    async fn fixture_lists_nothing() {
        let products = FixtureProductQuery.list().await.expect("list succeeds");
        assert!(products.is_empty());
    }

    #[tokio::test]
    async fn fixture_get_reports_not_found() {
        let err = FixtureProductQuery
            .get(ProductId::random())
            .await
            .expect_err("empty catalogue");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
