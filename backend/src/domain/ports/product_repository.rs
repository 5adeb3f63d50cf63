//! Port for product persistence.
//!
//! The [`ProductRepository`] trait is the only owner of stored products.
//! Adapters assign identifiers and timestamps; callers hand over sanitised
//! write models and receive full rows back.

use async_trait::async_trait;

use crate::domain::{DeletedProduct, NewProduct, Product, ProductChanges, ProductId};

use super::define_port_error;

define_port_error! {
    /// Errors raised by product repository adapters.
    pub enum ProductRepositoryError {
        /// Repository connection could not be established.
        Connection { message: String } =>
            "product repository connection failed: {message}",
        /// Query or mutation failed during execution.
        Query { message: String } =>
            "product repository query failed: {message}",
        /// No row matched the identifier of an update or delete.
        NotFound { id: String } =>
            "product {id} not found",
    }
}

/// Port for product storage and retrieval.
///
/// Each method maps to a single statement; no method holds a connection
/// across more than one round trip.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// Insert a product, assigning its id and equal creation/update stamps.
    async fn create(&self, product: &NewProduct) -> Result<Product, ProductRepositoryError>;

    /// All products, newest first. An empty table yields an empty vector.
    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError>;

    /// Fetch a product; `None` when no row has this id.
    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError>;

    /// Apply `changes` and refresh `updated_at`.
    ///
    /// Returns [`ProductRepositoryError::NotFound`] when no row matched.
    async fn update(
        &self,
        id: &ProductId,
        changes: &ProductChanges,
    ) -> Result<Product, ProductRepositoryError>;

    /// Remove a product permanently.
    ///
    /// Returns [`ProductRepositoryError::NotFound`] when no row matched.
    async fn delete(&self, id: &ProductId) -> Result<DeletedProduct, ProductRepositoryError>;
}

/// Fixture implementation for tests that do not exercise storage.
///
/// Reads see an empty table; writes to existing ids report not found.
/// Creation echoes the input with a fresh id and the current time.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductRepository;

#[async_trait]
impl ProductRepository for FixtureProductRepository {
    async fn create(&self, product: &NewProduct) -> Result<Product, ProductRepositoryError> {
        let now = chrono::Utc::now();
        Ok(Product {
            id: ProductId::random(),
            name: product.name.clone(),
            picture: product.picture.clone(),
            supplier_name: product.supplier_name.clone(),
            unit: product.unit.clone(),
            stock: product.stock,
            specification: product.specification.clone(),
            created_at: now,
            updated_at: now,
        })
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        Ok(Vec::new())
    }

    async fn find_by_id(&self, _id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        Ok(None)
    }

    async fn update(
        &self,
        id: &ProductId,
        _changes: &ProductChanges,
    ) -> Result<Product, ProductRepositoryError> {
        Err(ProductRepositoryError::not_found(id.to_string()))
    }

    async fn delete(&self, id: &ProductId) -> Result<DeletedProduct, ProductRepositoryError> {
        Err(ProductRepositoryError::not_found(id.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn widget() -> NewProduct {
        NewProduct {
            name: "Widget".to_owned(),
            picture: None,
            supplier_name: None,
            unit: None,
            stock: 5,
            specification: None,
        }
    }

    #[tokio::test]
    async fn fixture_create_stamps_equal_timestamps() {
        let product = FixtureProductRepository
            .create(&widget())
            .await
            .expect("fixture create succeeds");
        assert_eq!(product.created_at, product.updated_at);
        assert_eq!(product.stock, 5);
    }

    #[tokio::test]
    async fn fixture_reads_see_empty_table() {
        let repo = FixtureProductRepository;
        assert!(repo.list_all().await.expect("list").is_empty());
        assert!(
            repo.find_by_id(&ProductId::random())
                .await
                .expect("find")
                .is_none()
        );
    }

    #[tokio::test]
    async fn fixture_delete_reports_not_found() {
        let id = ProductId::random();
        let err = FixtureProductRepository
            .delete(&id)
            .await
            .expect_err("nothing to delete");
        assert_eq!(err, ProductRepositoryError::not_found(id.to_string()));
    }

    #[rstest]
    fn not_found_error_names_the_id() {
        let err = ProductRepositoryError::not_found("abc");
        assert_eq!(err.to_string(), "product abc not found");
    }
}
