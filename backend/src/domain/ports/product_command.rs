//! Driving port for product mutations.
//!
//! HTTP handlers call [`ProductCommand`] with raw, still unvalidated input.
//! Implementations own validation, sanitisation and persistence, and report
//! failures as domain [`Error`] values.

use async_trait::async_trait;

use crate::domain::{DeletedProduct, Error, Product, ProductId, ProductInput};

/// Driving port for creating, updating and deleting products.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ProductCommand: Send + Sync {
    /// Validate and store a new product.
    ///
    /// # Errors
    ///
    /// `invalid_request` with every violation in `details.errors`, or
    /// `internal_error` if storage fails.
    async fn create(&self, input: ProductInput) -> Result<Product, Error>;

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// `invalid_request` for violations or an empty change set,
    /// `not_found` for an unknown id, `internal_error` otherwise.
    async fn update(&self, id: ProductId, input: ProductInput) -> Result<Product, Error>;

    /// Remove a product.
    ///
    /// # Errors
    ///
    /// `not_found` for an unknown id, `internal_error` otherwise.
    async fn delete(&self, id: ProductId) -> Result<DeletedProduct, Error>;
}

/// Fixture implementation for handler tests.
///
/// Creation echoes the sanitised input; updates and deletes report the id
/// as unknown.
#[derive(Debug, Default, Clone, Copy)]
pub struct FixtureProductCommand;

#[async_trait]
impl ProductCommand for FixtureProductCommand {
    async fn create(&self, input: ProductInput) -> Result<Product, Error> {
        let product = input
            .into_new_product()
            .map_err(|err| Error::invalid_request(err.to_string()))?;
        let now = chrono::Utc::now();
        Ok(Product {
            id: ProductId::random(),
            name: product.name,
            picture: product.picture,
            supplier_name: product.supplier_name,
            unit: product.unit,
            stock: product.stock,
            specification: product.specification,
            created_at: now,
            updated_at: now,
        })
    }

    async fn update(&self, _id: ProductId, _input: ProductInput) -> Result<Product, Error> {
        Err(Error::not_found("Product not found"))
    }

    async fn delete(&self, _id: ProductId) -> Result<DeletedProduct, Error> {
        Err(Error::not_found("Product not found"))
    }
}

#[cfg(test)]
mod tests {
    //! Regression coverage for this module.
    use super::*;
    use crate::domain::{ErrorCode, Field, StockValue};

    #[tokio::test]
    async fn fixture_create_sanitises_input() {
        let input = ProductInput {
            name: Field::Present(" <b> ".into()),
            stock: Field::Present(StockValue::Integer(2)),
            ..ProductInput::default()
        };
        let product = FixtureProductCommand
            .create(input)
            .await
            .expect("valid input");
        assert_eq!(product.name, "&lt;b&gt;");
        assert_eq!(product.stock, 2);
    }

    #[tokio::test]
    async fn fixture_create_rejects_invalid_input() {
        let err = FixtureProductCommand
            .create(ProductInput::default())
            .await
            .expect_err("name and stock missing");
        assert_eq!(err.code(), ErrorCode::InvalidRequest);
    }

    #[tokio::test]
    async fn fixture_delete_reports_not_found() {
        let err = FixtureProductCommand
            .delete(ProductId::random())
            .await
            .expect_err("unknown id");
        assert_eq!(err.code(), ErrorCode::NotFound);
    }
}
