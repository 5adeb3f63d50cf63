//! PostgreSQL-backed `ProductRepository` implementation using Diesel ORM.
//!
//! Every operation is a single parameterised statement. Updates are built
//! from a typed changeset, so column names never come from client input.

use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel_async::RunQueryDsl;
use mockable::{Clock, DefaultClock};
use tracing::debug;
use uuid::Uuid;

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{DeletedProduct, NewProduct, Product, ProductChanges, ProductId};

use super::models::{NewProductRow, ProductChangeset, ProductRow};
use super::pool::{DbPool, PoolError};
use super::schema::products;

/// Diesel-backed implementation of the `ProductRepository` port.
///
/// Identifiers are random v4 UUIDs; timestamps come from the injected clock.
#[derive(Clone)]
pub struct DieselProductRepository {
    pool: DbPool,
    clock: Arc<dyn Clock>,
}

impl DieselProductRepository {
    /// Create a repository stamping rows with the system clock.
    pub fn new(pool: DbPool) -> Self {
        Self::with_clock(pool, Arc::new(DefaultClock))
    }

    /// Create a repository with an explicit clock.
    pub fn with_clock(pool: DbPool, clock: Arc<dyn Clock>) -> Self {
        Self { pool, clock }
    }
}

fn map_pool_error(error: PoolError) -> ProductRepositoryError {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => {
            ProductRepositoryError::connection(message)
        }
    }
}

fn map_diesel_error(error: diesel::result::Error) -> ProductRepositoryError {
    use diesel::result::{DatabaseErrorKind, Error as DieselError};

    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            ProductRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            ProductRepositoryError::query("product violates a table constraint")
        }
        DieselError::QueryBuilderError(_) => ProductRepositoryError::query("database query error"),
        _ => ProductRepositoryError::query("database error"),
    }
}

#[async_trait]
impl ProductRepository for DieselProductRepository {
    async fn create(&self, product: &NewProduct) -> Result<Product, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let row = NewProductRow::new(Uuid::new_v4(), product, self.clock.utc());

        diesel::insert_into(products::table)
            .values(&row)
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .map(Product::from)
            .map_err(map_diesel_error)
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let rows: Vec<ProductRow> = products::table
            .order(products::created_at.desc())
            .select(ProductRow::as_select())
            .load(&mut conn)
            .await
            .map_err(map_diesel_error)?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let row: Option<ProductRow> = products::table
            .find(*id.as_uuid())
            .select(ProductRow::as_select())
            .first(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        Ok(row.map(Product::from))
    }

    async fn update(
        &self,
        id: &ProductId,
        changes: &ProductChanges,
    ) -> Result<Product, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;
        let changeset = ProductChangeset::new(changes, self.clock.utc());

        let row: Option<ProductRow> = diesel::update(products::table.find(*id.as_uuid()))
            .set(&changeset)
            .returning(ProductRow::as_returning())
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        row.map(Product::from)
            .ok_or_else(|| ProductRepositoryError::not_found(id.to_string()))
    }

    async fn delete(&self, id: &ProductId) -> Result<DeletedProduct, ProductRepositoryError> {
        let mut conn = self.pool.get().await.map_err(map_pool_error)?;

        let removed: Option<(Uuid, String)> = diesel::delete(products::table.find(*id.as_uuid()))
            .returning((products::id, products::name))
            .get_result(&mut conn)
            .await
            .optional()
            .map_err(map_diesel_error)?;

        removed
            .map(|(id, name)| DeletedProduct {
                id: ProductId::from_uuid(id),
                name,
            })
            .ok_or_else(|| ProductRepositoryError::not_found(id.to_string()))
    }
}
