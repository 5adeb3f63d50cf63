//! Test utilities for the backend crate.
//!
//! This module provides shared helpers for both unit tests (in `src/`) and
//! integration tests (in `tests/`). It is only compiled for tests or with the
//! `test-support` feature.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Local, TimeDelta, Utc};
use mockable::{Clock, DefaultClock};

use crate::domain::ports::{ProductRepository, ProductRepositoryError};
use crate::domain::{DeletedProduct, NewProduct, Product, ProductChanges, ProductId};

/// Clock whose time only moves when told to.
pub struct MutableClock(Mutex<DateTime<Utc>>);

impl MutableClock {
    pub fn new(now: DateTime<Utc>) -> Self {
        Self(Mutex::new(now))
    }

    pub fn advance(&self, delta: Duration) {
        let delta = match TimeDelta::from_std(delta) {
            Ok(delta) => delta,
            Err(error) => {
                panic!("failed to convert Duration to TimeDelta: {error}; delta={delta:?}",)
            }
        };
        *self.lock_clock() += delta;
    }

    fn lock_clock(&self) -> MutexGuard<'_, DateTime<Utc>> {
        match self.0.lock() {
            Ok(guard) => guard,
            Err(_) => panic!("clock mutex"),
        }
    }
}

impl Clock for MutableClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.lock_clock()
    }
}

/// In-memory [`ProductRepository`] with the same observable behaviour as
/// the Diesel adapter.
///
/// Rows keep insertion order; listing returns newest first, breaking ties
/// on equal `created_at` by later insertion.
pub struct InMemoryProductRepository {
    rows: Mutex<Vec<Product>>,
    clock: Arc<dyn Clock>,
    failure: Mutex<Option<ProductRepositoryError>>,
}

impl Default for InMemoryProductRepository {
    fn default() -> Self {
        Self::with_clock(Arc::new(DefaultClock))
    }
}

impl InMemoryProductRepository {
    /// Empty repository stamping rows with the system clock.
    pub fn new() -> Self {
        Self::default()
    }

    /// Empty repository stamping rows with `clock`.
    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        Self {
            rows: Mutex::new(Vec::new()),
            clock,
            failure: Mutex::new(None),
        }
    }

    /// Make every subsequent call fail with `error`.
    pub fn fail_with(&self, error: ProductRepositoryError) {
        *lock(&self.failure) = Some(error);
    }

    /// Number of stored rows.
    pub fn len(&self) -> usize {
        lock(&self.rows).len()
    }

    /// True when nothing is stored.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn check_failure(&self) -> Result<(), ProductRepositoryError> {
        match lock(&self.failure).as_ref() {
            Some(error) => Err(error.clone()),
            None => Ok(()),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

#[async_trait]
impl ProductRepository for InMemoryProductRepository {
    async fn create(&self, product: &NewProduct) -> Result<Product, ProductRepositoryError> {
        self.check_failure()?;
        let now = self.clock.utc();
        let row = Product {
            id: ProductId::random(),
            name: product.name.clone(),
            picture: product.picture.clone(),
            supplier_name: product.supplier_name.clone(),
            unit: product.unit.clone(),
            stock: product.stock,
            specification: product.specification.clone(),
            created_at: now,
            updated_at: now,
        };
        lock(&self.rows).push(row.clone());
        Ok(row)
    }

    async fn list_all(&self) -> Result<Vec<Product>, ProductRepositoryError> {
        self.check_failure()?;
        let mut rows: Vec<Product> = lock(&self.rows).iter().rev().cloned().collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn find_by_id(&self, id: &ProductId) -> Result<Option<Product>, ProductRepositoryError> {
        self.check_failure()?;
        Ok(lock(&self.rows).iter().find(|row| row.id == *id).cloned())
    }

    async fn update(
        &self,
        id: &ProductId,
        changes: &ProductChanges,
    ) -> Result<Product, ProductRepositoryError> {
        self.check_failure()?;
        let now = self.clock.utc();
        let mut rows = lock(&self.rows);
        let row = rows
            .iter_mut()
            .find(|row| row.id == *id)
            .ok_or_else(|| ProductRepositoryError::not_found(id.to_string()))?;
        changes.apply_to(row);
        row.updated_at = now;
        Ok(row.clone())
    }

    async fn delete(&self, id: &ProductId) -> Result<DeletedProduct, ProductRepositoryError> {
        self.check_failure()?;
        let mut rows = lock(&self.rows);
        let index = rows
            .iter()
            .position(|row| row.id == *id)
            .ok_or_else(|| ProductRepositoryError::not_found(id.to_string()))?;
        let row = rows.remove(index);
        Ok(DeletedProduct {
            id: row.id,
            name: row.name,
        })
    }
}
