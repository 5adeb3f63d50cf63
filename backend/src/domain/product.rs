//! Product entity and its sanitised write models.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::Field;

/// Server-assigned product identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ProductId(Uuid);

impl ProductId {
    /// Generate a new random identifier.
    pub fn random() -> Self {
        Self(Uuid::new_v4())
    }

    /// Wrap an existing UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Access the underlying UUID.
    pub fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl std::str::FromStr for ProductId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

impl From<Uuid> for ProductId {
    fn from(value: Uuid) -> Self {
        Self(value)
    }
}

/// A stored product row.
///
/// ## Invariants
/// - `stock` is never negative.
/// - `name` is non-empty.
/// - `created_at <= updated_at`.
///
/// Serialises with the storage column names (`supplier_name`,
/// `created_at`, ...), which is the shape returned to HTTP clients.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub name: String,
    pub picture: Option<String>,
    pub supplier_name: Option<String>,
    pub unit: Option<String>,
    pub stock: i32,
    pub specification: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Sanitised fields for a product about to be created.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewProduct {
    pub name: String,
    pub picture: Option<String>,
    pub supplier_name: Option<String>,
    pub unit: Option<String>,
    pub stock: i32,
    pub specification: Option<String>,
}

/// Sanitised partial update.
///
/// Required columns use `Option` (absent or replaced). Nullable columns use
/// [`Field`], where [`Field::Null`] clears the stored value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProductChanges {
    pub name: Option<String>,
    pub picture: Field<String>,
    pub supplier_name: Field<String>,
    pub unit: Field<String>,
    pub stock: Option<i32>,
    pub specification: Field<String>,
}

impl ProductChanges {
    /// True when no column would be touched.
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.picture.is_absent()
            && self.supplier_name.is_absent()
            && self.unit.is_absent()
            && self.stock.is_none()
            && self.specification.is_absent()
    }

    /// Apply the changes to an in-memory copy of a product.
    ///
    /// Timestamps are left to the caller.
    pub fn apply_to(&self, product: &mut Product) {
        fn merge(slot: &mut Option<String>, change: &Field<String>) {
            match change {
                Field::Absent => {}
                Field::Null => *slot = None,
                Field::Present(value) => *slot = Some(value.clone()),
            }
        }

        if let Some(name) = &self.name {
            product.name.clone_from(name);
        }
        if let Some(stock) = self.stock {
            product.stock = stock;
        }
        merge(&mut product.picture, &self.picture);
        merge(&mut product.supplier_name, &self.supplier_name);
        merge(&mut product.unit, &self.unit);
        merge(&mut product.specification, &self.specification);
    }
}

/// Identity of a product removed by a delete.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeletedProduct {
    pub id: ProductId,
    pub name: String,
}
