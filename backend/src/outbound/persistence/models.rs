//! Internal Diesel row structs for database operations.
//!
//! These types never leave the persistence layer; repositories convert them
//! to and from domain types.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::{Field, NewProduct, Product, ProductChanges, ProductId};

use super::schema::products;

/// Row struct for reading from the products table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = products)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct ProductRow {
    pub id: Uuid,
    pub name: String,
    pub picture: Option<String>,
    pub supplier_name: Option<String>,
    pub unit: Option<String>,
    pub stock: i32,
    pub specification: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Self {
            id: ProductId::from_uuid(row.id),
            name: row.name,
            picture: row.picture,
            supplier_name: row.supplier_name,
            unit: row.unit,
            stock: row.stock,
            specification: row.specification,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

/// Insertable struct for new product rows.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = products)]
pub(crate) struct NewProductRow<'a> {
    pub id: Uuid,
    pub name: &'a str,
    pub picture: Option<&'a str>,
    pub supplier_name: Option<&'a str>,
    pub unit: Option<&'a str>,
    pub stock: i32,
    pub specification: Option<&'a str>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> NewProductRow<'a> {
    /// Stamp both timestamps with `now`.
    pub fn new(id: Uuid, product: &'a NewProduct, now: DateTime<Utc>) -> Self {
        Self {
            id,
            name: &product.name,
            picture: product.picture.as_deref(),
            supplier_name: product.supplier_name.as_deref(),
            unit: product.unit.as_deref(),
            stock: product.stock,
            specification: product.specification.as_deref(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Changeset for partial updates.
///
/// `None` leaves a column untouched; `Some(None)` writes `NULL`.
/// `updated_at` is always set, so the changeset is never empty.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = products)]
pub(crate) struct ProductChangeset<'a> {
    pub name: Option<&'a str>,
    pub picture: Option<Option<&'a str>>,
    pub supplier_name: Option<Option<&'a str>>,
    pub unit: Option<Option<&'a str>>,
    pub stock: Option<i32>,
    pub specification: Option<Option<&'a str>>,
    pub updated_at: DateTime<Utc>,
}

impl<'a> ProductChangeset<'a> {
    pub fn new(changes: &'a ProductChanges, now: DateTime<Utc>) -> Self {
        Self {
            name: changes.name.as_deref(),
            picture: nullable(&changes.picture),
            supplier_name: nullable(&changes.supplier_name),
            unit: nullable(&changes.unit),
            stock: changes.stock,
            specification: nullable(&changes.specification),
            updated_at: now,
        }
    }
}

fn nullable(field: &Field<String>) -> Option<Option<&str>> {
    match field {
        Field::Absent => None,
        Field::Null => Some(None),
        Field::Present(value) => Some(Some(value.as_str())),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn changeset_distinguishes_untouched_from_cleared() {
        let changes = ProductChanges {
            unit: Field::Null,
            picture: Field::Present("p.png".to_owned()),
            ..ProductChanges::default()
        };
        let now = Utc::now();
        let changeset = ProductChangeset::new(&changes, now);

        assert_eq!(changeset.unit, Some(None));
        assert_eq!(changeset.picture, Some(Some("p.png")));
        assert_eq!(changeset.supplier_name, None);
        assert_eq!(changeset.name, None);
        assert_eq!(changeset.updated_at, now);
    }

    #[test]
    fn new_row_uses_one_timestamp_for_both_columns() {
        let product = NewProduct {
            name: "Widget".to_owned(),
            picture: None,
            supplier_name: Some("Acme".to_owned()),
            unit: None,
            stock: 1,
            specification: None,
        };
        let now = Utc::now();
        let row = NewProductRow::new(Uuid::new_v4(), &product, now);

        assert_eq!(row.created_at, row.updated_at);
        assert_eq!(row.supplier_name, Some("Acme"));
    }
}
