//! Diesel table definitions for the PostgreSQL schema.
//!
//! Must match `migrations/` exactly; regenerate with `diesel print-schema`
//! after changing a migration.

diesel::table! {
    /// Product catalogue.
    ///
    /// Text columns are unbounded because escaping may lengthen values that
    /// passed the input length limits.
    products (id) {
        id -> Uuid,
        name -> Text,
        picture -> Nullable<Text>,
        supplier_name -> Nullable<Text>,
        unit -> Nullable<Text>,
        /// Guarded by `CHECK (stock >= 0)`.
        stock -> Int4,
        specification -> Nullable<Text>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}
