//! Integration tests for `DieselProductRepository` against PostgreSQL.
//!
//! The suite runs when `PRODUCT_TEST_DATABASE_URL` points at a disposable
//! database. Migrations are applied and the `products` table is emptied
//! before every test; without the variable each test prints a skip marker
//! and returns.

use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError};
use std::time::Duration;

use chrono::{TimeZone, Utc};
use diesel::pg::PgConnection;
use diesel::{Connection, RunQueryDsl};
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use mockable::Clock;
use product_service::domain::ports::{ProductRepository, ProductRepositoryError};
use product_service::domain::{Field, NewProduct, ProductChanges, ProductId};
use product_service::outbound::persistence::{DbPool, DieselProductRepository, PoolConfig};
use product_service::test_support::MutableClock;
use rstest::rstest;

/// Embedded migrations from the backend/migrations directory.
const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

const DATABASE_URL_ENV: &str = "PRODUCT_TEST_DATABASE_URL";

/// Tests share one database, so they run one at a time.
static DATABASE_LOCK: OnceLock<Mutex<()>> = OnceLock::new();

struct TestContext {
    repository: DieselProductRepository,
    clock: Arc<MutableClock>,
    _guard: MutexGuard<'static, ()>,
}

fn prepare_schema(url: &str) {
    let mut conn = PgConnection::establish(url).expect("connect for migrations");
    conn.run_pending_migrations(MIGRATIONS)
        .expect("apply migrations");
    diesel::sql_query("DELETE FROM products")
        .execute(&mut conn)
        .expect("empty products table");
}

async fn context() -> Option<TestContext> {
    let Ok(url) = std::env::var(DATABASE_URL_ENV) else {
        eprintln!("SKIP-PRODUCT-DB: {DATABASE_URL_ENV} not set");
        return None;
    };
    let guard = DATABASE_LOCK
        .get_or_init(|| Mutex::new(()))
        .lock()
        .unwrap_or_else(PoisonError::into_inner);
    prepare_schema(&url);

    let pool = DbPool::new(PoolConfig::new(url).with_min_idle(Some(1)))
        .await
        .expect("build pool");
    let start = Utc
        .with_ymd_and_hms(2026, 3, 1, 9, 0, 0)
        .single()
        .expect("valid fixture timestamp");
    let clock = Arc::new(MutableClock::new(start));
    let repository =
        DieselProductRepository::with_clock(pool, Arc::clone(&clock) as Arc<dyn Clock>);
    Some(TestContext {
        repository,
        clock,
        _guard: guard,
    })
}

fn new_product(name: &str, stock: i32) -> NewProduct {
    NewProduct {
        name: name.to_owned(),
        picture: Some("https:&#x2F;&#x2F;img.example&#x2F;w.png".to_owned()),
        supplier_name: Some("Acme".to_owned()),
        unit: Some("box".to_owned()),
        stock,
        specification: None,
    }
}

#[rstest]
#[tokio::test]
async fn create_then_find_round_trips() {
    let Some(ctx) = context().await else { return };

    let created = ctx
        .repository
        .create(&new_product("Widget", 5))
        .await
        .expect("create");
    assert_eq!(created.created_at, created.updated_at);

    let found = ctx
        .repository
        .find_by_id(&created.id)
        .await
        .expect("find")
        .expect("row exists");
    assert_eq!(found, created);
}

#[rstest]
#[tokio::test]
async fn list_is_newest_first() {
    let Some(ctx) = context().await else { return };
    assert!(ctx.repository.list_all().await.expect("list").is_empty());

    ctx.repository
        .create(&new_product("Older", 1))
        .await
        .expect("create");
    ctx.clock.advance(Duration::from_secs(1));
    ctx.repository
        .create(&new_product("Newer", 1))
        .await
        .expect("create");

    let names: Vec<String> = ctx
        .repository
        .list_all()
        .await
        .expect("list")
        .into_iter()
        .map(|p| p.name)
        .collect();
    assert_eq!(names, ["Newer", "Older"]);
}

#[rstest]
#[tokio::test]
async fn update_touches_only_given_columns() {
    let Some(ctx) = context().await else { return };
    let created = ctx
        .repository
        .create(&new_product("Widget", 5))
        .await
        .expect("create");
    ctx.clock.advance(Duration::from_secs(3));

    let changes = ProductChanges {
        stock: Some(3),
        unit: Field::Null,
        ..ProductChanges::default()
    };
    let updated = ctx
        .repository
        .update(&created.id, &changes)
        .await
        .expect("update");

    assert_eq!(updated.stock, 3);
    assert_eq!(updated.unit, None);
    assert_eq!(updated.supplier_name, created.supplier_name);
    assert_eq!(updated.created_at, created.created_at);
    assert!(updated.updated_at > created.updated_at);
}

#[rstest]
#[tokio::test]
async fn delete_returns_identity_and_removes_row() {
    let Some(ctx) = context().await else { return };
    let created = ctx
        .repository
        .create(&new_product("Widget", 5))
        .await
        .expect("create");

    let deleted = ctx.repository.delete(&created.id).await.expect("delete");
    assert_eq!(deleted.id, created.id);
    assert_eq!(deleted.name, "Widget");
    assert!(
        ctx.repository
            .find_by_id(&created.id)
            .await
            .expect("find")
            .is_none()
    );
}

#[rstest]
#[tokio::test]
async fn missing_rows_report_not_found() {
    let Some(ctx) = context().await else { return };
    let id = ProductId::random();

    let update = ctx
        .repository
        .update(
            &id,
            &ProductChanges {
                stock: Some(1),
                ..ProductChanges::default()
            },
        )
        .await;
    assert!(matches!(update, Err(ProductRepositoryError::NotFound { .. })));

    let delete = ctx.repository.delete(&id).await;
    assert!(matches!(delete, Err(ProductRepositoryError::NotFound { .. })));
}
