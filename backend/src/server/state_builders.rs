//! Builders for HTTP state ports.

use std::sync::Arc;

use actix_web::web;

use crate::domain::ProductService;
use crate::domain::ports::{
    FixtureProductCommand, FixtureProductQuery, ProductCommand, ProductQuery,
};
use crate::inbound::http::state::HttpState;
use crate::outbound::persistence::{DbPool, DieselProductRepository};

/// Build a command/query port pair using the real service when a pool is
/// available, otherwise using fixture implementations.
fn build_product_ports<Pool, S>(
    pool: Option<&Pool>,
    make_service: impl FnOnce(&Pool) -> S,
) -> (Arc<dyn ProductCommand>, Arc<dyn ProductQuery>)
where
    S: ProductCommand + ProductQuery + 'static,
{
    match pool {
        Some(pool) => {
            let service = Arc::new(make_service(pool));
            (Arc::clone(&service) as Arc<dyn ProductCommand>, service)
        }
        None => (Arc::new(FixtureProductCommand), Arc::new(FixtureProductQuery)),
    }
}

/// Build the shared handler state for the configured database pool.
pub(crate) fn build_http_state(pool: Option<&DbPool>) -> web::Data<HttpState> {
    let (products, products_query) = build_product_ports(pool, |pool| {
        ProductService::new(Arc::new(DieselProductRepository::new(pool.clone())))
    });
    web::Data::new(HttpState::new(products, products_query))
}
