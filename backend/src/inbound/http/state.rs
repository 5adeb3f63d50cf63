//! Shared HTTP adapter state.
//!
//! Handlers receive this through `actix_web::web::Data` and depend only on
//! the product driving ports, so they stay testable without I/O.

use std::sync::Arc;

use crate::domain::ports::{ProductCommand, ProductQuery};

/// Dependency bundle for HTTP handlers.
#[derive(Clone)]
pub struct HttpState {
    pub products: Arc<dyn ProductCommand>,
    pub products_query: Arc<dyn ProductQuery>,
}

impl HttpState {
    /// Bundle the product ports.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    ///
    /// use product_service::domain::ports::{FixtureProductCommand, FixtureProductQuery};
    /// use product_service::inbound::http::state::HttpState;
    ///
    /// let state = HttpState::new(Arc::new(FixtureProductCommand), Arc::new(FixtureProductQuery));
    /// let _query = state.products_query.clone();
    /// ```
    pub fn new(products: Arc<dyn ProductCommand>, products_query: Arc<dyn ProductQuery>) -> Self {
        Self {
            products,
            products_query,
        }
    }

    /// Use one value for both ports, as with [`crate::domain::ProductService`].
    pub fn from_service<S>(service: Arc<S>) -> Self
    where
        S: ProductCommand + ProductQuery + 'static,
    {
        Self {
            products: Arc::clone(&service) as Arc<dyn ProductCommand>,
            products_query: service,
        }
    }
}
