//! Shared application state for all routes.

use crate::catalog::Catalog;
use crate::config::QuerySettings;
use sqlx::PgPool;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub pool: PgPool,
    pub catalog: Arc<dyn Catalog>,
    pub query: Arc<QuerySettings>,
}

impl AppState {
    pub fn new(pool: PgPool, catalog: Arc<dyn Catalog>, query: QuerySettings) -> Self {
        AppState {
            pool,
            catalog,
            query: Arc::new(query),
        }
    }
}
