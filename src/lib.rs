//! Catalog query: a metadata-driven read API over a PostgreSQL schema. Callers name tables and a
//! join column; visible columns, display aliases and join predicates come from a metadata catalog.

pub mod case;
pub mod catalog;
pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod routes;
pub mod service;
pub mod sql;
pub mod state;

pub use catalog::{Catalog, PgCatalog, StaticCatalog};
pub use config::{CatalogTables, QuerySettings, Settings};
pub use error::{AppError, ConfigError};
pub use response::{DataDictionaryResult, DataResult};
pub use routes::{app, common_routes, common_routes_with_ready, query_routes};
pub use service::{QueryCompiler, QueryExecutor, QueryService};
pub use state::AppState;
