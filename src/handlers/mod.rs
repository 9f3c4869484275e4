//! HTTP handlers for the catalog read API.

pub mod query;
pub use query::*;
