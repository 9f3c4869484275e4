//! Compile and execute catalog-driven read queries.

mod compiler;
mod executor;
mod query;
pub use compiler::{CompiledQuery, QueryCompiler};
pub use executor::{QueryExecutor, QueryOutcome};
pub use query::{DataRequest, QueryService};
