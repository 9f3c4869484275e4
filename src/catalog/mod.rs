//! Metadata catalog: which tables and columns are exposed, and under what display name.
//! Read-only; the control tables are maintained elsewhere.

mod memory;
mod postgres;
pub mod types;

pub use memory::StaticCatalog;
pub use postgres::PgCatalog;
pub use types::*;

use crate::case::{display_alias, to_snake_case};
use crate::error::AppError;
use async_trait::async_trait;

/// Surrogate key column of the control tables; never exposed as a data column.
pub const SURROGATE_KEY_COLUMN: &str = "pk";

#[async_trait]
pub trait Catalog: Send + Sync {
    /// Visible tables, names normalized to snake_case, ordered by alias.
    /// The normalized name is for display; a stored mixed-case name (e.g. `PanelResults`) is
    /// still looked up by its stored form, so the returned `table_name` is not a query key for it.
    async fn list_visible_tables(&self) -> Result<Vec<TableMeta>, AppError>;

    /// Visible columns of `table` in catalog order. Empty is `NoVisibleColumns`.
    async fn columns(&self, table: &str) -> Result<Vec<ColumnMeta>, AppError>;

    /// Display alias of `table`; `TableNotFound` when the catalog has no row for it.
    async fn table_alias(&self, table: &str) -> Result<String, AppError>;

    /// Whether the catalog lists `column` for `table`, visible or not.
    async fn column_exists(&self, table: &str, column: &str) -> Result<bool, AppError>;

    /// Dictionary entries whose table is present in table metadata.
    async fn data_dictionary(&self) -> Result<Vec<DataDictionary>, AppError>;
}

/// Shared shaping for visible-table listings: snake_case names, alias fallback, sorted by alias.
fn shape_visible_tables<I>(rows: I) -> Vec<TableMeta>
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    let mut out: Vec<TableMeta> = rows
        .into_iter()
        .map(|(name, alias)| {
            let table_name = to_snake_case(&name);
            TableMeta {
                alias: display_alias(&table_name, alias.as_deref()),
                table_name,
            }
        })
        .collect();
    out.sort_by(|a, b| a.alias.cmp(&b.alias));
    out
}

/// Shared shaping for column listings: drop the surrogate key, fill aliases, reject empty.
fn shape_columns<I>(table: &str, rows: I) -> Result<Vec<ColumnMeta>, AppError>
where
    I: IntoIterator<Item = (String, Option<String>)>,
{
    let cols: Vec<ColumnMeta> = rows
        .into_iter()
        .filter(|(name, _)| name != SURROGATE_KEY_COLUMN)
        .map(|(name, alias)| ColumnMeta {
            alias: display_alias(&name, alias.as_deref()),
            name,
        })
        .collect();
    if cols.is_empty() {
        return Err(AppError::NoVisibleColumns(table.to_string()));
    }
    Ok(cols)
}
