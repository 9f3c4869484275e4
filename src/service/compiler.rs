//! Query compiler: resolves every table and column through the catalog, then renders
//! the COUNT and paginated SELECT statements.

use crate::catalog::Catalog;
use crate::error::AppError;
use crate::sql::{JoinSpec, Page, Projection, QueryBuf, ResolvedQuery};
use std::collections::HashSet;

/// Both statements for one request plus the output column names, in projection order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompiledQuery {
    pub count: QueryBuf,
    pub select: QueryBuf,
    pub columns: Vec<String>,
}

pub struct QueryCompiler;

impl QueryCompiler {
    /// Resolve projections for the primary table (bare column aliases) and each additional table
    /// (`"{table alias}::{column alias}"`). Any catalog failure aborts before SQL is produced.
    pub async fn resolve(catalog: &dyn Catalog, join: JoinSpec, page: Page) -> Result<ResolvedQuery, AppError> {
        catalog.table_alias(&join.primary_table).await?;
        let mut select_columns = Vec::new();
        for c in catalog.columns(&join.primary_table).await? {
            select_columns.push(Projection {
                table: join.primary_table.clone(),
                column: c.name,
                output_alias: c.alias,
            });
        }
        for table in &join.additional_tables {
            let table_alias = catalog.table_alias(table).await?;
            for c in catalog.columns(table).await? {
                select_columns.push(Projection {
                    table: table.clone(),
                    column: c.name,
                    output_alias: format!("{}::{}", table_alias, c.alias),
                });
            }
        }
        let mut seen = HashSet::new();
        for p in &select_columns {
            if !seen.insert(p.output_alias.as_str()) {
                return Err(AppError::Validation(format!(
                    "output column '{}' is produced by more than one column ({}.{})",
                    p.output_alias, p.table, p.column
                )));
            }
        }
        Ok(ResolvedQuery {
            select_columns,
            join,
            page,
        })
    }

    pub async fn compile(catalog: &dyn Catalog, join: JoinSpec, page: Page) -> Result<CompiledQuery, AppError> {
        let resolved = Self::resolve(catalog, join, page).await?;
        Ok(CompiledQuery {
            count: resolved.count_statement(),
            select: resolved.select_statement(),
            columns: resolved.output_columns(),
        })
    }
}
