//! Catalog backed by the three PostgreSQL control tables.

use super::{shape_columns, shape_visible_tables, Catalog, DataDictionary, SURROGATE_KEY_COLUMN};
use crate::case::display_alias;
use crate::config::CatalogTables;
use crate::error::AppError;
use crate::sql::quoted;
use async_trait::async_trait;
use sqlx::PgPool;

#[derive(Clone)]
pub struct PgCatalog {
    pool: PgPool,
    tables: CatalogTables,
}

impl PgCatalog {
    pub fn new(pool: PgPool, tables: CatalogTables) -> Self {
        PgCatalog { pool, tables }
    }

    fn table_meta(&self) -> String {
        quoted(&self.tables.table_metadata)
    }

    fn column_meta(&self) -> String {
        quoted(&self.tables.column_metadata)
    }

    fn dictionary(&self) -> String {
        quoted(&self.tables.data_dictionary)
    }
}

#[async_trait]
impl Catalog for PgCatalog {
    async fn list_visible_tables(&self) -> Result<Vec<super::TableMeta>, AppError> {
        let sql = format!(
            "SELECT table_name, table_name_alias FROM {} WHERE is_visible = true ORDER BY table_name_alias",
            self.table_meta()
        );
        tracing::debug!(sql = %sql, "catalog query");
        let rows = sqlx::query_as::<_, (String, Option<String>)>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(shape_visible_tables(rows))
    }

    async fn columns(&self, table: &str) -> Result<Vec<super::ColumnMeta>, AppError> {
        let sql = format!(
            "SELECT c.column_name, c.column_name_alias \
             FROM {} c JOIN {} t ON c.table_id = t.id \
             WHERE c.is_visible = true AND c.column_name <> $2 AND t.table_name = $1 \
             ORDER BY c.id",
            self.column_meta(),
            self.table_meta()
        );
        tracing::debug!(sql = %sql, table, "catalog query");
        let rows = sqlx::query_as::<_, (String, Option<String>)>(&sql)
            .bind(table)
            .bind(SURROGATE_KEY_COLUMN)
            .fetch_all(&self.pool)
            .await?;
        shape_columns(table, rows)
    }

    async fn table_alias(&self, table: &str) -> Result<String, AppError> {
        let sql = format!(
            "SELECT table_name_alias FROM {} WHERE table_name = $1 LIMIT 1",
            self.table_meta()
        );
        tracing::debug!(sql = %sql, table, "catalog query");
        let row = sqlx::query_as::<_, (Option<String>,)>(&sql)
            .bind(table)
            .fetch_optional(&self.pool)
            .await?;
        match row {
            Some((alias,)) => Ok(display_alias(table, alias.as_deref())),
            None => Err(AppError::TableNotFound(table.to_string())),
        }
    }

    async fn column_exists(&self, table: &str, column: &str) -> Result<bool, AppError> {
        let sql = format!(
            "SELECT EXISTS (SELECT 1 FROM {} c JOIN {} t ON c.table_id = t.id \
             WHERE t.table_name = $1 AND c.column_name = $2)",
            self.column_meta(),
            self.table_meta()
        );
        tracing::debug!(sql = %sql, table, column, "catalog query");
        let exists = sqlx::query_scalar::<_, bool>(&sql)
            .bind(table)
            .bind(column)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn data_dictionary(&self) -> Result<Vec<DataDictionary>, AppError> {
        let sql = format!(
            "SELECT d.table_name, m.table_name_alias, d.field_label, d.definition \
             FROM {} d JOIN {} m ON d.table_name = m.table_name \
             ORDER BY d.table_name, d.field_label",
            self.dictionary(),
            self.table_meta()
        );
        tracing::debug!(sql = %sql, "catalog query");
        let rows = sqlx::query_as::<_, (String, Option<String>, String, Option<String>)>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows
            .into_iter()
            .map(|(table_name, alias, field_label, definition)| DataDictionary {
                alias: display_alias(&table_name, alias.as_deref()),
                table_name,
                field_label,
                definition,
            })
            .collect())
    }
}
