//! Request-level orchestration: validate caller identifiers, compile through the catalog, execute.

use crate::catalog::{Catalog, TableMeta};
use crate::config::QuerySettings;
use crate::error::AppError;
use crate::response::{DataDictionaryResult, DataResult};
use crate::service::compiler::{CompiledQuery, QueryCompiler};
use crate::service::executor::QueryExecutor;
use crate::sql::{build_join, is_identifier, parse_table_list, select_preview, JoinSpec, Page};
use serde::Deserialize;
use serde_json::{Map, Value};
use sqlx::PgPool;
use std::collections::HashSet;

/// Query parameters of get_data.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct DataRequest {
    pub primary_table: String,
    #[serde(default)]
    pub additional_tables: Option<String>,
    #[serde(default)]
    pub join_col: Option<String>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

pub struct QueryService;

impl QueryService {
    pub async fn list_tables(catalog: &dyn Catalog) -> Result<Vec<TableMeta>, AppError> {
        catalog.list_visible_tables().await
    }

    pub async fn data_dictionary(catalog: &dyn Catalog) -> Result<DataDictionaryResult, AppError> {
        Ok(DataDictionaryResult::new(catalog.data_dictionary().await?))
    }

    /// Validate the request and compile both statements. Issues no data queries.
    pub async fn plan(
        catalog: &dyn Catalog,
        settings: &QuerySettings,
        req: &DataRequest,
    ) -> Result<CompiledQuery, AppError> {
        let join = Self::join_spec(settings, req)?;
        let page = Page {
            limit: req.limit.unwrap_or_else(|| u64::from(settings.default_limit)),
            offset: req.offset.unwrap_or(0),
        };
        let join_column = join.join_column.clone();
        let from_tables: Vec<String> = join.from_tables().into_iter().map(str::to_string).collect();
        let has_additional = from_tables.len() > 1;

        let compiled = QueryCompiler::compile(catalog, join, page).await?;

        if let (Some(col), true) = (join_column, has_additional) {
            for table in &from_tables {
                if !catalog.column_exists(table, &col).await? {
                    return Err(AppError::Validation(format!(
                        "join column '{}' is not in the catalog for table '{}'",
                        col, table
                    )));
                }
            }
        }
        Ok(compiled)
    }

    pub async fn get_data(
        pool: &PgPool,
        catalog: &dyn Catalog,
        settings: &QuerySettings,
        req: &DataRequest,
    ) -> Result<DataResult, AppError> {
        let compiled = Self::plan(catalog, settings, req).await?;
        let outcome = QueryExecutor::execute(pool, &compiled, settings.statement_timeout_ms).await?;
        Ok(DataResult {
            count: outcome.count,
            results: outcome.rows,
            columns: compiled.columns,
        })
    }

    /// Unfiltered first rows of one catalog-known table.
    pub async fn preview(
        pool: &PgPool,
        catalog: &dyn Catalog,
        settings: &QuerySettings,
        table: &str,
    ) -> Result<Vec<Map<String, Value>>, AppError> {
        require_identifier("table_name", table)?;
        catalog.table_alias(table).await?;
        let q = select_preview(table, settings.preview_limit);
        QueryExecutor::preview(pool, &q, settings.statement_timeout_ms).await
    }

    fn join_spec(settings: &QuerySettings, req: &DataRequest) -> Result<JoinSpec, AppError> {
        let primary = req.primary_table.trim();
        require_identifier("primary_table", primary)?;
        let additional = parse_table_list(req.additional_tables.as_deref().unwrap_or(""));
        for t in &additional {
            require_identifier("additional_tables", t)?;
        }
        let mut seen = HashSet::new();
        for t in std::iter::once(primary).chain(additional.iter().map(String::as_str)) {
            if !seen.insert(t) {
                return Err(AppError::Validation(format!("table '{}' is listed more than once", t)));
            }
        }
        let join = build_join(primary, &additional, req.join_col.as_deref());
        if let Some(col) = &join.join_column {
            require_identifier("join_col", col)?;
        }
        if join.is_cross_join() && !settings.allow_cross_join {
            return Err(AppError::Validation(
                "join_col is required when additional_tables is given".into(),
            ));
        }
        Ok(join)
    }
}

fn require_identifier(param: &str, value: &str) -> Result<(), AppError> {
    if is_identifier(value) {
        Ok(())
    } else {
        Err(AppError::Validation(format!("{}: '{}' is not a valid identifier", param, value)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StaticCatalog;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with_table("users", Some("Users"), true)
            .with_table("orders", Some("Orders"), true)
            .with_table("payments", None, true)
            .with_column("users", "id", Some("ID"), true)
            .with_column("users", "account_id", None, false)
            .with_column("users", "name", None, true)
            .with_column("orders", "id", Some("ID"), true)
            .with_column("orders", "account_id", None, true)
            .with_column("payments", "amount", None, true)
    }

    fn request(primary: &str, additional: &str, join: &str) -> DataRequest {
        DataRequest {
            primary_table: primary.into(),
            additional_tables: Some(additional.into()),
            join_col: Some(join.into()),
            limit: None,
            offset: None,
        }
    }

    #[tokio::test]
    async fn plan_applies_default_page() {
        let q = QueryService::plan(&catalog(), &QuerySettings::default(), &request("users", "", ""))
            .await
            .unwrap();
        assert_eq!(q.columns, vec!["ID", "Name"]);
        assert_eq!(q.select.params, vec![10, 0]);
        assert_eq!(q.count.sql, "SELECT count(*) FROM \"users\"");
    }

    #[tokio::test]
    async fn plan_joins_on_hidden_but_cataloged_column() {
        let mut req = request("users", " orders ", "account_id");
        req.limit = Some(3);
        req.offset = Some(6);
        let q = QueryService::plan(&catalog(), &QuerySettings::default(), &req).await.unwrap();
        assert_eq!(q.columns, vec!["ID", "Name", "Orders::ID", "Orders::Account Id"]);
        assert!(q
            .select
            .sql
            .contains("WHERE \"users\".\"account_id\" = \"orders\".\"account_id\""));
        assert_eq!(q.select.params, vec![3, 6]);
    }

    #[tokio::test]
    async fn large_limit_is_not_capped() {
        let mut req = request("users", "", "");
        req.limit = Some(5_000_000_000);
        let q = QueryService::plan(&catalog(), &QuerySettings::default(), &req).await.unwrap();
        assert_eq!(q.select.params, vec![5_000_000_000, 0]);
    }

    #[tokio::test]
    async fn cross_join_is_rejected_by_default() {
        let err = QueryService::plan(&catalog(), &QuerySettings::default(), &request("users", "orders", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::Validation(_)));
    }

    #[tokio::test]
    async fn cross_join_allowed_when_configured() {
        let settings = QuerySettings {
            allow_cross_join: true,
            ..QuerySettings::default()
        };
        let q = QueryService::plan(&catalog(), &settings, &request("users", "orders", ""))
            .await
            .unwrap();
        assert_eq!(q.count.sql, "SELECT count(*) FROM \"users\", \"orders\"");
    }

    #[tokio::test]
    async fn join_column_missing_from_a_table_is_rejected() {
        let err = QueryService::plan(
            &catalog(),
            &QuerySettings::default(),
            &request("users", "orders,payments", "account_id"),
        )
        .await
        .unwrap_err();
        match err {
            AppError::Validation(msg) => assert!(msg.contains("payments")),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn malformed_identifiers_never_reach_the_catalog() {
        for req in [
            request("users; drop table users", "", ""),
            request("users", "orders--", "id"),
            request("users", "orders", "id = 1 or 1"),
        ] {
            let err = QueryService::plan(&catalog(), &QuerySettings::default(), &req)
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)), "{req:?}");
        }
    }

    #[tokio::test]
    async fn repeated_tables_are_rejected() {
        for (primary, additional) in [("users", "users"), ("users", "orders, orders")] {
            let err = QueryService::plan(&catalog(), &QuerySettings::default(), &request(primary, additional, "id"))
                .await
                .unwrap_err();
            assert!(matches!(err, AppError::Validation(_)));
        }
    }

    #[tokio::test]
    async fn unknown_table_is_not_found() {
        let err = QueryService::plan(&catalog(), &QuerySettings::default(), &request("ghost", "", ""))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::TableNotFound(_)));
    }
}
