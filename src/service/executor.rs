//! Query execution against a pooled PostgreSQL connection. Each call runs inside its own
//! read-only transaction; any failure rolls it back before the connection returns to the pool.

use crate::error::{AppError, Statement};
use crate::service::compiler::CompiledQuery;
use crate::sql::QueryBuf;
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{PgConnection, PgPool, Postgres};

/// Total matching rows plus the requested page, keyed by output column name.
#[derive(Clone, Debug, PartialEq)]
pub struct QueryOutcome {
    pub count: i64,
    pub rows: Vec<Map<String, Value>>,
}

pub struct QueryExecutor;

impl QueryExecutor {
    /// Count first, then select. Execution failures carry the underlying database message.
    pub async fn execute(
        pool: &PgPool,
        query: &CompiledQuery,
        statement_timeout_ms: Option<u64>,
    ) -> Result<QueryOutcome, AppError> {
        let mut tx = pool.begin().await?;
        match Self::run(&mut tx, query, statement_timeout_ms).await {
            Ok(outcome) => {
                tx.commit().await?;
                Ok(outcome)
            }
            Err(e) => {
                tracing::warn!(error = %e, "query failed, rolling back");
                if let Err(rb) = tx.rollback().await {
                    tracing::error!(error = %rb, "rollback failed");
                }
                Err(e)
            }
        }
    }

    /// `SELECT * ... LIMIT n` of a single table; columns keyed by their database names.
    pub async fn preview(
        pool: &PgPool,
        query: &QueryBuf,
        statement_timeout_ms: Option<u64>,
    ) -> Result<Vec<Map<String, Value>>, AppError> {
        let mut tx = pool.begin().await?;
        match Self::run_preview(&mut tx, query, statement_timeout_ms).await {
            Ok(rows) => {
                tx.commit().await?;
                Ok(rows)
            }
            Err(e) => {
                tracing::warn!(error = %e, "preview failed, rolling back");
                if let Err(rb) = tx.rollback().await {
                    tracing::error!(error = %rb, "rollback failed");
                }
                Err(e)
            }
        }
    }

    async fn run(
        conn: &mut PgConnection,
        query: &CompiledQuery,
        statement_timeout_ms: Option<u64>,
    ) -> Result<QueryOutcome, AppError> {
        Self::prepare(conn, statement_timeout_ms).await?;

        tracing::debug!(sql = %query.count.sql, params = ?query.count.params, "count");
        let mut count_query = sqlx::query_scalar::<Postgres, i64>(&query.count.sql);
        for p in &query.count.params {
            count_query = count_query.bind(*p);
        }
        let count = count_query
            .fetch_one(&mut *conn)
            .await
            .map_err(|source| AppError::Execution {
                statement: Statement::Count,
                source,
            })?;

        let rows = Self::query_many(conn, &query.select, Statement::Select).await?;
        let rows = rows
            .iter()
            .map(|r| row_to_columns(r, &query.columns))
            .collect();
        Ok(QueryOutcome { count, rows })
    }

    async fn run_preview(
        conn: &mut PgConnection,
        query: &QueryBuf,
        statement_timeout_ms: Option<u64>,
    ) -> Result<Vec<Map<String, Value>>, AppError> {
        Self::prepare(conn, statement_timeout_ms).await?;
        let rows = Self::query_many(conn, query, Statement::Select).await?;
        Ok(rows.iter().map(row_to_object).collect())
    }

    /// Read-only transaction, optional per-transaction statement timeout.
    async fn prepare(conn: &mut PgConnection, statement_timeout_ms: Option<u64>) -> Result<(), AppError> {
        sqlx::query("SET TRANSACTION READ ONLY")
            .execute(&mut *conn)
            .await?;
        if let Some(ms) = statement_timeout_ms {
            sqlx::query(&format!("SET LOCAL statement_timeout = {}", ms))
                .execute(&mut *conn)
                .await?;
        }
        Ok(())
    }

    async fn query_many(conn: &mut PgConnection, q: &QueryBuf, statement: Statement) -> Result<Vec<PgRow>, AppError> {
        tracing::debug!(sql = %q.sql, params = ?q.params, "{}", statement);
        let mut query = sqlx::query(&q.sql);
        for p in &q.params {
            query = query.bind(*p);
        }
        query
            .fetch_all(&mut *conn)
            .await
            .map_err(|source| AppError::Execution { statement, source })
    }
}

/// Row as an object keyed by `columns`, by position, preserving their order.
fn row_to_columns(row: &PgRow, columns: &[String]) -> Map<String, Value> {
    let mut map = Map::new();
    for (idx, name) in columns.iter().enumerate() {
        map.insert(name.clone(), cell_to_value(row, idx));
    }
    map
}

/// Row as an object keyed by the database column names.
fn row_to_object(row: &PgRow) -> Map<String, Value> {
    use sqlx::Column;
    use sqlx::Row;
    let mut map = Map::new();
    for (idx, col) in row.columns().iter().enumerate() {
        map.insert(col.name().to_string(), cell_to_value(row, idx));
    }
    map
}

fn cell_to_value(row: &PgRow, idx: usize) -> Value {
    use sqlx::Row;
    if let Ok(Some(n)) = row.try_get::<Option<i16>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i32>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<i64>, _>(idx) {
        return Value::Number(n.into());
    }
    if let Ok(Some(n)) = row.try_get::<Option<f32>, _>(idx) {
        if let Some(n) = serde_json::Number::from_f64(f64::from(n)) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(n)) = row.try_get::<Option<f64>, _>(idx) {
        if let Some(n) = serde_json::Number::from_f64(n) {
            return Value::Number(n);
        }
    }
    if let Ok(Some(b)) = row.try_get::<Option<bool>, _>(idx) {
        return Value::Bool(b);
    }
    if let Ok(Some(u)) = row.try_get::<Option<uuid::Uuid>, _>(idx) {
        return Value::String(u.to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return Value::String(d.to_rfc3339());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return Value::String(d.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return Value::String(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(s)) = row.try_get::<Option<String>, _>(idx) {
        return Value::String(s);
    }
    if let Ok(Some(j)) = row.try_get::<Option<Value>, _>(idx) {
        return j;
    }
    Value::Null
}
