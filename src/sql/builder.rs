//! Renders COUNT and paginated SELECT statements from a resolved query.
//! Identifiers come from the catalog only; LIMIT/OFFSET are bound as parameters.

use crate::sql::ident::{qualified_column, quoted};
use crate::sql::join::JoinSpec;

/// SQL text plus its positional BIGINT parameters ($1, $2, ...).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueryBuf {
    pub sql: String,
    pub params: Vec<i64>,
}

impl QueryBuf {
    fn new() -> Self {
        QueryBuf {
            sql: String::new(),
            params: Vec::new(),
        }
    }

    fn push_param(&mut self, v: i64) -> u32 {
        let n = self.params.len() as u32 + 1;
        self.params.push(v);
        n
    }
}

/// One projected column: `"table"."column" AS "output_alias"`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Projection {
    pub table: String,
    pub column: String,
    pub output_alias: String,
}

impl Projection {
    fn to_sql(&self) -> String {
        format!(
            "{} AS {}",
            qualified_column(&self.table, &self.column),
            quoted(&self.output_alias)
        )
    }
}

/// Page window; both values are non-negative by construction. No upper bound is applied here.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Page {
    pub limit: u64,
    pub offset: u64,
}

impl Default for Page {
    fn default() -> Self {
        Page { limit: 10, offset: 0 }
    }
}

/// Fully resolved query for one request: projections, join, page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedQuery {
    pub select_columns: Vec<Projection>,
    pub join: JoinSpec,
    pub page: Page,
}

impl ResolvedQuery {
    /// Output column names in projection order.
    pub fn output_columns(&self) -> Vec<String> {
        self.select_columns.iter().map(|p| p.output_alias.clone()).collect()
    }

    /// `SELECT count(*) FROM ... [WHERE ...]` with no paging.
    pub fn count_statement(&self) -> QueryBuf {
        let mut q = QueryBuf::new();
        q.sql = format!("SELECT count(*){}", self.join.from_where_sql());
        q
    }

    /// `SELECT <projections> FROM ... [WHERE ...] LIMIT $1 OFFSET $2`.
    pub fn select_statement(&self) -> QueryBuf {
        let mut q = QueryBuf::new();
        let cols = self
            .select_columns
            .iter()
            .map(Projection::to_sql)
            .collect::<Vec<_>>()
            .join(", ");
        let limit_ph = q.push_param(bigint(self.page.limit));
        let offset_ph = q.push_param(bigint(self.page.offset));
        q.sql = format!(
            "SELECT {}{} LIMIT ${} OFFSET ${}",
            cols,
            self.join.from_where_sql(),
            limit_ph,
            offset_ph
        );
        q
    }
}

/// BIGINT parameter; values past i64::MAX saturate (no table holds that many rows).
fn bigint(n: u64) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// `SELECT * FROM "table" LIMIT $1`: unfiltered preview of one catalog table.
pub fn select_preview(table: &str, limit: u32) -> QueryBuf {
    let mut q = QueryBuf::new();
    let ph = q.push_param(i64::from(limit));
    q.sql = format!("SELECT * FROM {} LIMIT ${}", quoted(table), ph);
    q
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sql::join::build_join;

    fn projection(table: &str, column: &str, alias: &str) -> Projection {
        Projection {
            table: table.into(),
            column: column.into(),
            output_alias: alias.into(),
        }
    }

    #[test]
    fn count_has_same_from_and_where_but_no_paging() {
        let q = ResolvedQuery {
            select_columns: vec![projection("users", "id", "ID")],
            join: build_join("users", &["orders".to_string()], Some("id")),
            page: Page { limit: 5, offset: 20 },
        };
        let count = q.count_statement();
        assert_eq!(
            count.sql,
            "SELECT count(*) FROM \"users\", \"orders\" WHERE \"users\".\"id\" = \"orders\".\"id\""
        );
        assert!(count.params.is_empty());
    }

    #[test]
    fn select_binds_limit_and_offset() {
        let q = ResolvedQuery {
            select_columns: vec![
                projection("users", "id", "ID"),
                projection("users", "name", "Name"),
            ],
            join: build_join("users", &[], None),
            page: Page::default(),
        };
        let select = q.select_statement();
        assert_eq!(
            select.sql,
            "SELECT \"users\".\"id\" AS \"ID\", \"users\".\"name\" AS \"Name\" FROM \"users\" LIMIT $1 OFFSET $2"
        );
        assert_eq!(select.params, vec![10, 0]);
        assert_eq!(q.output_columns(), vec!["ID", "Name"]);
    }

    #[test]
    fn output_alias_with_quote_is_escaped() {
        let p = projection("t", "c", "Say \"hi\"");
        assert_eq!(p.to_sql(), "\"t\".\"c\" AS \"Say \"\"hi\"\"\"");
    }

    #[test]
    fn page_values_beyond_u32_are_bound_unchanged() {
        let q = ResolvedQuery {
            select_columns: vec![projection("users", "id", "ID")],
            join: build_join("users", &[], None),
            page: Page {
                limit: 5_000_000_000,
                offset: u64::MAX,
            },
        };
        assert_eq!(q.select_statement().params, vec![5_000_000_000, i64::MAX]);
    }

    #[test]
    fn preview_is_a_bounded_star_select() {
        let q = select_preview("users", 10);
        assert_eq!(q.sql, "SELECT * FROM \"users\" LIMIT $1");
        assert_eq!(q.params, vec![10]);
    }
}
