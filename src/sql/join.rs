//! FROM list and equality join predicate for a primary table plus additional tables.

use crate::sql::ident::{qualified_column, quoted};

/// Request-scoped join description. Built fresh per request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct JoinSpec {
    pub primary_table: String,
    pub additional_tables: Vec<String>,
    /// None when the caller supplied no (or an empty) join column.
    pub join_column: Option<String>,
}

/// Build a join over `primary_table` and `additional_tables` (order preserved, primary first).
/// An empty `join_column` is the same as none: with additional tables present that is an
/// implicit cross join, which callers are expected to guard against.
pub fn build_join(primary_table: &str, additional_tables: &[String], join_column: Option<&str>) -> JoinSpec {
    JoinSpec {
        primary_table: primary_table.to_string(),
        additional_tables: additional_tables.to_vec(),
        join_column: join_column
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .map(str::to_string),
    }
}

/// Split a comma-delimited table list; tokens are trimmed and empty ones dropped.
pub fn parse_table_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .map(str::to_string)
        .collect()
}

impl JoinSpec {
    pub fn from_tables(&self) -> Vec<&str> {
        std::iter::once(self.primary_table.as_str())
            .chain(self.additional_tables.iter().map(String::as_str))
            .collect()
    }

    /// True when additional tables are listed with nothing to join them on.
    pub fn is_cross_join(&self) -> bool {
        !self.additional_tables.is_empty() && self.join_column.is_none()
    }

    /// `"primary"."col" = "t1"."col" AND "primary"."col" = "t2"."col" ...`, or None.
    pub fn where_predicate(&self) -> Option<String> {
        let col = self.join_column.as_deref()?;
        if self.additional_tables.is_empty() {
            return None;
        }
        let left = qualified_column(&self.primary_table, col);
        let parts: Vec<String> = self
            .additional_tables
            .iter()
            .map(|t| format!("{} = {}", left, qualified_column(t, col)))
            .collect();
        Some(parts.join(" AND "))
    }

    /// ` FROM "a", "b"` plus ` WHERE ...` when there is a predicate.
    pub fn from_where_sql(&self) -> String {
        let from = self
            .from_tables()
            .into_iter()
            .map(quoted)
            .collect::<Vec<_>>()
            .join(", ");
        match self.where_predicate() {
            Some(pred) => format!(" FROM {} WHERE {}", from, pred),
            None => format!(" FROM {}", from),
        }
    }
}
