//! Identifier handling: validation of caller-supplied names and PostgreSQL quoting.

use regex::Regex;
use std::sync::OnceLock;

fn identifier_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("static identifier pattern"))
}

/// Plain SQL identifier: letter or underscore, then letters, digits, underscores.
pub fn is_identifier(s: &str) -> bool {
    identifier_re().is_match(s)
}

/// Quote identifier for PostgreSQL (safe: only catalog-resolved names reach this).
pub fn quoted(s: &str) -> String {
    format!("\"{}\"", s.replace('"', "\"\""))
}

/// `"table"."column"`
pub fn qualified_column(table: &str, column: &str) -> String {
    format!("{}.{}", quoted(table), quoted(column))
}
