//! Runtime settings from environment (`.env` honored via dotenvy).

use crate::error::ConfigError;
use crate::sql::is_identifier;

pub const DEFAULT_DATABASE_URL: &str = "postgres://localhost/pandb";
pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";
pub const DEFAULT_API_PREFIX: &str = "/api/v1";

/// Names of the three control tables the catalog reads.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CatalogTables {
    pub table_metadata: String,
    pub column_metadata: String,
    pub data_dictionary: String,
}

impl Default for CatalogTables {
    fn default() -> Self {
        CatalogTables {
            table_metadata: "api_pandbtablemetadata".into(),
            column_metadata: "api_pandbcolumnmetadata".into(),
            data_dictionary: "info_data_dictionary".into(),
        }
    }
}

/// Knobs for query compilation and execution.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QuerySettings {
    /// LIMIT applied to get_data when the caller omits one.
    pub default_limit: u32,
    /// Row count for the single-table preview endpoint.
    pub preview_limit: u32,
    /// Permit additional tables without a join column (cartesian product).
    pub allow_cross_join: bool,
    /// `SET LOCAL statement_timeout` for each execution, when set.
    pub statement_timeout_ms: Option<u64>,
}

impl Default for QuerySettings {
    fn default() -> Self {
        QuerySettings {
            default_limit: 10,
            preview_limit: 10,
            allow_cross_join: false,
            statement_timeout_ms: None,
        }
    }
}

#[derive(Clone, Debug)]
pub struct Settings {
    pub database_url: String,
    pub bind_addr: String,
    pub api_prefix: String,
    pub max_connections: u32,
    pub catalog: CatalogTables,
    pub query: QuerySettings,
}

impl Settings {
    /// Load `.env` (if present) then read process environment.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Parse settings from any key lookup. Unset or blank keys take their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = CatalogTables::default();
        let query_defaults = QuerySettings::default();

        let catalog = CatalogTables {
            table_metadata: identifier(
                "CATALOG_TABLE_METADATA",
                get("CATALOG_TABLE_METADATA").unwrap_or(defaults.table_metadata),
            )?,
            column_metadata: identifier(
                "CATALOG_COLUMN_METADATA",
                get("CATALOG_COLUMN_METADATA").unwrap_or(defaults.column_metadata),
            )?,
            data_dictionary: identifier(
                "CATALOG_DATA_DICTIONARY",
                get("CATALOG_DATA_DICTIONARY").unwrap_or(defaults.data_dictionary),
            )?,
        };

        let query = QuerySettings {
            default_limit: parse_or("QUERY_DEFAULT_LIMIT", get("QUERY_DEFAULT_LIMIT"), query_defaults.default_limit)?,
            preview_limit: parse_or("QUERY_PREVIEW_LIMIT", get("QUERY_PREVIEW_LIMIT"), query_defaults.preview_limit)?,
            allow_cross_join: parse_bool("QUERY_ALLOW_CROSS_JOIN", get("QUERY_ALLOW_CROSS_JOIN"), query_defaults.allow_cross_join)?,
            statement_timeout_ms: match get("QUERY_STATEMENT_TIMEOUT_MS") {
                Some(v) => Some(parse("QUERY_STATEMENT_TIMEOUT_MS", v)?),
                None => None,
            },
        };

        Ok(Settings {
            database_url: get("DATABASE_URL").unwrap_or_else(|| DEFAULT_DATABASE_URL.into()),
            bind_addr: get("BIND_ADDR").unwrap_or_else(|| DEFAULT_BIND_ADDR.into()),
            api_prefix: get("API_PREFIX").unwrap_or_else(|| DEFAULT_API_PREFIX.into()),
            max_connections: parse_or("DB_MAX_CONNECTIONS", get("DB_MAX_CONNECTIONS"), 5)?,
            catalog,
            query,
        })
    }
}

fn identifier(key: &'static str, value: String) -> Result<String, ConfigError> {
    if is_identifier(&value) {
        Ok(value)
    } else {
        Err(ConfigError::InvalidIdentifier { key, value })
    }
}

fn parse<T: std::str::FromStr>(key: &'static str, value: String) -> Result<T, ConfigError> {
    value.parse().map_err(|_| ConfigError::InvalidValue { key, value })
}

fn parse_or<T: std::str::FromStr>(key: &'static str, value: Option<String>, default: T) -> Result<T, ConfigError> {
    value.map(|v| parse(key, v)).unwrap_or(Ok(default))
}

fn parse_bool(key: &'static str, value: Option<String>, default: bool) -> Result<bool, ConfigError> {
    let Some(value) = value else { return Ok(default) };
    match value.to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(ConfigError::InvalidValue { key, value }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn settings(pairs: &[(&str, &str)]) -> Result<Settings, ConfigError> {
        let map: HashMap<String, String> = pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        Settings::from_lookup(|k| map.get(k).cloned())
    }

    #[test]
    fn defaults_when_nothing_is_set() {
        let s = settings(&[]).unwrap();
        assert_eq!(s.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(s.api_prefix, "/api/v1");
        assert_eq!(s.max_connections, 5);
        assert_eq!(s.catalog, CatalogTables::default());
        assert_eq!(s.query, QuerySettings::default());
        assert_eq!(s.query.default_limit, 10);
        assert!(!s.query.allow_cross_join);
    }

    #[test]
    fn reads_overrides() {
        let s = settings(&[
            ("DATABASE_URL", "postgres://db/other"),
            ("DB_MAX_CONNECTIONS", "12"),
            ("CATALOG_TABLE_METADATA", "table_meta"),
            ("QUERY_DEFAULT_LIMIT", "25"),
            ("QUERY_ALLOW_CROSS_JOIN", "TRUE"),
            ("QUERY_STATEMENT_TIMEOUT_MS", "1500"),
        ])
        .unwrap();
        assert_eq!(s.database_url, "postgres://db/other");
        assert_eq!(s.max_connections, 12);
        assert_eq!(s.catalog.table_metadata, "table_meta");
        assert_eq!(s.catalog.column_metadata, "api_pandbcolumnmetadata");
        assert_eq!(s.query.default_limit, 25);
        assert!(s.query.allow_cross_join);
        assert_eq!(s.query.statement_timeout_ms, Some(1500));
    }

    #[test]
    fn blank_values_fall_back_to_defaults() {
        let s = settings(&[("QUERY_DEFAULT_LIMIT", "  "), ("BIND_ADDR", "")]).unwrap();
        assert_eq!(s.query.default_limit, 10);
        assert_eq!(s.bind_addr, DEFAULT_BIND_ADDR);
    }

    #[test]
    fn rejects_bad_catalog_table_names() {
        let err = settings(&[("CATALOG_DATA_DICTIONARY", "dict; drop table x")]).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidIdentifier { key: "CATALOG_DATA_DICTIONARY", .. }));
    }

    #[test]
    fn rejects_unparsable_numbers_and_flags() {
        assert!(matches!(
            settings(&[("QUERY_DEFAULT_LIMIT", "-1")]).unwrap_err(),
            ConfigError::InvalidValue { key: "QUERY_DEFAULT_LIMIT", .. }
        ));
        assert!(matches!(
            settings(&[("QUERY_ALLOW_CROSS_JOIN", "maybe")]).unwrap_err(),
            ConfigError::InvalidValue { key: "QUERY_ALLOW_CROSS_JOIN", .. }
        ));
    }
}
