//! In-memory catalog with the same semantics as the PostgreSQL one.

use super::{
    shape_columns, shape_visible_tables, Catalog, ColumnMeta, ColumnMetadata, DataDictionary,
    DataDictionaryEntry, TableMeta, TableMetadata,
};
use crate::case::display_alias;
use crate::error::AppError;
use async_trait::async_trait;

#[derive(Clone, Debug, Default)]
pub struct StaticCatalog {
    pub tables: Vec<TableMetadata>,
    /// Catalog order is insertion order.
    pub columns: Vec<ColumnMetadata>,
    pub dictionary: Vec<DataDictionaryEntry>,
}

impl StaticCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_table(mut self, name: &str, alias: Option<&str>, visible: bool) -> Self {
        self.tables.push(TableMetadata {
            table_name: name.to_string(),
            display_alias: alias.map(str::to_string),
            is_visible: visible,
        });
        self
    }

    pub fn with_column(mut self, table: &str, name: &str, alias: Option<&str>, visible: bool) -> Self {
        self.columns.push(ColumnMetadata {
            owning_table: table.to_string(),
            column_name: name.to_string(),
            display_alias: alias.map(str::to_string),
            is_visible: visible,
        });
        self
    }

    pub fn with_definition(mut self, table: &str, field_label: &str, definition: Option<&str>) -> Self {
        self.dictionary.push(DataDictionaryEntry {
            table_name: table.to_string(),
            field_label: field_label.to_string(),
            definition: definition.map(str::to_string),
        });
        self
    }

    fn table(&self, name: &str) -> Option<&TableMetadata> {
        self.tables.iter().find(|t| t.table_name == name)
    }
}

#[async_trait]
impl Catalog for StaticCatalog {
    async fn list_visible_tables(&self) -> Result<Vec<TableMeta>, AppError> {
        Ok(shape_visible_tables(
            self.tables
                .iter()
                .filter(|t| t.is_visible)
                .map(|t| (t.table_name.clone(), t.display_alias.clone())),
        ))
    }

    async fn columns(&self, table: &str) -> Result<Vec<ColumnMeta>, AppError> {
        let known = self.table(table).is_some();
        shape_columns(
            table,
            self.columns
                .iter()
                .filter(|c| known && c.is_visible && c.owning_table == table)
                .map(|c| (c.column_name.clone(), c.display_alias.clone())),
        )
    }

    async fn table_alias(&self, table: &str) -> Result<String, AppError> {
        self.table(table)
            .map(|t| display_alias(table, t.display_alias.as_deref()))
            .ok_or_else(|| AppError::TableNotFound(table.to_string()))
    }

    async fn column_exists(&self, table: &str, column: &str) -> Result<bool, AppError> {
        Ok(self.table(table).is_some()
            && self
                .columns
                .iter()
                .any(|c| c.owning_table == table && c.column_name == column))
    }

    async fn data_dictionary(&self) -> Result<Vec<DataDictionary>, AppError> {
        let mut out: Vec<DataDictionary> = self
            .dictionary
            .iter()
            .filter_map(|d| {
                let t = self.table(&d.table_name)?;
                Some(DataDictionary {
                    table_name: d.table_name.clone(),
                    alias: display_alias(&d.table_name, t.display_alias.as_deref()),
                    field_label: d.field_label.clone(),
                    definition: d.definition.clone(),
                })
            })
            .collect();
        out.sort_by(|a, b| (&a.table_name, &a.field_label).cmp(&(&b.table_name, &b.field_label)));
        Ok(out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> StaticCatalog {
        StaticCatalog::new()
            .with_table("users", Some("Users"), true)
            .with_table("HmlId", None, true)
            .with_table("secrets", Some("Secrets"), false)
            .with_table("bare", None, true)
            .with_column("users", "pk", None, true)
            .with_column("users", "id", Some("ID"), true)
            .with_column("users", "ssn", Some("SSN"), false)
            .with_column("users", "name", None, true)
            .with_column("secrets", "token", None, true)
            .with_column("bare", "hidden", None, false)
    }

    #[tokio::test]
    async fn invisible_tables_are_never_listed() {
        let tables = catalog().list_visible_tables().await.unwrap();
        assert!(tables.iter().all(|t| t.table_name != "secrets"));
        assert_eq!(tables.len(), 3);
    }

    #[tokio::test]
    async fn listing_normalizes_names_and_sorts_by_alias() {
        let tables = catalog().list_visible_tables().await.unwrap();
        let pairs: Vec<(&str, &str)> = tables
            .iter()
            .map(|t| (t.table_name.as_str(), t.alias.as_str()))
            .collect();
        assert_eq!(pairs, vec![("bare", "Bare"), ("hml_id", "Hml Id"), ("users", "Users")]);
    }

    #[tokio::test]
    async fn columns_are_visible_only_in_catalog_order_with_alias_fallback() {
        let cols = catalog().columns("users").await.unwrap();
        assert_eq!(
            cols,
            vec![
                ColumnMeta { name: "id".into(), alias: "ID".into() },
                ColumnMeta { name: "name".into(), alias: "Name".into() },
            ]
        );
    }

    #[tokio::test]
    async fn table_without_visible_columns_is_a_catalog_error() {
        let err = catalog().columns("bare").await.unwrap_err();
        assert!(matches!(err, AppError::NoVisibleColumns(t) if t == "bare"));
        let err = catalog().columns("missing").await.unwrap_err();
        assert!(matches!(err, AppError::NoVisibleColumns(_)));
    }

    #[tokio::test]
    async fn table_alias_falls_back_to_title_case() {
        let c = catalog().with_table("order_items", Some(""), true);
        assert_eq!(c.table_alias("users").await.unwrap(), "Users");
        assert_eq!(c.table_alias("order_items").await.unwrap(), "Order Items");
        assert!(matches!(
            c.table_alias("nope").await.unwrap_err(),
            AppError::TableNotFound(t) if t == "nope"
        ));
    }

    #[tokio::test]
    async fn listed_name_of_mixed_case_table_is_display_only() {
        let c = catalog();
        let listed = c.list_visible_tables().await.unwrap();
        assert!(listed.iter().any(|t| t.table_name == "hml_id"));
        assert!(matches!(c.table_alias("hml_id").await.unwrap_err(), AppError::TableNotFound(_)));
        assert_eq!(c.table_alias("HmlId").await.unwrap(), "Hmlid");
    }

    #[tokio::test]
    async fn column_exists_ignores_visibility() {
        let c = catalog();
        assert!(c.column_exists("users", "ssn").await.unwrap());
        assert!(c.column_exists("users", "id").await.unwrap());
        assert!(!c.column_exists("users", "email").await.unwrap());
        assert!(!c.column_exists("nope", "id").await.unwrap());
    }

    #[tokio::test]
    async fn dictionary_is_inner_joined_on_table_metadata() {
        let c = catalog()
            .with_definition("users", "Name", Some("Full name"))
            .with_definition("users", "ID", None)
            .with_definition("ghost", "Thing", Some("orphan"));
        let dict = c.data_dictionary().await.unwrap();
        assert_eq!(dict.len(), 2);
        assert!(dict.iter().all(|d| d.table_name == "users" && d.alias == "Users"));
        assert_eq!(dict[0].field_label, "ID");
        assert_eq!(dict[1].definition.as_deref(), Some("Full name"));
    }
}
