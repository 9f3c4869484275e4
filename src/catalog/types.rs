//! Catalog rows (as stored) and the display shapes handed to callers.

use serde::Serialize;

/// Row of the table-metadata control table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TableMetadata {
    pub table_name: String,
    pub display_alias: Option<String>,
    pub is_visible: bool,
}

/// Row of the column-metadata control table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColumnMetadata {
    pub owning_table: String,
    pub column_name: String,
    pub display_alias: Option<String>,
    pub is_visible: bool,
}

/// Row of the data dictionary table. Informational only.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DataDictionaryEntry {
    pub table_name: String,
    pub field_label: String,
    pub definition: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct TableMeta {
    pub table_name: String,
    pub alias: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct ColumnMeta {
    pub name: String,
    pub alias: String,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DataDictionary {
    pub table_name: String,
    pub alias: String,
    pub field_label: String,
    pub definition: Option<String>,
}
