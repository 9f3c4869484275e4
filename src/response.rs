//! Response bodies for the read API.

use crate::catalog::DataDictionary;
use serde::Serialize;
use serde_json::{Map, Value};

/// Field names of each data dictionary entry, for clients that render a header row.
pub const DATA_DICTIONARY_COLUMNS: [&str; 4] = ["table_name", "alias", "field_label", "definition"];

/// get_data body: total matching rows, the requested page, and output column order.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataResult {
    pub count: i64,
    pub results: Vec<Map<String, Value>>,
    pub columns: Vec<String>,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct DataDictionaryResult {
    pub data_dictionary: Vec<DataDictionary>,
    pub columns: Vec<&'static str>,
}

impl DataDictionaryResult {
    pub fn new(data_dictionary: Vec<DataDictionary>) -> Self {
        DataDictionaryResult {
            data_dictionary,
            columns: DATA_DICTIONARY_COLUMNS.to_vec(),
        }
    }
}
