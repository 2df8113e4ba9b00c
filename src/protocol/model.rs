//! Gateway wire model
//!
//! JSON shapes spoken by the storage gateway. Every `key`, `column` and `$`
//! field carries base64 text, never raw bytes.

use serde::{Deserialize, Serialize};

/// A set of rows, as sent on put and returned by get/scan
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellSet {
    #[serde(rename = "Row", default)]
    pub rows: Vec<RowData>,
}

/// One row: encoded row key plus its cells
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RowData {
    pub key: String,

    #[serde(rename = "Cell", default)]
    pub cells: Vec<CellData>,
}

/// One cell: encoded `family:qualifier` column and encoded value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CellData {
    pub column: String,

    /// Write timestamp, only present on cells read back from the gateway
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<u64>,

    #[serde(rename = "$")]
    pub value: String,
}

/// Body of a schema-creation call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSchema {
    pub name: String,

    #[serde(rename = "ColumnSchema")]
    pub column_families: Vec<ColumnSchema>,
}

/// A column family declaration inside [`TableSchema`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnSchema {
    pub name: String,
}

impl TableSchema {
    /// Schema for a table with a single column family
    pub fn single_family(table: &str, family: &str) -> Self {
        Self {
            name: table.to_string(),
            column_families: vec![ColumnSchema {
                name: family.to_string(),
            }],
        }
    }
}

/// Body of a scanner-open call
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannerSpec {
    pub batch: u32,
}
