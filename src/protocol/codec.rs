//! Row codec
//!
//! Encoding and decoding between [`UserRecord`] and the gateway's row model.
//!
//! ## Row Layout
//!
//! ```text
//! row key:  base64(id)
//! cells:    base64("{family}:name")  -> base64(name)
//!           base64("{family}:email") -> base64(email)
//!           base64("{family}:age")   -> base64(age)
//! ```
//!
//! Row keys, column names and values are all base64 (standard alphabet,
//! padded) on the wire and are decoded symmetrically on read.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;

use crate::error::{BridgeError, Result};
use super::{CellData, CellSet, RowData, UserRecord, USER_FIELDS};

/// Separator between column family and qualifier
pub const FAMILY_SEPARATOR: char = ':';

// =============================================================================
// Binary-safe Encoding
// =============================================================================

/// Encode raw bytes for the wire
pub fn encode_value(bytes: impl AsRef<[u8]>) -> String {
    STANDARD.encode(bytes)
}

/// Decode a wire value back to bytes
pub fn decode_bytes(encoded: &str) -> Result<Vec<u8>> {
    STANDARD
        .decode(encoded)
        .map_err(|e| BridgeError::Decoding(format!("invalid base64 '{}': {}", encoded, e)))
}

/// Decode a wire value that must hold UTF-8 text
///
/// `what` names the decoded item in error messages.
pub fn decode_text(encoded: &str, what: &str) -> Result<String> {
    let bytes = decode_bytes(encoded)?;
    String::from_utf8(bytes)
        .map_err(|e| BridgeError::Decoding(format!("{} is not valid UTF-8: {}", what, e)))
}

/// Build the qualified column name `family:qualifier`
pub fn qualified_column(family: &str, qualifier: &str) -> String {
    format!("{}{}{}", family, FAMILY_SEPARATOR, qualifier)
}

// =============================================================================
// Row Encoding
// =============================================================================

/// Encode a record into a single row
///
/// Fails with `Encoding` if the id is empty or any user field is absent.
pub fn encode_row(record: &UserRecord, family: &str) -> Result<RowData> {
    if record.id.is_empty() {
        return Err(BridgeError::Encoding("record id must not be empty".to_string()));
    }

    let cells = USER_FIELDS
        .iter()
        .map(|qualifier| -> Result<CellData> {
            let value = record.field(qualifier).ok_or_else(|| {
                BridgeError::Encoding(format!(
                    "record '{}' is missing field '{}'",
                    record.id, qualifier
                ))
            })?;

            Ok(CellData {
                column: encode_value(qualified_column(family, qualifier)),
                timestamp: None,
                value: encode_value(value),
            })
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(RowData {
        key: encode_value(&record.id),
        cells,
    })
}

/// Encode a record into the cell-set body of a put call
pub fn encode_cell_set(record: &UserRecord, family: &str) -> Result<CellSet> {
    Ok(CellSet {
        rows: vec![encode_row(record, family)?],
    })
}

// =============================================================================
// Row Decoding
// =============================================================================

/// Decode a single row into a record
///
/// Columns outside `family` and unknown qualifiers are skipped. Fails with
/// `Decoding` on an empty row, a column without a family separator, or
/// malformed base64/UTF-8.
pub fn decode_row(row: &RowData, family: &str) -> Result<UserRecord> {
    let id = decode_text(&row.key, "row key")?;

    if row.cells.is_empty() {
        return Err(BridgeError::Decoding(format!("row '{}' has no cells", id)));
    }

    let mut record = UserRecord {
        id,
        ..Default::default()
    };

    for cell in &row.cells {
        let column = decode_text(&cell.column, "column name")?;
        let (cell_family, qualifier) = column.split_once(FAMILY_SEPARATOR).ok_or_else(|| {
            BridgeError::Decoding(format!(
                "column '{}' in row '{}' has no family separator",
                column, record.id
            ))
        })?;

        if cell_family != family {
            tracing::trace!("Skipping column {} from foreign family", column);
            continue;
        }

        let value = decode_text(&cell.value, "cell value")?;
        if !record.set_field(qualifier, value) {
            tracing::trace!("Skipping unknown column {}", column);
        }
    }

    Ok(record)
}

/// Decode every row of a cell set, failing on the first bad row
pub fn decode_cell_set(set: &CellSet, family: &str) -> Result<Vec<UserRecord>> {
    set.rows.iter().map(|row| decode_row(row, family)).collect()
}
