//! Protocol Module
//!
//! Maps flat user records onto the storage gateway's row/cell model.
//!
//! ## Wire Format (JSON CellSet)
//!
//! ```text
//! {
//!   "Row": [{
//!     "key":  <base64 row key>,
//!     "Cell": [{ "column": <base64 family:qualifier>, "$": <base64 value> }, ...]
//!   }]
//! }
//! ```
//!
//! ### Mapping
//! - row key   <-> `UserRecord::id`
//! - `info:name`, `info:email`, `info:age` <-> the matching record fields
//! - any other column is ignored on read

mod model;
mod record;
mod codec;

pub use model::{CellData, CellSet, ColumnSchema, RowData, ScannerSpec, TableSchema};
pub use record::{
    check_row_key, FieldValue, UserPayload, UserRecord, RESERVED_ROW_KEYS, USER_FIELDS,
};
pub use codec::{
    decode_bytes, decode_cell_set, decode_row, decode_text, encode_cell_set, encode_row,
    encode_value, qualified_column, FAMILY_SEPARATOR,
};
