//! User record definitions
//!
//! The flat record exposed to clients, and the loosely typed payloads it is
//! built from.

use serde::{Deserialize, Serialize};

use crate::error::{BridgeError, Result};

/// Qualifiers stored for every user, in write order
pub const USER_FIELDS: [&str; 3] = ["name", "email", "age"];

/// Path segments the gateway resolves to something other than a row
///
/// `.` and `..` are removed by URL normalization; the rest name table-level
/// endpoints (`/{table}/scanner`, `/{table}/schema`, ...).
pub const RESERVED_ROW_KEYS: [&str; 7] =
    [".", "..", "scanner", "schema", "regions", "exists", "multiget"];

/// Check that `id` can be used as a row key in a single-row gateway path
///
/// Fails with `InvalidArgument` for an empty id or one of
/// [`RESERVED_ROW_KEYS`].
pub fn check_row_key(id: &str) -> Result<()> {
    if id.is_empty() {
        return Err(BridgeError::InvalidArgument("field 'id' must not be empty".to_string()));
    }
    if RESERVED_ROW_KEYS.contains(&id) {
        return Err(BridgeError::InvalidArgument(format!(
            "id '{}' is reserved by the storage gateway",
            id
        )));
    }
    Ok(())
}

/// A flat user record
///
/// `id` doubles as the storage row key. The other fields are optional so a
/// row written by another tool with only some columns still decodes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
    pub id: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
}

impl UserRecord {
    /// Create a fully populated record
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        email: impl Into<String>,
        age: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: Some(name.into()),
            email: Some(email.into()),
            age: Some(age.into()),
        }
    }

    /// Look up a field by qualifier
    pub fn field(&self, qualifier: &str) -> Option<&str> {
        match qualifier {
            "name" => self.name.as_deref(),
            "email" => self.email.as_deref(),
            "age" => self.age.as_deref(),
            _ => None,
        }
    }

    /// Assign a field by qualifier
    ///
    /// Returns false for qualifiers this record does not know.
    pub fn set_field(&mut self, qualifier: &str, value: String) -> bool {
        let slot = match qualifier {
            "name" => &mut self.name,
            "email" => &mut self.email,
            "age" => &mut self.age,
            _ => return false,
        };
        *slot = Some(value);
        true
    }
}

/// A scalar JSON field that is stored in its string form
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    Text(String),
    Number(serde_json::Number),
    Bool(bool),
}

impl FieldValue {
    pub fn into_string(self) -> String {
        match self {
            FieldValue::Text(s) => s,
            FieldValue::Number(n) => n.to_string(),
            FieldValue::Bool(b) => b.to_string(),
        }
    }
}

/// Body of a create or update request
///
/// Every field is optional at parse time; presence is checked by
/// [`UserPayload::into_record`] so a missing field becomes a clear
/// `InvalidArgument` rather than a generic body rejection.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserPayload {
    #[serde(default)]
    pub id: Option<FieldValue>,

    #[serde(default)]
    pub name: Option<FieldValue>,

    #[serde(default)]
    pub email: Option<FieldValue>,

    #[serde(default)]
    pub age: Option<FieldValue>,
}

impl UserPayload {
    /// Build a record, taking the id from the body
    pub fn into_record(self) -> Result<UserRecord> {
        let id = required("id", self.id.clone())?;
        self.into_record_with_id(id)
    }

    /// Build a record for an existing id, ignoring any id in the body
    pub fn into_record_with_id(self, id: impl Into<String>) -> Result<UserRecord> {
        let id = id.into();
        check_row_key(&id)?;

        Ok(UserRecord {
            id,
            name: Some(required("name", self.name)?),
            email: Some(required("email", self.email)?),
            age: Some(required("age", self.age)?),
        })
    }
}

fn required(field: &str, value: Option<FieldValue>) -> Result<String> {
    value
        .map(FieldValue::into_string)
        .ok_or_else(|| BridgeError::InvalidArgument(format!("missing field '{}'", field)))
}
