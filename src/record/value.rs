//! Record field access and normalization
//!
//! Records are JSON objects. A field may hold a scalar or an array of
//! scalars; both forms normalize to a key sequence at indexing time so
//! membership queries have a single code path.

use serde_json::Value;

use crate::dimension::DimensionKey;

/// Name of the field that identifies a record within the dataset.
pub const IDENTITY_FIELD: &str = "id";

/// Returns the raw value of a field, if present.
pub fn field_value<'a>(record: &'a Value, field: &str) -> Option<&'a Value> {
    record.get(field)
}

/// Returns the record's identity value, if it carries one.
pub fn identity(record: &Value) -> Option<&Value> {
    record.get(IDENTITY_FIELD)
}

/// Normalizes a record field to its dimension key sequence.
///
/// - absent field or null value -> the sentinel key
/// - array value -> one key per element
/// - scalar value -> a single key
///
/// Every record yields at least one key, so every record is entered in
/// every dimension.
pub fn field_keys(record: &Value, field: &str) -> Vec<DimensionKey> {
    match record.get(field) {
        None | Some(Value::Null) => vec![DimensionKey::Null],
        Some(Value::Array(items)) => {
            if items.is_empty() {
                vec![DimensionKey::Null]
            } else {
                items.iter().map(DimensionKey::from_json).collect()
            }
        }
        Some(value) => vec![DimensionKey::from_json(value)],
    }
}
