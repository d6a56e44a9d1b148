//! Dimension key type
//!
//! Keys place every indexable JSON value in a single total order:
//! Null < Bool < Num < Str. Numbers are stored as total-order bits so
//! integer and float values interleave correctly under one variant.

use serde_json::Value;

/// Ordered key for one indexed field value.
///
/// `Null` is the sentinel for absent, null, or non-indexable values; it
/// sorts below every real key.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum DimensionKey {
    /// Sentinel for absent, null, or non-indexable values
    Null,
    /// Boolean value (false < true)
    Bool(bool),
    /// Numeric value as total-order bits
    Num(u64),
    /// String value
    Str(String),
}

impl DimensionKey {
    /// Creates a key from a boolean.
    pub fn from_bool(v: bool) -> Self {
        DimensionKey::Bool(v)
    }

    /// Creates a key from a float.
    ///
    /// The bit transform gives negative values, zero, and positive values
    /// a total order under unsigned comparison.
    pub fn from_f64(v: f64) -> Self {
        let bits = v.to_bits();
        let ordered = if (bits >> 63) == 1 {
            !bits // Negative: flip all bits
        } else {
            bits ^ (1 << 63) // Positive: flip sign bit
        };
        DimensionKey::Num(ordered)
    }

    /// Creates a key from a string.
    pub fn from_string(v: impl Into<String>) -> Self {
        DimensionKey::Str(v.into())
    }

    /// Creates a key from a JSON value.
    ///
    /// Nested arrays and objects are not indexable and collapse to the
    /// sentinel.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Bool(b) => DimensionKey::from_bool(*b),
            Value::Number(n) => match n.as_f64() {
                Some(f) => DimensionKey::from_f64(f),
                None => DimensionKey::Null,
            },
            Value::String(s) => DimensionKey::from_string(s),
            _ => DimensionKey::Null,
        }
    }

    /// Returns true for the sentinel key.
    pub fn is_null(&self) -> bool {
        matches!(self, DimensionKey::Null)
    }

    /// Returns true for keys that support range comparison.
    pub fn is_orderable(&self) -> bool {
        matches!(self, DimensionKey::Num(_) | DimensionKey::Str(_))
    }
}
