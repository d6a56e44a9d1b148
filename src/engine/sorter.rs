//! Visible-subset sorting
//!
//! Sorts the visible subset by a record field, stably and type-aware.
//! Sorting reorders the subset only; the underlying dataset order is
//! never touched.

use std::cmp::Ordering;

use serde_json::Value;

use crate::config::SortSpec;
use crate::record::{field_value, Dataset, Slot};

/// Sorts visible-subset slots through the record store.
pub struct SubsetSorter;

impl SubsetSorter {
    /// Sorts slots by the spec's field.
    ///
    /// The sort is stable: slots whose field values tie keep their prior
    /// relative order.
    pub fn sort(slots: &mut [Slot], dataset: &Dataset, spec: &SortSpec) {
        slots.sort_by(|a, b| {
            let a_val = dataset.get(*a).and_then(|record| field_value(record, &spec.field));
            let b_val = dataset.get(*b).and_then(|record| field_value(record, &spec.field));

            let ordering = Self::compare_values(a_val, b_val);

            if spec.ascending {
                ordering
            } else {
                ordering.reverse()
            }
        });
    }

    /// Compares two field values for sorting.
    ///
    /// Ordering rules:
    /// - missing < null < bool < number < string < array < object
    /// - within a type, natural ordering; arrays and objects tie
    fn compare_values(a: Option<&Value>, b: Option<&Value>) -> Ordering {
        match (a, b) {
            (None, None) => Ordering::Equal,
            (None, Some(_)) => Ordering::Less,
            (Some(_), None) => Ordering::Greater,
            (Some(a_val), Some(b_val)) => {
                let type_order = |v: &Value| -> u8 {
                    match v {
                        Value::Null => 0,
                        Value::Bool(_) => 1,
                        Value::Number(_) => 2,
                        Value::String(_) => 3,
                        Value::Array(_) => 4,
                        Value::Object(_) => 5,
                    }
                };

                let a_type = type_order(a_val);
                let b_type = type_order(b_val);

                if a_type != b_type {
                    return a_type.cmp(&b_type);
                }

                match (a_val, b_val) {
                    (Value::Bool(a_b), Value::Bool(b_b)) => a_b.cmp(b_b),
                    (Value::Number(a_n), Value::Number(b_n)) => {
                        let a_f = a_n.as_f64().unwrap_or(0.0);
                        let b_f = b_n.as_f64().unwrap_or(0.0);
                        a_f.partial_cmp(&b_f).unwrap_or(Ordering::Equal)
                    }
                    (Value::String(a_s), Value::String(b_s)) => a_s.cmp(b_s),
                    _ => Ordering::Equal,
                }
            }
        }
    }
}
