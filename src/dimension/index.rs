//! Ordered per-field index
//!
//! One index exists per dimension key referenced by the filter map. The
//! index maps dimension keys to posting lists of slots, sorted ascending,
//! so every query result comes back in dataset order.

use std::collections::BTreeMap;
use std::ops::Bound;

use serde_json::Value;

use crate::record::{field_keys, Slot};

use super::key::DimensionKey;

/// Index over a single record field.
#[derive(Debug)]
pub struct DimensionIndex {
    /// Source record field
    field: String,
    /// Key -> slots holding that key, sorted ascending
    tree: BTreeMap<DimensionKey, Vec<Slot>>,
}

impl DimensionIndex {
    /// Creates an empty index over a field.
    pub fn new(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            tree: BTreeMap::new(),
        }
    }

    /// Returns the indexed field name.
    pub fn field(&self) -> &str {
        &self.field
    }

    /// Inserts a posting, keeping the list sorted ascending.
    pub fn insert(&mut self, key: DimensionKey, slot: Slot) {
        let postings = self.tree.entry(key).or_default();
        match postings.binary_search(&slot) {
            Ok(_) => {} // Already present
            Err(pos) => postings.insert(pos, slot),
        }
    }

    /// Removes a posting; a key with no postings left is dropped.
    pub fn remove(&mut self, key: &DimensionKey, slot: Slot) {
        if let Some(postings) = self.tree.get_mut(key) {
            if let Ok(pos) = postings.binary_search(&slot) {
                postings.remove(pos);
            }
            if postings.is_empty() {
                self.tree.remove(key);
            }
        }
    }

    /// Enters a record under its normalized key sequence.
    pub fn index_record(&mut self, record: &Value, slot: Slot) {
        for key in field_keys(record, &self.field) {
            self.insert(key, slot);
        }
    }

    /// Removes a record's normalized key sequence.
    pub fn unindex_record(&mut self, record: &Value, slot: Slot) {
        for key in field_keys(record, &self.field) {
            self.remove(&key, slot);
        }
    }

    /// Slots whose field equals the value.
    pub fn exact(&self, value: &Value) -> Vec<Slot> {
        let key = DimensionKey::from_json(value);
        if key.is_null() {
            return Vec::new();
        }
        self.tree.get(&key).cloned().unwrap_or_default()
    }

    /// Slots whose field is >= the bound.
    ///
    /// A non-orderable bound matches no records. Results stay within the
    /// bound's key type; the sentinel never appears in a range.
    pub fn range_at_least(&self, value: &Value) -> Vec<Slot> {
        match DimensionKey::from_json(value) {
            DimensionKey::Num(bits) => self.collect_range(
                Bound::Included(DimensionKey::Num(bits)),
                Bound::Included(DimensionKey::Num(u64::MAX)),
            ),
            DimensionKey::Str(s) => {
                self.collect_range(Bound::Included(DimensionKey::Str(s)), Bound::Unbounded)
            }
            _ => Vec::new(),
        }
    }

    /// Slots whose field is <= the bound.
    pub fn range_at_most(&self, value: &Value) -> Vec<Slot> {
        match DimensionKey::from_json(value) {
            DimensionKey::Num(bits) => self.collect_range(
                Bound::Included(DimensionKey::Num(u64::MIN)),
                Bound::Included(DimensionKey::Num(bits)),
            ),
            DimensionKey::Str(s) => self.collect_range(
                Bound::Included(DimensionKey::Str(String::new())),
                Bound::Included(DimensionKey::Str(s)),
            ),
            _ => Vec::new(),
        }
    }

    /// Slots whose key sequence shares at least one element with `values`.
    ///
    /// Union of the exact postings of each value.
    pub fn member_or(&self, values: &[Value]) -> Vec<Slot> {
        let mut result = Vec::new();
        for value in values {
            result.extend(self.exact(value));
        }
        result.sort_unstable();
        result.dedup();
        result
    }

    /// Slots whose key sequence contains every element of `values`.
    ///
    /// Intersection of the exact postings of each value. An empty value
    /// set matches no records.
    pub fn member_and_all(&self, values: &[Value]) -> Vec<Slot> {
        let mut values = values.iter();
        let mut result = match values.next() {
            Some(first) => self.exact(first),
            None => return Vec::new(),
        };
        for value in values {
            result = intersect_sorted(&result, &self.exact(value));
            if result.is_empty() {
                break;
            }
        }
        result
    }

    /// The slot holding the maximum non-sentinel key.
    ///
    /// Ties on the key break by dataset order, earliest slot first.
    pub fn top_slot(&self) -> Option<Slot> {
        self.tree
            .iter()
            .rev()
            .find(|(key, _)| !key.is_null())
            .and_then(|(_, postings)| postings.first().copied())
    }

    /// The slot holding the minimum non-sentinel key.
    pub fn bottom_slot(&self) -> Option<Slot> {
        self.tree
            .iter()
            .find(|(key, _)| !key.is_null())
            .and_then(|(_, postings)| postings.first().copied())
    }

    /// Returns the number of distinct keys.
    pub fn key_count(&self) -> usize {
        self.tree.len()
    }

    /// Returns the total number of postings.
    pub fn posting_count(&self) -> usize {
        self.tree.values().map(|v| v.len()).sum()
    }

    /// Collects postings over a key range, sorted ascending.
    fn collect_range(&self, min: Bound<DimensionKey>, max: Bound<DimensionKey>) -> Vec<Slot> {
        let mut result = Vec::new();
        for (_, postings) in self.tree.range((min, max)) {
            result.extend(postings);
        }
        result.sort_unstable();
        result
    }
}

/// Intersects two ascending slot lists.
pub(crate) fn intersect_sorted(a: &[Slot], b: &[Slot]) -> Vec<Slot> {
    let mut result = Vec::new();
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].cmp(&b[j]) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                result.push(a[i]);
                i += 1;
                j += 1;
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn age_index() -> DimensionIndex {
        let mut index = DimensionIndex::new("age");
        index.index_record(&json!({"age": 4}), 0);
        index.index_record(&json!({"age": 9}), 1);
        index.index_record(&json!({"age": 6}), 2);
        index.index_record(&json!({"age": 4}), 3);
        index.index_record(&json!({"name": "ageless"}), 4);
        index
    }

    fn colour_index() -> DimensionIndex {
        let mut index = DimensionIndex::new("colours");
        index.index_record(&json!({"colours": ["black", "white"]}), 0);
        index.index_record(&json!({"colours": ["black"]}), 1);
        index.index_record(&json!({"colours": ["ginger", "white"]}), 2);
        index.index_record(&json!({"colours": "grey"}), 3);
        index
    }

    #[test]
    fn test_exact() {
        let index = age_index();
        assert_eq!(index.exact(&json!(4)), vec![0, 3]);
        assert_eq!(index.exact(&json!(9)), vec![1]);
        assert!(index.exact(&json!(100)).is_empty());
        assert!(index.exact(&json!(null)).is_empty());
    }

    #[test]
    fn test_range_at_least() {
        let index = age_index();
        assert_eq!(index.range_at_least(&json!(5)), vec![1, 2]);
        assert_eq!(index.range_at_least(&json!(0)), vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_range_at_most() {
        let index = age_index();
        assert_eq!(index.range_at_most(&json!(6)), vec![0, 2, 3]);
        assert!(index.range_at_most(&json!(1)).is_empty());
    }

    #[test]
    fn test_range_excludes_sentinel() {
        let index = age_index();
        // Slot 4 has no age; it must never surface from a range
        assert!(!index.range_at_most(&json!(1000)).contains(&4));
    }

    #[test]
    fn test_range_non_orderable_bound_matches_nothing() {
        let index = age_index();
        assert!(index.range_at_least(&json!(null)).is_empty());
        assert!(index.range_at_least(&json!(true)).is_empty());
        assert!(index.range_at_most(&json!([1, 2])).is_empty());
    }

    #[test]
    fn test_member_or() {
        let index = colour_index();
        assert_eq!(index.member_or(&[json!("black")]), vec![0, 1]);
        assert_eq!(index.member_or(&[json!("black"), json!("white")]), vec![0, 1, 2]);
        // Scalar field values participate like one-element sequences
        assert_eq!(index.member_or(&[json!("grey")]), vec![3]);
        assert!(index.member_or(&[]).is_empty());
    }

    #[test]
    fn test_member_and_all() {
        let index = colour_index();
        assert_eq!(index.member_and_all(&[json!("black")]), vec![0, 1]);
        assert_eq!(index.member_and_all(&[json!("black"), json!("white")]), vec![0]);
        assert!(index
            .member_and_all(&[json!("black"), json!("ginger")])
            .is_empty());
        assert!(index.member_and_all(&[]).is_empty());
    }

    #[test]
    fn test_top_and_bottom_slot() {
        let index = age_index();
        assert_eq!(index.top_slot(), Some(1)); // age 9
        assert_eq!(index.bottom_slot(), Some(0)); // age 4, earliest slot wins
    }

    #[test]
    fn test_top_skips_sentinel() {
        let mut index = DimensionIndex::new("age");
        index.index_record(&json!({"name": "ageless"}), 0);
        assert_eq!(index.top_slot(), None);
        assert_eq!(index.bottom_slot(), None);
    }

    #[test]
    fn test_unindex_record() {
        let mut index = colour_index();
        index.unindex_record(&json!({"colours": ["black", "white"]}), 0);

        assert_eq!(index.exact(&json!("black")), vec![1]);
        assert_eq!(index.exact(&json!("white")), vec![2]);
    }

    #[test]
    fn test_insert_idempotent() {
        let mut index = DimensionIndex::new("colours");
        // Duplicate array elements produce one posting
        index.index_record(&json!({"colours": ["black", "black"]}), 0);
        assert_eq!(index.exact(&json!("black")), vec![0]);
        assert_eq!(index.posting_count(), 1);
    }

    #[test]
    fn test_empty_key_dropped() {
        let mut index = DimensionIndex::new("age");
        index.insert(DimensionKey::from_f64(4.0), 0);
        index.remove(&DimensionKey::from_f64(4.0), 0);
        assert_eq!(index.key_count(), 0);
    }

    #[test]
    fn test_intersect_sorted() {
        assert_eq!(intersect_sorted(&[1, 3, 5, 7], &[2, 3, 5, 8]), vec![3, 5]);
        assert!(intersect_sorted(&[1, 2], &[3, 4]).is_empty());
        assert!(intersect_sorted(&[], &[1]).is_empty());
    }
}
