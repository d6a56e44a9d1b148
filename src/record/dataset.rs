//! Ordered record store
//!
//! Records are addressed by slots assigned monotonically at insertion;
//! slot order is insertion order. An identity map supports deletion by
//! identity value.

use std::collections::{BTreeMap, HashMap};

use serde_json::Value;

use crate::dimension::DimensionKey;

use super::value;

/// Stable handle for a record within the dataset.
pub type Slot = u64;

/// Insertion-ordered record collection.
#[derive(Debug, Default)]
pub struct Dataset {
    /// Slot-keyed records; iteration order is insertion order
    records: BTreeMap<Slot, Value>,
    /// Identity key -> slot, for deletion by identity
    identities: HashMap<DimensionKey, Slot>,
    /// Next slot to assign
    next_slot: Slot,
}

impl Dataset {
    /// Creates an empty dataset.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record and returns its slot.
    ///
    /// A record with an identity registers it for deletion lookup; a
    /// repeated identity remaps to the newest slot.
    pub fn insert(&mut self, record: Value) -> Slot {
        let slot = self.next_slot;
        self.next_slot += 1;

        if let Some(id) = value::identity(&record) {
            let key = DimensionKey::from_json(id);
            if !key.is_null() {
                self.identities.insert(key, slot);
            }
        }

        self.records.insert(slot, record);
        slot
    }

    /// Removes the record registered under the given identity value.
    ///
    /// Returns the removed slot and record, or None if the identity is
    /// unknown.
    pub fn remove_by_identity(&mut self, id: &Value) -> Option<(Slot, Value)> {
        let key = DimensionKey::from_json(id);
        if key.is_null() {
            return None;
        }

        let slot = self.identities.remove(&key)?;
        let record = self.records.remove(&slot)?;
        Some((slot, record))
    }

    /// Returns the record stored at a slot.
    pub fn get(&self, slot: Slot) -> Option<&Value> {
        self.records.get(&slot)
    }

    /// Returns all slots in insertion order.
    pub fn slots(&self) -> Vec<Slot> {
        self.records.keys().copied().collect()
    }

    /// Iterates records in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (Slot, &Value)> {
        self.records.iter().map(|(slot, record)| (*slot, record))
    }

    /// Returns the number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Returns true if the dataset holds no records.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
