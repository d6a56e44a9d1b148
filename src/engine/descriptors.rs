//! Filter descriptor table
//!
//! Runtime activation bookkeeping for declared filters. A descriptor is
//! active exactly when its scalar value is set or its composite set is
//! non-empty.

use std::collections::BTreeMap;

use serde_json::Value;

use crate::config::{FilterMethod, FilterSpec};

use super::errors::{EngineError, EngineResult};

/// Active filter argument(s), shaped by the strategy.
#[derive(Debug, Clone, PartialEq)]
pub enum ActiveValue {
    /// Single replaceable value (exact, range, and predicate strategies)
    Scalar(Option<Value>),
    /// Ordered, duplicate-free value set (membership strategies)
    Set(Vec<Value>),
}

impl ActiveValue {
    fn for_method(method: FilterMethod) -> Self {
        if method.is_composite() {
            ActiveValue::Set(Vec::new())
        } else {
            ActiveValue::Scalar(None)
        }
    }

    /// Returns true when a value is set or the set is non-empty.
    pub fn is_active(&self) -> bool {
        match self {
            ActiveValue::Scalar(value) => value.is_some(),
            ActiveValue::Set(values) => !values.is_empty(),
        }
    }
}

/// A declared filter plus its activation state.
#[derive(Debug, Clone)]
pub struct FilterDescriptor {
    name: String,
    spec: FilterSpec,
    active: ActiveValue,
}

impl FilterDescriptor {
    /// Creates an inactive descriptor from a declaration.
    pub fn new(name: impl Into<String>, spec: FilterSpec) -> Self {
        let active = ActiveValue::for_method(spec.method);
        Self {
            name: name.into(),
            spec,
            active,
        }
    }

    /// Returns the filter name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the source record field.
    pub fn field(&self) -> &str {
        &self.spec.field
    }

    /// Returns the backing dimension key.
    pub fn dimension(&self) -> &str {
        &self.spec.dimension
    }

    /// Returns the matching strategy.
    pub fn method(&self) -> FilterMethod {
        self.spec.method
    }

    /// Returns true when the filter participates in recomputation.
    pub fn is_active(&self) -> bool {
        self.active.is_active()
    }

    /// The composite active set, in insertion order. Empty for scalar
    /// strategies.
    pub fn active_values(&self) -> &[Value] {
        match &self.active {
            ActiveValue::Set(values) => values,
            ActiveValue::Scalar(_) => &[],
        }
    }

    /// The scalar active value. None for composite strategies.
    pub fn active_scalar(&self) -> Option<&Value> {
        match &self.active {
            ActiveValue::Scalar(value) => value.as_ref(),
            ActiveValue::Set(_) => None,
        }
    }

    /// Applies a filter argument.
    ///
    /// Scalar strategies replace any prior value (last write wins);
    /// composite strategies append the value if absent, preserving
    /// insertion order. Re-adding a present value is a no-op.
    pub fn set_value(&mut self, value: Value) {
        match &mut self.active {
            ActiveValue::Scalar(slot) => *slot = Some(value),
            ActiveValue::Set(values) => {
                if !values.contains(&value) {
                    values.push(value);
                }
            }
        }
    }

    /// Removes one value from a composite active set; removing a value
    /// that is not active is a no-op. Scalar strategies clear entirely.
    pub fn remove_value(&mut self, value: &Value) {
        match &mut self.active {
            ActiveValue::Scalar(slot) => *slot = None,
            ActiveValue::Set(values) => values.retain(|v| v != value),
        }
    }

    /// Restores the descriptor to inactive.
    pub fn clear(&mut self) {
        self.active = ActiveValue::for_method(self.spec.method);
    }
}

/// Name-keyed descriptor registry with deterministic iteration order.
#[derive(Debug, Default)]
pub struct DescriptorTable {
    entries: BTreeMap<String, FilterDescriptor>,
}

impl DescriptorTable {
    /// Builds the table from the declared filter map.
    pub fn from_config(filters: &BTreeMap<String, FilterSpec>) -> Self {
        let entries = filters
            .iter()
            .map(|(name, spec)| (name.clone(), FilterDescriptor::new(name.clone(), spec.clone())))
            .collect();
        Self { entries }
    }

    /// Looks up a descriptor by filter name.
    pub fn describe(&self, name: &str) -> EngineResult<&FilterDescriptor> {
        self.entries
            .get(name)
            .ok_or_else(|| EngineError::UnknownFilter(name.to_string()))
    }

    /// Looks up a descriptor for mutation.
    pub fn describe_mut(&mut self, name: &str) -> EngineResult<&mut FilterDescriptor> {
        self.entries
            .get_mut(name)
            .ok_or_else(|| EngineError::UnknownFilter(name.to_string()))
    }

    /// Iterates descriptors in name order.
    pub fn iter(&self) -> impl Iterator<Item = &FilterDescriptor> {
        self.entries.values()
    }

    /// Restores every descriptor to inactive.
    pub fn clear_all(&mut self) {
        for descriptor in self.entries.values_mut() {
            descriptor.clear();
        }
    }

    /// Returns the number of declared filters.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no filters are declared.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
