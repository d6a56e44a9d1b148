//! The facet engine
//!
//! Owns the dataset, the dimension map, and the descriptor table; applies
//! declarative filters and maintains the derived visible subset.
//!
//! Recompute flow (strict order):
//!
//! 1. Start from the full dataset in slot order
//! 2. Intersect with each active descriptor's matching slots
//! 3. Apply the sort specification, if set
//! 4. Store the subset and notify observers

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde_json::Value;
use tracing::{debug, trace};

use crate::config::{ConfigError, ConfigResult, EngineConfig, FilterMethod, SortSpec};
use crate::dimension::{intersect_sorted, DimensionIndex};
use crate::record::{field_value, Dataset, Slot, IDENTITY_FIELD};

use super::descriptors::{DescriptorTable, FilterDescriptor};
use super::errors::EngineResult;
use super::sorter::SubsetSorter;

/// Caller-supplied predicate over a record's field value.
pub type PredicateFn = Box<dyn Fn(&Value) -> bool>;

/// Payload-free subset change callback.
pub type ChangeObserver = Box<dyn FnMut()>;

/// Named predicate functions for predicate-strategy filters.
///
/// Predicates cannot be declared in data; they are registered here and
/// validated against the filter map at construction.
#[derive(Default)]
pub struct PredicateRegistry {
    entries: HashMap<String, PredicateFn>,
}

impl PredicateRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a predicate under a filter name.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + 'static,
    ) {
        self.entries.insert(name.into(), Box::new(predicate));
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(
        mut self,
        name: impl Into<String>,
        predicate: impl Fn(&Value) -> bool + 'static,
    ) -> Self {
        self.register(name, predicate);
        self
    }

    /// Returns true if a predicate is registered under the name.
    pub fn contains(&self, name: &str) -> bool {
        self.entries.contains_key(name)
    }

    fn get(&self, name: &str) -> Option<&PredicateFn> {
        self.entries.get(name)
    }
}

/// Declarative multi-dimensional filtering and sorting engine.
///
/// Construction fixes the filter map and builds one dimension per
/// declared dimension key, plus the identity-keyed default dimension.
/// All mutation goes through the documented operations; the visible
/// subset is recomputed from scratch after each one.
pub struct FacetEngine {
    /// Insertion-ordered record store
    dataset: Dataset,
    /// Dimension key -> index, shared across descriptors
    dimensions: BTreeMap<String, DimensionIndex>,
    /// Declared filters and their activation state
    descriptors: DescriptorTable,
    /// Predicates for predicate-strategy filters
    predicates: PredicateRegistry,
    /// Current sort, applied to the visible subset only
    sort: Option<SortSpec>,
    /// The derived visible subset, as slots
    visible: Vec<Slot>,
    /// Subset change observers
    observers: Vec<ChangeObserver>,
}

impl FacetEngine {
    /// Builds an engine from a filter map and initial records.
    ///
    /// Fails if the filter map declares a predicate-strategy filter;
    /// use [`with_predicates`](Self::with_predicates) to supply them.
    pub fn new(config: EngineConfig, records: Vec<Value>) -> ConfigResult<Self> {
        Self::with_predicates(config, records, PredicateRegistry::new())
    }

    /// Builds an engine with predicate functions bound by filter name.
    pub fn with_predicates(
        config: EngineConfig,
        records: Vec<Value>,
        predicates: PredicateRegistry,
    ) -> ConfigResult<Self> {
        Self::validate(&config, &predicates)?;

        // One dimension per distinct dimension key, shared across
        // descriptors, plus the always-present identity dimension.
        let mut dimensions: BTreeMap<String, DimensionIndex> = BTreeMap::new();
        dimensions.insert(
            IDENTITY_FIELD.to_string(),
            DimensionIndex::new(IDENTITY_FIELD),
        );
        for spec in config.filters.values() {
            dimensions
                .entry(spec.dimension.clone())
                .or_insert_with(|| DimensionIndex::new(spec.field.clone()));
        }

        let mut engine = Self {
            dataset: Dataset::new(),
            dimensions,
            descriptors: DescriptorTable::from_config(&config.filters),
            predicates,
            sort: config.sort,
            visible: Vec::new(),
            observers: Vec::new(),
        };

        for record in records {
            engine.insert_record(record);
        }
        engine.recompute();

        Ok(engine)
    }

    /// Rejects filter maps the engine cannot honor.
    fn validate(config: &EngineConfig, predicates: &PredicateRegistry) -> ConfigResult<()> {
        let mut bound: BTreeMap<&str, &str> = BTreeMap::new();
        bound.insert(IDENTITY_FIELD, IDENTITY_FIELD);

        for (name, spec) in &config.filters {
            if let Some(existing) = bound.get(spec.dimension.as_str()).copied() {
                if existing != spec.field {
                    return Err(ConfigError::DimensionConflict {
                        dimension: spec.dimension.clone(),
                        existing: existing.to_string(),
                        conflicting: spec.field.clone(),
                    });
                }
            } else {
                bound.insert(&spec.dimension, &spec.field);
            }

            if spec.method == FilterMethod::Predicate && !predicates.contains(name) {
                return Err(ConfigError::MissingPredicate(name.clone()));
            }
        }

        Ok(())
    }

    // =========================================================================
    // Filter operations
    // =========================================================================

    /// Applies a filter argument.
    ///
    /// Scalar strategies replace any prior value; composite strategies
    /// append the value if absent. Errors on an undeclared filter name.
    pub fn add_filter(&mut self, name: &str, value: impl Into<Value>) -> EngineResult<()> {
        let value = value.into();
        self.descriptors.describe_mut(name)?.set_value(value);
        debug!("filter '{}' applied", name);
        self.refresh();
        Ok(())
    }

    /// Clears a filter's entire active state, regardless of strategy.
    pub fn remove_filter(&mut self, name: &str) -> EngineResult<()> {
        self.descriptors.describe_mut(name)?.clear();
        debug!("filter '{}' cleared", name);
        self.refresh();
        Ok(())
    }

    /// Removes one value from a composite filter's active set; scalar
    /// strategies clear entirely. Removing an absent value is a no-op.
    pub fn remove_filter_value(&mut self, name: &str, value: &Value) -> EngineResult<()> {
        self.descriptors.describe_mut(name)?.remove_value(value);
        debug!("filter '{}' value removed", name);
        self.refresh();
        Ok(())
    }

    /// Restores every filter to inactive; the visible subset returns to
    /// the full dataset in natural order.
    pub fn clear_all_filters(&mut self) {
        self.descriptors.clear_all();
        debug!("all filters cleared");
        self.refresh();
    }

    // =========================================================================
    // Record operations
    // =========================================================================

    /// Appends a record to the dataset and every dimension.
    ///
    /// The record joins the visible subset only if it passes all
    /// currently active filters.
    pub fn add_record(&mut self, record: Value) {
        self.insert_record(record);
        self.refresh();
    }

    /// Appends a batch of records, recomputing once.
    pub fn add_records(&mut self, records: impl IntoIterator<Item = Value>) {
        for record in records {
            self.insert_record(record);
        }
        self.refresh();
    }

    /// Deletes the record registered under the identity value. Unknown
    /// identities are ignored.
    pub fn delete_record(&mut self, id: &Value) {
        if self.remove_record(id) {
            self.refresh();
        }
    }

    /// Deletes a batch of records by identity, recomputing once.
    pub fn delete_records(&mut self, ids: &[Value]) {
        let mut removed = false;
        for id in ids {
            removed |= self.remove_record(id);
        }
        if removed {
            self.refresh();
        }
    }

    // =========================================================================
    // Sorting
    // =========================================================================

    /// Sets the sort specification and reorders the visible subset.
    ///
    /// Filter state is untouched; the sort is reapplied after every
    /// later recomputation until replaced.
    pub fn sort_by(&mut self, field: &str, ascending: bool) {
        let spec = SortSpec::new(field, ascending);
        SubsetSorter::sort(&mut self.visible, &self.dataset, &spec);
        self.sort = Some(spec);
        debug!("visible subset sorted by '{}'", field);
        self.notify();
    }

    /// Returns the current sort specification.
    pub fn sort_spec(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    // =========================================================================
    // Helper queries
    // =========================================================================

    /// The record with the maximum value along the named filter's
    /// dimension, over the full dataset. Ties break by dataset order,
    /// first wins.
    pub fn top(&self, name: &str) -> EngineResult<Option<&Value>> {
        let descriptor = self.descriptors.describe(name)?;
        let slot = self
            .dimensions
            .get(descriptor.dimension())
            .and_then(DimensionIndex::top_slot);
        Ok(slot.and_then(|s| self.dataset.get(s)))
    }

    /// The record with the minimum value along the named filter's
    /// dimension, over the full dataset.
    pub fn bottom(&self, name: &str) -> EngineResult<Option<&Value>> {
        let descriptor = self.descriptors.describe(name)?;
        let slot = self
            .dimensions
            .get(descriptor.dimension())
            .and_then(DimensionIndex::bottom_slot);
        Ok(slot.and_then(|s| self.dataset.get(s)))
    }

    // =========================================================================
    // Read accessors
    // =========================================================================

    /// The current visible subset, in dataset order unless sorted.
    pub fn visible(&self) -> Vec<&Value> {
        self.visible
            .iter()
            .filter_map(|slot| self.dataset.get(*slot))
            .collect()
    }

    /// Size of the visible subset.
    pub fn visible_len(&self) -> usize {
        self.visible.len()
    }

    /// Size of the full dataset.
    pub fn record_count(&self) -> usize {
        self.dataset.len()
    }

    /// Returns true when the named filter is active.
    pub fn is_active(&self, name: &str) -> EngineResult<bool> {
        Ok(self.descriptors.describe(name)?.is_active())
    }

    /// The ordered active value set of a composite filter. Empty for
    /// scalar strategies and inactive filters.
    pub fn active_values(&self, name: &str) -> EngineResult<&[Value]> {
        Ok(self.descriptors.describe(name)?.active_values())
    }

    /// The active value of a scalar-strategy filter. None for composite
    /// strategies and inactive filters.
    pub fn active_value(&self, name: &str) -> EngineResult<Option<&Value>> {
        Ok(self.descriptors.describe(name)?.active_scalar())
    }

    /// Registers a payload-free callback fired after every operation
    /// that may alter the visible subset.
    pub fn on_subset_change(&mut self, observer: impl FnMut() + 'static) {
        self.observers.push(Box::new(observer));
    }

    // =========================================================================
    // Internals
    // =========================================================================

    /// Stores a record and enters it in every dimension.
    fn insert_record(&mut self, record: Value) -> Slot {
        let slot = self.dataset.insert(record);
        if let Some(stored) = self.dataset.get(slot) {
            for dimension in self.dimensions.values_mut() {
                dimension.index_record(stored, slot);
            }
        }
        slot
    }

    /// Removes a record by identity from the dataset and every dimension.
    fn remove_record(&mut self, id: &Value) -> bool {
        match self.dataset.remove_by_identity(id) {
            Some((slot, record)) => {
                for dimension in self.dimensions.values_mut() {
                    dimension.unindex_record(&record, slot);
                }
                true
            }
            None => {
                trace!("delete ignored: unknown identity");
                false
            }
        }
    }

    /// Recomputes the visible subset and notifies observers.
    fn refresh(&mut self) {
        self.recompute();
        self.notify();
    }

    /// Rebuilds the visible subset from scratch.
    fn recompute(&mut self) {
        let mut candidates = self.dataset.slots();

        for descriptor in self.descriptors.iter() {
            if !descriptor.is_active() {
                continue;
            }
            candidates = self.apply_descriptor(descriptor, candidates);
            if candidates.is_empty() {
                break;
            }
        }

        if let Some(spec) = &self.sort {
            SubsetSorter::sort(&mut candidates, &self.dataset, spec);
        }

        debug!(
            "recomputed visible subset: {}/{} records",
            candidates.len(),
            self.dataset.len()
        );
        self.visible = candidates;
    }

    /// Intersects the candidate set with one active filter's matches.
    fn apply_descriptor(&self, descriptor: &FilterDescriptor, mut candidates: Vec<Slot>) -> Vec<Slot> {
        let Some(dimension) = self.dimensions.get(descriptor.dimension()) else {
            return Vec::new();
        };

        match descriptor.method() {
            FilterMethod::Exact => match descriptor.active_scalar() {
                Some(value) => intersect_sorted(&candidates, &dimension.exact(value)),
                None => candidates,
            },
            FilterMethod::RangeMin => match descriptor.active_scalar() {
                Some(value) => intersect_sorted(&candidates, &dimension.range_at_least(value)),
                None => candidates,
            },
            FilterMethod::RangeMax => match descriptor.active_scalar() {
                Some(value) => intersect_sorted(&candidates, &dimension.range_at_most(value)),
                None => candidates,
            },
            FilterMethod::MemberOr => {
                intersect_sorted(&candidates, &dimension.member_or(descriptor.active_values()))
            }
            FilterMethod::MemberAnd => intersect_sorted(
                &candidates,
                &dimension.member_and_all(descriptor.active_values()),
            ),
            FilterMethod::Predicate => {
                let Some(predicate) = self.predicates.get(descriptor.name()) else {
                    return Vec::new();
                };
                let field = descriptor.field();
                candidates.retain(|slot| {
                    self.dataset
                        .get(*slot)
                        .and_then(|record| field_value(record, field))
                        .map(|value| predicate(value))
                        .unwrap_or(false)
                });
                candidates
            }
        }
    }

    /// Fires every registered observer.
    fn notify(&mut self) {
        for observer in &mut self.observers {
            observer();
        }
    }
}

impl fmt::Debug for FacetEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FacetEngine")
            .field("records", &self.dataset.len())
            .field("filters", &self.descriptors.len())
            .field("visible", &self.visible.len())
            .field("sort", &self.sort)
            .finish()
    }
}
