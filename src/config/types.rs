//! Declarative filter-map configuration
//!
//! A filter map declares named filters over record fields: each entry
//! names the source field, the backing dimension key, and the matching
//! strategy. The map is the engine's whole configuration surface and is
//! fixed after construction.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Matching strategy for a declared filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterMethod {
    /// Field equals the active value
    Exact,
    /// Field sequence shares at least one element with the active set
    MemberOr,
    /// Field sequence contains every element of the active set
    MemberAnd,
    /// Field is greater than or equal to the active bound
    RangeMin,
    /// Field is less than or equal to the active bound
    RangeMax,
    /// Caller-supplied predicate over the field value
    Predicate,
}

impl FilterMethod {
    /// Returns true for strategies holding an ordered value set.
    pub fn is_composite(&self) -> bool {
        matches!(self, FilterMethod::MemberOr | FilterMethod::MemberAnd)
    }

    /// Returns the strategy name for diagnostics.
    pub fn method_name(&self) -> &'static str {
        match self {
            FilterMethod::Exact => "exact",
            FilterMethod::MemberOr => "member_or",
            FilterMethod::MemberAnd => "member_and",
            FilterMethod::RangeMin => "range_min",
            FilterMethod::RangeMax => "range_max",
            FilterMethod::Predicate => "predicate",
        }
    }
}

/// A single named filter declaration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterSpec {
    /// Source record field
    pub field: String,
    /// Backing dimension key; filters sharing a key share the dimension
    pub dimension: String,
    /// Matching strategy
    pub method: FilterMethod,
}

impl FilterSpec {
    /// Creates a spec with an explicit dimension key.
    pub fn new(
        field: impl Into<String>,
        dimension: impl Into<String>,
        method: FilterMethod,
    ) -> Self {
        Self {
            field: field.into(),
            dimension: dimension.into(),
            method,
        }
    }

    /// Exact-match filter; dimension defaults to the field name.
    pub fn exact(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(field.clone(), field, FilterMethod::Exact)
    }

    /// OR-membership filter; dimension defaults to the field name.
    pub fn member_or(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(field.clone(), field, FilterMethod::MemberOr)
    }

    /// AND-membership filter; dimension defaults to the field name.
    pub fn member_and(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(field.clone(), field, FilterMethod::MemberAnd)
    }

    /// Lower-bound range filter; dimension defaults to the field name.
    pub fn range_min(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(field.clone(), field, FilterMethod::RangeMin)
    }

    /// Upper-bound range filter; dimension defaults to the field name.
    pub fn range_max(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(field.clone(), field, FilterMethod::RangeMax)
    }

    /// Predicate filter; dimension defaults to the field name.
    pub fn predicate(field: impl Into<String>) -> Self {
        let field = field.into();
        Self::new(field.clone(), field, FilterMethod::Predicate)
    }

    /// Rebinds the spec to a different dimension key.
    pub fn with_dimension(mut self, dimension: impl Into<String>) -> Self {
        self.dimension = dimension.into();
        self
    }
}

/// Sort specification for the visible subset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by
    pub field: String,
    /// Ascending when true, descending when false
    pub ascending: bool,
}

impl SortSpec {
    /// Creates a sort specification.
    pub fn new(field: impl Into<String>, ascending: bool) -> Self {
        Self {
            field: field.into(),
            ascending,
        }
    }

    /// Ascending sort by a field.
    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, true)
    }

    /// Descending sort by a field.
    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, false)
    }
}

/// Engine configuration: named filter declarations plus an optional
/// initial sort.
///
/// The filter map is ordered so recomputation traverses filters in a
/// stable order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Named filter declarations
    pub filters: BTreeMap<String, FilterSpec>,
    /// Initial sort applied from construction onward
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sort: Option<SortSpec>,
}

impl EngineConfig {
    /// Creates an empty configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a filter declaration.
    pub fn with_filter(mut self, name: impl Into<String>, spec: FilterSpec) -> Self {
        self.filters.insert(name.into(), spec);
        self
    }

    /// Sets the initial sort.
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }
}
