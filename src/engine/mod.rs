//! Facet engine subsystem
//!
//! The engine translates a declarative filter map into dimension indexes
//! and maintains the derived visible subset across filter and record
//! mutations.
//!
//! # Design principles
//!
//! - Declarative: behavior comes from the filter map, dispatched by one
//!   exhaustive match over the strategy variant
//! - Derived subset: recomputed from scratch on every mutation, never
//!   incrementally patched
//! - Deterministic: stable filter order, sorted slot sets, stable sort
//!
//! # Invariants
//!
//! - A descriptor is active exactly when it holds a value or a non-empty set
//! - The visible subset preserves dataset order absent a sort specification
//! - Observers are notified after every subset-affecting operation
//! - Soft mismatches degrade to "no match"; only unknown filter names error

mod descriptors;
mod engine;
mod errors;
mod sorter;

pub use descriptors::{ActiveValue, DescriptorTable, FilterDescriptor};
pub use engine::{ChangeObserver, FacetEngine, PredicateFn, PredicateRegistry};
pub use errors::{EngineError, EngineResult};
pub use sorter::SubsetSorter;
