//! Dimension index subsystem
//!
//! Dimensions are derived, in-memory-only indexes over single record
//! fields, one per dimension key referenced by the filter map.
//!
//! # Design principles
//!
//! - Derived state: dimensions mirror the dataset, never the source of truth
//! - Deterministic: BTreeMap key order, posting lists sorted ascending
//! - Total: every record is entered under at least one key (sentinel for
//!   absent values)
//!
//! # Invariants
//!
//! - Posting lists are sorted ascending, mirroring dataset order
//! - Range queries never surface the sentinel key
//! - Read queries have no side effects

mod index;
mod key;

pub use index::DimensionIndex;
pub use key::DimensionKey;

pub(crate) use index::intersect_sorted;
