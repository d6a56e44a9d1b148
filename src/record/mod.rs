//! Record and dataset subsystem
//!
//! # Design principles
//!
//! - Records are plain JSON objects; no schema is imposed
//! - Scalar and array field values normalize to one key sequence
//! - Slot order is insertion order and never reused
//!
//! # Invariants
//!
//! - Every record normalizes to at least one dimension key per field
//! - An identity maps to at most one live slot

mod dataset;
mod value;

pub use dataset::{Dataset, Slot};
pub use value::{field_keys, field_value, identity, IDENTITY_FIELD};
