//! Declarative configuration subsystem
//!
//! The filter map is supplied once at construction and validated then;
//! reconfiguration after construction is unsupported.
//!
//! # Design principles
//!
//! - Declarative: behavior is named in data, dispatched by strategy variant
//! - Deterministic: the filter map is ordered for stable traversal
//! - Fail fast: an invalid map never produces an engine

mod errors;
mod types;

pub use errors::{ConfigError, ConfigResult};
pub use types::{EngineConfig, FilterMethod, FilterSpec, SortSpec};
