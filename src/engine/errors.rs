//! Engine error types
//!
//! Usage errors are recoverable and surfaced to the caller. Soft
//! mismatches (missing fields, non-orderable range bounds, removing a
//! value that is not active, deleting an unknown identity) degrade to
//! "no match" and are never raised.

use thiserror::Error;

/// Result type for engine operations
pub type EngineResult<T> = Result<T, EngineError>;

/// Recoverable usage errors raised by engine operations
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum EngineError {
    /// An operation referenced a filter name that was never declared
    #[error("unknown filter '{0}'")]
    UnknownFilter(String),
}
