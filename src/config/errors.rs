//! Configuration error types
//!
//! Configuration errors are fatal at construction: an engine is never
//! built from an invalid filter map.

use thiserror::Error;

/// Result type for configuration validation
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while validating a filter map
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A predicate-strategy filter has no registered predicate function
    #[error("filter '{0}' uses the predicate strategy but no predicate function was registered")]
    MissingPredicate(String),

    /// Two filters bind the same dimension key to different source fields
    #[error("dimension '{dimension}' is bound to field '{existing}' and cannot also serve field '{conflicting}'")]
    DimensionConflict {
        /// The doubly-bound dimension key
        dimension: String,
        /// Field the dimension was first bound to
        existing: String,
        /// Field the conflicting declaration names
        conflicting: String,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = ConfigError::MissingPredicate("is_cute".to_string());
        assert!(err.to_string().contains("is_cute"));

        let err = ConfigError::DimensionConflict {
            dimension: "age".to_string(),
            existing: "age".to_string(),
            conflicting: "cuteness".to_string(),
        };
        let display = err.to_string();
        assert!(display.contains("age"));
        assert!(display.contains("cuteness"));
    }
}
