//! Error handling for GCodeView
//!
//! The camera and progress core is total over its numeric domain, so very
//! little can fail. What can fail is reported through [`ViewError`]:
//! - rejected arguments (non-positive zoom factors)
//! - toolpath models that break the layer/segment ordering invariants
//!
//! All error types use `thiserror` for ergonomic error handling.

use thiserror::Error;

/// Viewer error type
///
/// Returned by view-transform operations and toolpath model construction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ViewError {
    /// An argument was outside its accepted domain
    #[error("Invalid argument '{name}': {reason}")]
    InvalidArgument {
        /// The name of the offending argument.
        name: String,
        /// Why the value was rejected.
        reason: String,
    },

    /// A toolpath model violates its ordering invariants
    #[error("Invalid toolpath model: {reason}")]
    InvalidModel {
        /// The violated invariant.
        reason: String,
    },
}

impl ViewError {
    /// Create an invalid-argument error
    pub fn invalid_argument(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidArgument {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Create an invalid-model error
    pub fn invalid_model(reason: impl Into<String>) -> Self {
        Self::InvalidModel {
            reason: reason.into(),
        }
    }

    /// Check if this error was caused by a rejected argument
    pub fn is_invalid_argument(&self) -> bool {
        matches!(self, Self::InvalidArgument { .. })
    }
}

/// Result type for viewer operations
pub type Result<T> = std::result::Result<T, ViewError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_argument_display() {
        let err = ViewError::invalid_argument("factor", "must be > 0, got -1");
        assert_eq!(
            err.to_string(),
            "Invalid argument 'factor': must be > 0, got -1"
        );
        assert!(err.is_invalid_argument());
    }

    #[test]
    fn test_invalid_model_display() {
        let err = ViewError::invalid_model("layer 2 z=0.2 is not above layer 1 z=0.4");
        assert_eq!(
            err.to_string(),
            "Invalid toolpath model: layer 2 z=0.2 is not above layer 1 z=0.4"
        );
        assert!(!err.is_invalid_argument());
    }
}
