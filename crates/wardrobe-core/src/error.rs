//! # Error Types
//!
//! Domain-specific error types for wardrobe-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  wardrobe-core errors (this file)                                      │
//! │  ├── CoreError        - Why an action was ignored                      │
//! │  └── ValidationError  - Input validation failures                      │
//! │                                                                         │
//! │  wardrobe-db errors (separate crate)                                   │
//! │  └── DbError          - Storage operation failures                     │
//! │                                                                         │
//! │  Host errors (apps/host)                                               │
//! │  └── ApiError         - What the UI sees (serialized)                  │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## No Fatal Errors
//! Transitions never fail. When an action cannot do anything useful the
//! state is returned unchanged and the reason travels back as a value in
//! [`ActionReport::Ignored`](crate::actions::ActionReport::Ignored), so the
//! host can still show an accurate message ("bag full", "unknown item").

use thiserror::Error;

// =============================================================================
// Core Error
// =============================================================================

/// Reasons an action left the wardrobe unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// No category carries this id.
    #[error("Category not found: {0}")]
    CategoryNotFound(String),

    /// No batch carries this id.
    #[error("Batch not found: {0}")]
    BatchNotFound(String),

    /// The batch was already completed.
    #[error("Batch {0} is already completed")]
    BatchAlreadyCompleted(String),

    /// Nothing clean was left to move.
    ///
    /// ## User Workflow
    /// ```text
    /// Toss (qty: 3) on "Socks"
    ///      │
    ///      ▼
    /// clean=4, already in hamper=4
    ///      │
    ///      ▼
    /// NothingAvailable { category: "Socks", requested: 3 }
    ///      │
    ///      ▼
    /// UI shows: "Hamper already holds every clean Socks"
    /// ```
    #[error("Nothing available in {category}: requested {requested}")]
    NothingAvailable { category: String, requested: i64 },

    /// A dispatch found no clean stock for any staged entry.
    #[error("Nothing to dispatch")]
    EmptyDispatch,

    /// The category is hibernated and does not take part in rotation.
    #[error("Category {0} is hibernated")]
    Hibernated(String),

    /// Validation error (wraps ValidationError).
    #[error("Validation error: {0}")]
    Validation(#[from] ValidationError),
}

// =============================================================================
// Validation Error
// =============================================================================

/// Input validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("{field} is required")]
    Required { field: String },

    /// Field value is too long.
    #[error("{field} must be at most {max} characters")]
    TooLong { field: String, max: usize },

    /// Numeric value is out of range.
    #[error("{field} must be between {min} and {max}")]
    OutOfRange { field: String, min: i64, max: i64 },

    /// Value must be positive.
    #[error("{field} must be positive")]
    MustBePositive { field: String },

    /// Duplicate value (e.g., duplicate category name).
    #[error("{field} '{value}' already exists")]
    Duplicate { field: String, value: String },
}

// =============================================================================
// Result Type Alias
// =============================================================================

/// Convenience type alias for Results with CoreError.
pub type CoreResult<T> = Result<T, CoreError>;

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages() {
        let err = CoreError::NothingAvailable {
            category: "Socks".to_string(),
            requested: 3,
        };
        assert_eq!(err.to_string(), "Nothing available in Socks: requested 3");

        let err = CoreError::BatchAlreadyCompleted("b-1".to_string());
        assert_eq!(err.to_string(), "Batch b-1 is already completed");
    }

    #[test]
    fn test_validation_error_messages() {
        let err = ValidationError::Required {
            field: "name".to_string(),
        };
        assert_eq!(err.to_string(), "name is required");

        let err = ValidationError::Duplicate {
            field: "category".to_string(),
            value: "Socks".to_string(),
        };
        assert_eq!(err.to_string(), "category 'Socks' already exists");
    }

    #[test]
    fn test_validation_converts_to_core_error() {
        let validation_err = ValidationError::MustBePositive {
            field: "count".to_string(),
        };
        let core_err: CoreError = validation_err.into();
        assert!(matches!(core_err, CoreError::Validation(_)));
    }
}
