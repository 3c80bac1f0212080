//! # API Error Type
//!
//! Unified error type for the session surface.
//!
//! ## Error Handling Strategy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                    Error Flow in Wardrobe Flow                          │
//! │                                                                         │
//! │  Mobile UI                   Rust Host                                  │
//! │  ─────────                   ─────────                                  │
//! │                                                                         │
//! │  session.toss(id, 3)                                                    │
//! │         │                                                               │
//! │         ▼                                                               │
//! │  ┌──────────────────────────────────────────────────────────────────┐  │
//! │  │  Session Method                                                  │  │
//! │  │  Result<ActionResponse, ApiError>                                │  │
//! │  │         │                                                        │  │
//! │  │         ▼                                                        │  │
//! │  │  Ignored? ─── CoreError::NothingAvailable ────────┐             │  │
//! │  │         │                                          ▼             │  │
//! │  │         │                                       ApiError ──────►│  │
//! │  │         ▼                                                        │  │
//! │  │  Applied ──────────────────────────────────────────────────────►│  │
//! │  └──────────────────────────────────────────────────────────────────┘  │
//! │                                                                         │
//! │  Storage failures never reach the UI: saves are best-effort and only   │
//! │  logged, so there is no storage error code.                             │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use serde::Serialize;
use wardrobe_core::CoreError;

/// Error returned from session actions.
///
/// ## Serialization
/// ```json
/// {
///   "code": "NOTHING_AVAILABLE",
///   "message": "The hamper already holds every clean Socks"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiError {
    /// Machine-readable error code for programmatic handling
    pub code: ErrorCode,

    /// Human-readable error message for display
    pub message: String,
}

/// Error codes for API responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    /// Category or batch not found
    NotFound,

    /// Input validation failed
    ValidationError,

    /// Nothing clean left to move (hamper full, stock out)
    NothingAvailable,

    /// The action does not apply in the current state
    BusinessLogic,
}

impl ApiError {
    /// Creates a new API error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        ApiError {
            code,
            message: message.into(),
        }
    }

    /// Creates a not found error.
    pub fn not_found(resource: &str, id: &str) -> Self {
        ApiError::new(ErrorCode::NotFound, format!("{} not found: {}", resource, id))
    }

    /// Creates a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        ApiError::new(ErrorCode::ValidationError, message)
    }
}

/// Converts the reason an action was ignored to an API error.
impl From<CoreError> for ApiError {
    fn from(err: CoreError) -> Self {
        match err {
            CoreError::CategoryNotFound(id) => ApiError::not_found("Category", &id),
            CoreError::BatchNotFound(id) => ApiError::not_found("Batch", &id),
            CoreError::BatchAlreadyCompleted(id) => {
                ApiError::new(ErrorCode::BusinessLogic, format!("Batch {} is already back from the wash", id))
            }
            CoreError::NothingAvailable { category, .. } => ApiError::new(
                ErrorCode::NothingAvailable,
                format!("The hamper already holds every clean {}", category),
            ),
            CoreError::EmptyDispatch => ApiError::new(ErrorCode::BusinessLogic, "Nothing in the hamper to wash"),
            CoreError::Hibernated(name) => {
                ApiError::new(ErrorCode::BusinessLogic, format!("{} is stored away for the season", name))
            }
            CoreError::Validation(e) => ApiError::validation(e.to_string()),
        }
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{:?}] {}", self.code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::*;
    use wardrobe_core::ValidationError;

    #[test]
    fn test_core_error_mapping() {
        let err = ApiError::from(CoreError::CategoryNotFound("abc".to_string()));
        assert_eq!(err.code, ErrorCode::NotFound);
        assert_eq!(err.message, "Category not found: abc");

        let err = ApiError::from(CoreError::NothingAvailable {
            category: "Socks".to_string(),
            requested: 3,
        });
        assert_eq!(err.code, ErrorCode::NothingAvailable);
        assert!(err.message.contains("Socks"));

        let err = ApiError::from(CoreError::Validation(ValidationError::MustBePositive {
            field: "count".to_string(),
        }));
        assert_eq!(err.code, ErrorCode::ValidationError);
        assert_eq!(err.message, "count must be positive");
    }

    #[test]
    fn test_serialized_shape() {
        let json = serde_json::to_value(ApiError::from(CoreError::EmptyDispatch)).unwrap();
        assert_eq!(json["code"], "BUSINESS_LOGIC");
        assert_eq!(json["message"], "Nothing in the hamper to wash");
    }
}
