//! Application-wide error types.

use thiserror::Error;

/// Result type alias using `AppError`.
pub type AppResult<T> = Result<T, AppError>;

/// Application error types.
#[derive(Debug, Error)]
pub enum AppError {
    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Validation error.
    #[error("Validation error: {0}")]
    Validation(String),

    /// Business rule violation.
    #[error("Business rule violation: {0}")]
    BusinessRule(String),

    /// Conflict (e.g., concurrent modification that exhausted retries).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Document store error.
    #[error("Store error: {0}")]
    Store(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Returns the error code for API responses.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "NOT_FOUND",
            Self::Validation(_) => "VALIDATION_ERROR",
            Self::BusinessRule(_) => "BUSINESS_RULE_VIOLATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Store(_) => "STORE_ERROR",
            Self::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Returns true if the caller may safely retry the operation.
    ///
    /// Only conflicts are retryable; validation and business-rule failures
    /// are terminal until the caller changes the request.
    #[must_use]
    pub const fn is_retryable(&self) -> bool {
        matches!(self, Self::Conflict(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(AppError::NotFound(String::new()).error_code(), "NOT_FOUND");
        assert_eq!(
            AppError::Validation(String::new()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::BusinessRule(String::new()).error_code(),
            "BUSINESS_RULE_VIOLATION"
        );
        assert_eq!(AppError::Conflict(String::new()).error_code(), "CONFLICT");
        assert_eq!(AppError::Store(String::new()).error_code(), "STORE_ERROR");
        assert_eq!(
            AppError::Internal(String::new()).error_code(),
            "INTERNAL_ERROR"
        );
    }

    #[test]
    fn test_retryable() {
        assert!(AppError::Conflict(String::new()).is_retryable());
        assert!(!AppError::Validation(String::new()).is_retryable());
        assert!(!AppError::BusinessRule(String::new()).is_retryable());
        assert!(!AppError::NotFound(String::new()).is_retryable());
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            AppError::NotFound("msg".into()).to_string(),
            "Not found: msg"
        );
        assert_eq!(
            AppError::BusinessRule("msg".into()).to_string(),
            "Business rule violation: msg"
        );
        assert_eq!(AppError::Store("msg".into()).to_string(), "Store error: msg");
    }
}
