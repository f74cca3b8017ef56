//! Error types for reprise operations.
//!
//! Every failure surfaced by the engine carries a structured error code so
//! API layers can branch on kind without matching message strings.

use thiserror::Error;

/// Result type alias for reprise operations.
pub type RepriseResult<T> = Result<T, RepriseError>;

/// Main error type for all reprise operations.
#[derive(Error, Debug)]
pub enum RepriseError {
    /// Caller supplied a value the engine cannot accept.
    #[error("Invalid input: {message}")]
    InvalidInput {
        message: String,
        code: ErrorCode,
        field: Option<String>,
    },

    /// The operation is not legal for the record's current status.
    #[error("Invalid state: {message}")]
    InvalidState { message: String, code: ErrorCode },

    /// Review record not found.
    #[error("Review not found: {message}")]
    NotFound {
        message: String,
        code: ErrorCode,
        key: Option<String>,
    },

    /// The backing store failed; the transaction either committed or did not.
    #[error("Store unavailable: {message}")]
    StoreUnavailable {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// Error codes for programmatic handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    // Input (INPUT_xxx)
    InputInvalid,
    InputInvalidQuality,
    InputMalformedId,
    InputInvalidCursor,

    // State (STATE_xxx)
    StateSuspended,

    // Review records (REV_xxx)
    ReviewNotFound,

    // Store (STORE_xxx)
    StoreConnectionFailed,
    StoreOperationFailed,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::InputInvalid => "INPUT_001",
            ErrorCode::InputInvalidQuality => "INPUT_002",
            ErrorCode::InputMalformedId => "INPUT_003",
            ErrorCode::InputInvalidCursor => "INPUT_004",
            ErrorCode::StateSuspended => "STATE_001",
            ErrorCode::ReviewNotFound => "REV_001",
            ErrorCode::StoreConnectionFailed => "STORE_001",
            ErrorCode::StoreOperationFailed => "STORE_002",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl RepriseError {
    /// Create a generic invalid-input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: message.into(),
            code: ErrorCode::InputInvalid,
            field: None,
        }
    }

    /// Create an invalid-input error for a quality grade outside the 0-5 scale.
    pub fn invalid_quality(value: u8) -> Self {
        Self::InvalidInput {
            message: format!("quality grade {} is outside the 0-5 scale", value),
            code: ErrorCode::InputInvalidQuality,
            field: Some("quality".to_string()),
        }
    }

    /// Create an invalid-input error for a malformed identifier.
    pub fn malformed_id(field: impl Into<String>, value: impl Into<String>) -> Self {
        let field = field.into();
        Self::InvalidInput {
            message: format!("{} '{}' is not a valid identifier", field, value.into()),
            code: ErrorCode::InputMalformedId,
            field: Some(field),
        }
    }

    /// Create an invalid-input error for an undecodable pagination cursor.
    pub fn invalid_cursor(message: impl Into<String>) -> Self {
        Self::InvalidInput {
            message: format!("pagination cursor is invalid: {}", message.into()),
            code: ErrorCode::InputInvalidCursor,
            field: Some("cursor".to_string()),
        }
    }

    /// Create an invalid-state error.
    pub fn invalid_state(message: impl Into<String>) -> Self {
        Self::InvalidState {
            message: message.into(),
            code: ErrorCode::StateSuspended,
        }
    }

    /// Create a not-found error for a review key.
    pub fn not_found(key: impl Into<String>) -> Self {
        let key = key.into();
        Self::NotFound {
            message: format!("no review record for '{}'", key),
            code: ErrorCode::ReviewNotFound,
            key: Some(key),
        }
    }

    /// Create a store-unavailable error from a message or an underlying error.
    pub fn store_unavailable(err: impl Into<Box<dyn std::error::Error + Send + Sync>>) -> Self {
        let source = err.into();
        Self::StoreUnavailable {
            message: source.to_string(),
            code: ErrorCode::StoreOperationFailed,
            source: Some(source),
        }
    }

    /// Create a store connection error.
    pub fn store_connection(message: impl Into<String>) -> Self {
        Self::StoreUnavailable {
            message: message.into(),
            code: ErrorCode::StoreConnectionFailed,
            source: None,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::InvalidInput { code, .. } => *code,
            Self::InvalidState { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::StoreUnavailable { code, .. } => *code,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether retrying the same call can succeed without caller changes.
    ///
    /// Only transient store failures qualify; the engine itself never retries.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::StoreUnavailable { .. } | Self::Io(_))
    }

    /// Get a user-friendly suggestion for resolving this error.
    pub fn suggestion(&self) -> Option<&str> {
        match self {
            Self::InvalidInput { .. } => {
                Some("Check the quality grade (0-5) and identifier format")
            }
            Self::InvalidState { .. } => {
                Some("Reactivate the suspended record before recording reviews")
            }
            Self::NotFound { .. } => Some("Check the user/content key and ensure a review exists"),
            Self::StoreUnavailable { .. } => {
                Some("Retry the request or check the review store backend")
            }
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_invalid_quality_error() {
        let err = RepriseError::invalid_quality(9);
        assert_eq!(err.code(), ErrorCode::InputInvalidQuality);
        assert!(err.to_string().contains("0-5"));
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_not_found_error() {
        let err = RepriseError::not_found("u1:FLASHCARD:card-9");
        assert_eq!(err.code(), ErrorCode::ReviewNotFound);
        assert!(err.suggestion().is_some());
    }

    #[test]
    fn test_store_unavailable_is_retryable() {
        let err = RepriseError::store_unavailable("connection reset");
        assert_eq!(err.code(), ErrorCode::StoreOperationFailed);
        assert!(err.is_retryable());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::InputInvalidQuality.as_str(), "INPUT_002");
        assert_eq!(ErrorCode::StateSuspended.as_str(), "STATE_001");
        assert_eq!(ErrorCode::ReviewNotFound.as_str(), "REV_001");
    }
}
