//! Error types for lexis operations.
//!
//! Internal layers (storage backends, remote stores, the sync merger) return
//! [`LexisResult`]. The repository boundary converts these into the boolean
//! and empty-list signals callers see, logging whatever it absorbs.

use thiserror::Error;

/// Result type alias for lexis operations.
pub type LexisResult<T> = Result<T, LexisError>;

/// Main error type for all lexis operations.
#[derive(Error, Debug)]
pub enum LexisError {
    /// Input validation failed (empty word, negative interval, malformed event).
    #[error("Validation error: {message}")]
    Validation { message: String, code: ErrorCode },

    /// A record with this word already exists.
    #[error("Duplicate word: {word}")]
    DuplicateKey { word: String, code: ErrorCode },

    /// No record with this word exists.
    #[error("Word not found: {word}")]
    NotFound { word: String, code: ErrorCode },

    /// Local persistence failed.
    #[error("Storage error: {message}")]
    Storage {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Remote store could not be reached, is not configured, or returned garbage.
    #[error("Remote unavailable: {message}")]
    RemoteUnavailable {
        message: String,
        code: ErrorCode,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Remote revision marker was stale when pushing.
    #[error("Conflict on push: {message}")]
    ConflictOnPush { message: String, code: ErrorCode },

    /// Remote rejected the credentials.
    #[error("Authentication error: {message}")]
    Authentication { message: String, code: ErrorCode },

    /// A quiz action arrived in a session state that does not accept it.
    #[error("Invalid session transition: {action} while {state}")]
    InvalidTransition {
        action: String,
        state: String,
        code: ErrorCode,
    },

    /// A remote call exceeded its time budget.
    #[error("Timed out after {seconds}s: {operation}")]
    Timeout { operation: String, seconds: u64 },

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Parse error.
    #[error("Parse error: {message}")]
    Parse { message: String, code: ErrorCode },

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
    // Validation (VAL_xxx)
    ValInvalidInput,
    ValMissingField,
    ValInvalidFormat,

    // Vocabulary (VOC_xxx)
    VocNotFound,
    VocDuplicate,

    // Storage (STO_xxx)
    StoReadFailed,
    StoWriteFailed,

    // Remote (REM_xxx)
    RemNotConfigured,
    RemConnectionFailed,
    RemMalformedDocument,
    RemConflict,
    RemAuthFailed,

    // Network (NET_xxx)
    NetTimeout,

    // Session (SES_xxx)
    SesInvalidTransition,

    // Parse (PARSE_xxx)
    ParseInvalidJson,

    // Internal
    Internal,
}

impl ErrorCode {
    /// Get the string representation of the error code.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCode::ValInvalidInput => "VAL_001",
            ErrorCode::ValMissingField => "VAL_002",
            ErrorCode::ValInvalidFormat => "VAL_003",
            ErrorCode::VocNotFound => "VOC_001",
            ErrorCode::VocDuplicate => "VOC_002",
            ErrorCode::StoReadFailed => "STO_001",
            ErrorCode::StoWriteFailed => "STO_002",
            ErrorCode::RemNotConfigured => "REM_001",
            ErrorCode::RemConnectionFailed => "REM_002",
            ErrorCode::RemMalformedDocument => "REM_003",
            ErrorCode::RemConflict => "REM_004",
            ErrorCode::RemAuthFailed => "REM_005",
            ErrorCode::NetTimeout => "NET_001",
            ErrorCode::SesInvalidTransition => "SES_001",
            ErrorCode::ParseInvalidJson => "PARSE_001",
            ErrorCode::Internal => "INT_001",
        }
    }
}

impl LexisError {
    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
            code: ErrorCode::ValInvalidInput,
        }
    }

    /// Create a missing-field validation error.
    pub fn missing_field(field: &str) -> Self {
        Self::Validation {
            message: format!("'{}' must not be empty", field),
            code: ErrorCode::ValMissingField,
        }
    }

    /// Create a duplicate key error.
    pub fn duplicate(word: impl Into<String>) -> Self {
        Self::DuplicateKey {
            word: word.into(),
            code: ErrorCode::VocDuplicate,
        }
    }

    /// Create a not found error.
    pub fn not_found(word: impl Into<String>) -> Self {
        Self::NotFound {
            word: word.into(),
            code: ErrorCode::VocNotFound,
        }
    }

    /// Create a storage read error.
    pub fn storage_read(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoReadFailed,
            source: None,
        }
    }

    /// Create a storage write error.
    pub fn storage_write(message: impl Into<String>) -> Self {
        Self::Storage {
            message: message.into(),
            code: ErrorCode::StoWriteFailed,
            source: None,
        }
    }

    /// Create a remote error for a failed request.
    pub fn remote(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
            code: ErrorCode::RemConnectionFailed,
            source: None,
        }
    }

    /// Create a remote error for missing sync settings.
    pub fn remote_not_configured(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
            code: ErrorCode::RemNotConfigured,
            source: None,
        }
    }

    /// Create a remote error for a document that could not be decoded.
    pub fn remote_malformed(message: impl Into<String>) -> Self {
        Self::RemoteUnavailable {
            message: message.into(),
            code: ErrorCode::RemMalformedDocument,
            source: None,
        }
    }

    /// Create a push conflict error.
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::ConflictOnPush {
            message: message.into(),
            code: ErrorCode::RemConflict,
        }
    }

    /// Create an authentication error.
    pub fn authentication(message: impl Into<String>) -> Self {
        Self::Authentication {
            message: message.into(),
            code: ErrorCode::RemAuthFailed,
        }
    }

    /// Create a timeout error.
    pub fn timeout(operation: impl Into<String>, seconds: u64) -> Self {
        Self::Timeout {
            operation: operation.into(),
            seconds,
        }
    }

    /// Create an invalid session transition error.
    pub fn invalid_transition(action: impl Into<String>, state: impl Into<String>) -> Self {
        Self::InvalidTransition {
            action: action.into(),
            state: state.into(),
            code: ErrorCode::SesInvalidTransition,
        }
    }

    /// Create a parse error.
    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse {
            message: message.into(),
            code: ErrorCode::ParseInvalidJson,
        }
    }

    /// Get the error code.
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::Validation { code, .. } => *code,
            Self::DuplicateKey { code, .. } => *code,
            Self::NotFound { code, .. } => *code,
            Self::Storage { code, .. } => *code,
            Self::RemoteUnavailable { code, .. } => *code,
            Self::ConflictOnPush { code, .. } => *code,
            Self::Authentication { code, .. } => *code,
            Self::Parse { code, .. } => *code,
            Self::InvalidTransition { code, .. } => *code,
            Self::Timeout { .. } => ErrorCode::NetTimeout,
            Self::Serialization(_) => ErrorCode::ParseInvalidJson,
            _ => ErrorCode::Internal,
        }
    }

    /// Whether this error belongs to the remote-sync family.
    ///
    /// These never reach callers of local operations; they are logged and dropped.
    pub fn is_remote(&self) -> bool {
        matches!(
            self,
            Self::RemoteUnavailable { .. }
                | Self::ConflictOnPush { .. }
                | Self::Authentication { .. }
                | Self::Timeout { .. }
        )
    }

    /// Convert from an HTTP status code returned by a remote store.
    pub fn from_http_status(status: u16, body: &str) -> Self {
        match status {
            401 | 403 => Self::authentication(body.to_string()),
            404 => Self::remote(format!("Remote document not found: {}", body)),
            409 | 412 | 422 => Self::conflict(body.to_string()),
            _ => Self::remote(format!("HTTP {}: {}", status, body)),
        }
    }
}

impl From<rusqlite::Error> for LexisError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Storage {
            message: err.to_string(),
            code: ErrorCode::StoWriteFailed,
            source: Some(Box::new(err)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_duplicate_error() {
        let err = LexisError::duplicate("cat");
        assert_eq!(err.code(), ErrorCode::VocDuplicate);
        assert!(err.to_string().contains("cat"));
    }

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            LexisError::from_http_status(401, "bad credentials").code(),
            ErrorCode::RemAuthFailed
        );
        assert_eq!(
            LexisError::from_http_status(409, "sha mismatch").code(),
            ErrorCode::RemConflict
        );
        assert_eq!(
            LexisError::from_http_status(500, "boom").code(),
            ErrorCode::RemConnectionFailed
        );
    }

    #[test]
    fn test_remote_family() {
        assert!(LexisError::conflict("stale").is_remote());
        assert!(LexisError::timeout("fetch", 5).is_remote());
        assert!(!LexisError::not_found("cat").is_remote());
    }

    #[test]
    fn test_error_code_as_str() {
        assert_eq!(ErrorCode::VocNotFound.as_str(), "VOC_001");
        assert_eq!(ErrorCode::NetTimeout.as_str(), "NET_001");
    }
}
