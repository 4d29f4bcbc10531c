//! Error types for filer API operations.
//!
//! Errors are categorized so callers can tell transient transport failures
//! (worth retrying) from API rejections that will fail the same way again.

use thiserror::Error;

/// Categories of filer errors for retry logic.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCategory {
    /// Connection or session failure (transient, retryable)
    Transport,
    /// The addressed object does not exist
    NotFound,
    /// The object already exists
    Duplicate,
    /// The request was rejected because of its arguments or object state
    Invalid,
    /// Other/unknown errors
    Other,
}

impl ErrorCategory {
    /// Whether this error category is typically transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Transport)
    }

    /// Get a user-friendly description of this error category.
    pub fn description(&self) -> &'static str {
        match self {
            Self::Transport => "Filer connection issue",
            Self::NotFound => "Object not found",
            Self::Duplicate => "Object already exists",
            Self::Invalid => "Request rejected",
            Self::Other => "Unexpected error",
        }
    }
}

/// Errors that can occur while talking to a filer.
#[derive(Debug, Error)]
pub enum Error {
    /// The request never got an answer (connection, timeout, session)
    #[error("transport error: {message}")]
    Transport {
        /// Details of the failed exchange
        message: String,
    },

    /// The API answered with a failure status
    #[error("{api} failed (errno {errno}): {reason}")]
    Api {
        /// API name, e.g. `qtree-create`
        api: String,
        /// Vendor error number
        errno: u32,
        /// Reason text returned by the filer
        reason: String,
    },

    /// Object addressed by a call does not exist
    #[error("not found: {what}")]
    NotFound {
        /// Name or path of the missing object
        what: String,
    },

    /// Object being created already exists
    #[error("already exists: {what}")]
    Duplicate {
        /// Name or path of the existing object
        what: String,
    },

    /// Missing or malformed call arguments
    #[error("invalid arguments for {api}: {message}")]
    InvalidArgument {
        /// API name
        api: String,
        /// What was wrong
        message: String,
    },

    /// Response did not have the expected shape
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Unknown object kind name
    #[error("unknown object kind: {0}")]
    UnknownKind(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Other error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Get the error category for retry logic.
    pub fn category(&self) -> ErrorCategory {
        match self {
            Error::Transport { .. } | Error::Io(_) => ErrorCategory::Transport,
            Error::NotFound { .. } => ErrorCategory::NotFound,
            Error::Duplicate { .. } => ErrorCategory::Duplicate,
            Error::Api { .. } | Error::InvalidArgument { .. } => ErrorCategory::Invalid,
            _ => ErrorCategory::Other,
        }
    }

    /// Whether this error is typically transient and worth retrying.
    pub fn is_retryable(&self) -> bool {
        self.category().is_retryable()
    }
}

/// Result type for filer operations.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_category_retryable() {
        assert!(ErrorCategory::Transport.is_retryable());
        assert!(!ErrorCategory::NotFound.is_retryable());
        assert!(!ErrorCategory::Duplicate.is_retryable());
    }

    #[test]
    fn test_error_categories() {
        let err = Error::Transport {
            message: "connection reset".to_string(),
        };
        assert!(err.is_retryable());

        let err = Error::Api {
            api: "qtree-delete".to_string(),
            errno: 13040,
            reason: "qtree not empty".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Invalid);
        assert!(!err.is_retryable());

        let err = Error::Duplicate {
            what: "/vol/vol1/q1".to_string(),
        };
        assert_eq!(err.category(), ErrorCategory::Duplicate);
    }

    #[test]
    fn test_api_error_message() {
        let err = Error::Api {
            api: "volume-destroy".to_string(),
            errno: 13001,
            reason: "volume has qtrees".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "volume-destroy failed (errno 13001): volume has qtrees"
        );
    }
}
