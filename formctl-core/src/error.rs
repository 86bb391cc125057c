/// Structured error types for formctl-core library.
///
/// Uses `thiserror` for better API surface and error composition.
/// Binary crates (formctl-cli) can still use `anyhow` for convenience,
/// but library consumers get structured, composable errors.
use thiserror::Error;

/// Main error type for formctl-core operations
#[derive(Error, Debug)]
pub enum FormError {
    /// Remote feed request failed (network error or non-OK HTTP status)
    #[error("Feed fetch failed: {reason}")]
    Fetch { reason: String },

    /// Feed payload was malformed or carried an explicit error
    #[error("Feed payload rejected: {reason}")]
    Payload { reason: String },

    /// JSON parsing or serialization failed
    #[error("JSON error at {context}: {source}")]
    Json {
        context: String,
        source: serde_json::Error,
    },

    /// Invalid date string (expected YYYY-MM-DD)
    #[error("Invalid date '{value}': {reason}")]
    InvalidDate { value: String, reason: String },

    /// Configuration error
    #[error("Configuration error: {reason}")]
    Config { reason: String },
}

/// Result type alias for formctl-core operations
pub type Result<T> = std::result::Result<T, FormError>;

impl FormError {
    /// Create a fetch error
    pub fn fetch(reason: impl Into<String>) -> Self {
        Self::Fetch {
            reason: reason.into(),
        }
    }

    /// Create a payload error
    pub fn payload(reason: impl Into<String>) -> Self {
        Self::Payload {
            reason: reason.into(),
        }
    }

    /// Create a JSON error with context
    pub fn json(context: impl Into<String>, source: serde_json::Error) -> Self {
        Self::Json {
            context: context.into(),
            source,
        }
    }

    /// Create an invalid date error
    pub fn invalid_date(value: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidDate {
            value: value.into(),
            reason: reason.into(),
        }
    }

    /// Create a config error
    pub fn config(reason: impl Into<String>) -> Self {
        Self::Config {
            reason: reason.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = FormError::fetch("connection refused");
        assert_eq!(err.to_string(), "Feed fetch failed: connection refused");

        let err = FormError::invalid_date("2025-13-40", "month out of range");
        assert!(err.to_string().contains("2025-13-40"));
        assert!(err.to_string().contains("month out of range"));
    }

    #[test]
    fn test_payload_error() {
        let err = FormError::payload("status was \"error\"");
        assert!(matches!(err, FormError::Payload { .. }));
    }
}
