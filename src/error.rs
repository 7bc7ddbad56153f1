use chrono::{DateTime, Utc};
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    /// Malformed query, pagination, or filter input; the caller must fix the
    /// request rather than retry it
    #[error("Validation error: {0}")]
    Validation(String),

    /// The caller's role lacks access to an explicitly requested scope
    #[error("Authorization error: {0}")]
    Authorization(String),

    /// Resource absent, or owned by another identity (indistinguishable)
    #[error("Not found: {0}")]
    NotFound(String),

    /// Sliding-window rate limit exceeded; retry after `reset_at`
    #[error("Rate limit exceeded, retry after {reset_at}")]
    RateLimited { reset_at: DateTime<Utc> },

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Index or store failure; the caller may retry with backoff
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// HTTP-equivalent status for transport layers
    pub fn http_status(&self) -> u16 {
        match self {
            AppError::Validation(_) => 400,
            AppError::Authorization(_) => 403,
            AppError::NotFound(_) => 404,
            AppError::RateLimited { .. } => 429,
            AppError::Configuration(_) => 500,
            AppError::Internal(_) => 500,
        }
    }

    /// Get error code string
    pub fn error_code(&self) -> &str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::Authorization(_) => "AUTHORIZATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::RateLimited { .. } => "RATE_LIMIT_EXCEEDED",
            AppError::Configuration(_) => "CONFIGURATION_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }

    /// Whether the caller may retry the same request unchanged
    pub fn is_retryable(&self) -> bool {
        matches!(self, AppError::RateLimited { .. } | AppError::Internal(_))
    }
}

/// Conversion from validator::ValidationErrors
impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::Validation(err.to_string())
    }
}

/// Conversion from config::ConfigError
impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration(err.to_string())
    }
}

/// Conversion from serde_json::Error
impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}

/// Result type alias
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_status_codes() {
        assert_eq!(AppError::Validation("test".to_string()).http_status(), 400);
        assert_eq!(AppError::NotFound("test".to_string()).http_status(), 404);
        assert_eq!(
            AppError::RateLimited { reset_at: Utc::now() }.http_status(),
            429
        );
        assert_eq!(AppError::Internal("test".to_string()).http_status(), 500);
    }

    #[test]
    fn test_error_codes() {
        assert_eq!(
            AppError::Validation("test".to_string()).error_code(),
            "VALIDATION_ERROR"
        );
        assert_eq!(
            AppError::Authorization("test".to_string()).error_code(),
            "AUTHORIZATION_ERROR"
        );
        assert_eq!(
            AppError::RateLimited { reset_at: Utc::now() }.error_code(),
            "RATE_LIMIT_EXCEEDED"
        );
    }

    #[test]
    fn test_retryability() {
        assert!(AppError::Internal("index down".to_string()).is_retryable());
        assert!(AppError::RateLimited { reset_at: Utc::now() }.is_retryable());
        assert!(!AppError::Validation("bad query".to_string()).is_retryable());
        assert!(!AppError::NotFound("gone".to_string()).is_retryable());
    }
}
