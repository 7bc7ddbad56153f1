//! Error types for search operations

use crate::error::AppError;

/// Errors that can occur while validating or executing a search
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Query text or pagination outside allowed bounds
    #[error("invalid query: {0}")]
    InvalidQuery(String),

    /// Unknown entity type requested
    #[error("unknown entity type: {0}")]
    UnknownEntityType(String),

    /// Unknown status value in a filter
    #[error("unknown status: {0}")]
    UnknownStatus(String),

    /// Unknown asset type value in a filter
    #[error("unknown asset type: {0}")]
    UnknownAssetType(String),

    /// Unknown sort field or order
    #[error("unknown sort: {0}")]
    UnknownSort(String),

    /// date_from is after date_to
    #[error("invalid date range: {0}")]
    InvalidDateRange(String),

    /// Index lookup failed
    #[error("index lookup failed: {0}")]
    IndexFailed(String),
}

impl From<SearchError> for AppError {
    fn from(err: SearchError) -> Self {
        match err {
            SearchError::IndexFailed(msg) => AppError::Internal(msg),
            other => AppError::Validation(other.to_string()),
        }
    }
}
