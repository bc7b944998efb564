//! Error types for the search crate.
//!
//! Searching itself never fails; these errors only surface while loading
//! catalogs or building a custom keyword dictionary.

use thiserror::Error;

/// Result type alias for search operations.
pub type Result<T> = std::result::Result<T, SearchError>;

/// Errors that can occur at the search crate's ingestion boundaries.
#[derive(Debug, Error)]
pub enum SearchError {
    /// Catalog document has an unexpected shape
    #[error("Invalid catalog: {0}")]
    InvalidCatalog(String),

    /// Keyword dictionary entry failed validation
    #[error("Invalid keyword '{keyword}': {reason}")]
    InvalidKeyword {
        /// The offending keyword as supplied
        keyword: String,
        /// Why it was rejected
        reason: String,
    },

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Error code for integration with the app's error reporting.
/// Range: 11xxx for search errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchErrorCode {
    /// Catalog document has an unexpected shape
    InvalidCatalog = 11001,
    /// Keyword dictionary entry failed validation
    InvalidKeyword = 11002,
    /// JSON parsing error
    JsonParsing = 11003,
}

impl SearchError {
    /// Returns the error code for this error.
    pub fn code(&self) -> SearchErrorCode {
        match self {
            SearchError::InvalidCatalog(_) => SearchErrorCode::InvalidCatalog,
            SearchError::InvalidKeyword { .. } => SearchErrorCode::InvalidKeyword,
            SearchError::Json(_) => SearchErrorCode::JsonParsing,
        }
    }

    pub(crate) fn invalid_keyword(keyword: impl Into<String>, reason: impl Into<String>) -> Self {
        SearchError::InvalidKeyword {
            keyword: keyword.into(),
            reason: reason.into(),
        }
    }
}
