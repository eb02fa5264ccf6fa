//! Error types for the catalogue crate.

use thiserror::Error;

/// Result type alias for catalogue operations.
pub type Result<T> = std::result::Result<T, CatalogError>;

/// Errors that can occur while ingesting, indexing or grouping items.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// A feed record is missing a required field or carries an unusable value
    #[error("Malformed item at index {index}: {reason}")]
    MalformedItem {
        /// Position of the record in the feed payload
        index: usize,
        /// What was wrong with it
        reason: String,
    },

    /// An item with an empty name reached the grouper
    #[error("Item at position {position} has an empty name and cannot be grouped")]
    EmptyName {
        /// Position of the item in the sequence passed to the grouper
        position: usize,
    },

    /// Index options failed validation
    #[error("Invalid index options: {0}")]
    InvalidOptions(String),

    /// JSON parsing error
    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),
}

/// Error code for programmatic handling by embedding hosts.
/// Range: 12xxx for catalogue errors.
#[repr(u32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogErrorCode {
    /// Malformed feed record
    MalformedItem = 12001,
    /// Empty item name during grouping
    EmptyName = 12002,
    /// Invalid index options
    InvalidOptions = 12003,
    /// JSON parsing error
    JsonParsing = 12004,
}

impl CatalogError {
    /// Creates a malformed item error.
    pub fn malformed(index: usize, reason: impl Into<String>) -> Self {
        Self::MalformedItem {
            index,
            reason: reason.into(),
        }
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> CatalogErrorCode {
        match self {
            CatalogError::MalformedItem { .. } => CatalogErrorCode::MalformedItem,
            CatalogError::EmptyName { .. } => CatalogErrorCode::EmptyName,
            CatalogError::InvalidOptions(_) => CatalogErrorCode::InvalidOptions,
            CatalogError::JsonError(_) => CatalogErrorCode::JsonParsing,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_codes() {
        assert_eq!(
            CatalogError::malformed(3, "missing `item`").code(),
            CatalogErrorCode::MalformedItem
        );
        assert_eq!(
            CatalogError::EmptyName { position: 0 }.code(),
            CatalogErrorCode::EmptyName
        );
        assert_eq!(CatalogErrorCode::InvalidOptions as u32, 12003);
    }

    #[test]
    fn test_display_mentions_position() {
        let err = CatalogError::malformed(7, "missing `bins`");
        assert_eq!(err.to_string(), "Malformed item at index 7: missing `bins`");
    }
}
