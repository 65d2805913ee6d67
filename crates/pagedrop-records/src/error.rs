//! Error types for record operations.

use pagedrop_types::Identifier;
use thiserror::Error;

use crate::types::PageId;

/// Errors that can occur during record operations.
#[derive(Debug, Error)]
pub enum RecordError {
    /// No active record has this page id.
    #[error("page not found: {0}")]
    NotFound(PageId),

    /// An active record already points at this identifier.
    #[error("identifier already in use: {0}")]
    DuplicateIdentifier(Identifier),

    /// A field value is not acceptable.
    #[error("invalid {field}: {reason}")]
    InvalidField { field: &'static str, reason: String },

    /// The record store could not be reached.
    #[error("record store unavailable: {0}")]
    Unavailable(String),
}

/// Convenience type alias for record operations.
pub type Result<T> = std::result::Result<T, RecordError>;
