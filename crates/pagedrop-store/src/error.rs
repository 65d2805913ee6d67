use pagedrop_types::{Identifier, TypeError};

use crate::medium::MediumError;

/// Errors from content store operations.
///
/// A missing payload is not an error at the [`ContentStore`](crate::ContentStore)
/// seam: reads return `Ok(None)` and deletes return `Ok(false)`.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The backing medium could not be reached or returned an error.
    #[error("backend unavailable: {0}")]
    BackendUnavailable(String),

    /// The medium refused a write it was able to receive.
    #[error("write rejected: {0}")]
    Rejected(String),

    /// The batched chunk append failed after the container was created.
    #[error("partial write for {id}: {reason}")]
    PartialWrite { id: Identifier, reason: String },

    /// The marker declares more (or fewer) chunks than are stored.
    #[error("truncated payload for {id}: marker declares {expected} chunks, found {found}")]
    Truncated {
        id: Identifier,
        expected: u64,
        found: u64,
    },

    /// The identifier already holds a different payload.
    #[error("identifier {0} already holds different content")]
    AlreadyExists(Identifier),

    /// Invalid identifier or chunking parameters.
    #[error(transparent)]
    Type(#[from] TypeError),

    /// Store configuration is invalid.
    #[error("invalid storage configuration: {0}")]
    Config(String),

    /// Stored data could not be encoded or decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error from a filesystem-backed store.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl StoreError {
    /// Returns `true` if the error means the backend could not be asked,
    /// as opposed to the content being absent or malformed.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Self::BackendUnavailable(_) | Self::Io(_))
    }
}

impl From<MediumError> for StoreError {
    fn from(err: MediumError) -> Self {
        match err {
            MediumError::Unavailable(reason) => Self::BackendUnavailable(reason),
            MediumError::Io(e) => Self::Io(e),
            MediumError::Serialization(reason) => Self::Serialization(reason),
            rejected @ (MediumError::UnitTooLarge { .. } | MediumError::NoSuchContainer(_)) => {
                Self::Rejected(rejected.to_string())
            }
        }
    }
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
