use thiserror::Error;

/// Errors produced by type operations.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypeError {
    #[error("identifier must not be empty")]
    EmptyIdentifier,

    #[error("identifier too long: {len} bytes (max {max})")]
    IdentifierTooLong { len: usize, max: usize },

    #[error("invalid character {ch:?} in identifier {value:?}")]
    InvalidIdentifierChar { value: String, ch: char },

    #[error("chunk size must be at least 1")]
    ZeroChunkSize,

    #[error("chunk sequence gap: expected index {expected}, got {actual}")]
    SequenceGap { expected: u32, actual: u32 },
}
