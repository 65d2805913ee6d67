//! Block media: ordered, size-limited unit containers.
//!
//! A medium stores, per identifier, a container holding an ordered list of
//! [`Unit`]s and an optional legacy single-field payload. Media model
//! document databases that cap the length of any one stored text unit and
//! offer a batched multi-unit append, so a payload has to be spread over
//! several units.

pub mod fs;
pub mod memory;

use async_trait::async_trait;
use pagedrop_types::Identifier;
use serde::{Deserialize, Serialize};

pub use fs::FsMedium;
pub use memory::InMemoryMedium;

/// One stored unit inside a container.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum Unit {
    /// Free-form heading text.
    Label(String),
    /// Sentinel: payload chunks follow, `chunk_count` of them.
    Marker { label: String, chunk_count: u64 },
    /// One payload chunk.
    Chunk(String),
}

impl Unit {
    /// Length in chars of the text this unit puts on the medium.
    pub fn text_len(&self) -> usize {
        match self {
            Self::Label(text) | Self::Chunk(text) => text.chars().count(),
            Self::Marker { label, .. } => label.chars().count(),
        }
    }
}

/// Everything a medium holds for one identifier.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Container {
    /// Units in the order they were appended.
    pub units: Vec<Unit>,
    /// Payload written by the older single-field encoding, if any.
    pub legacy: Option<String>,
}

/// Errors raised by a block medium.
#[derive(Debug, thiserror::Error)]
pub enum MediumError {
    #[error("medium unavailable: {0}")]
    Unavailable(String),

    #[error("unit of {len} chars exceeds the medium limit of {limit}")]
    UnitTooLarge { len: usize, limit: usize },

    #[error("no such container: {0}")]
    NoSuchContainer(Identifier),

    #[error("serialization error: {0}")]
    Serialization(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result alias for medium operations.
pub type MediumResult<T> = Result<T, MediumError>;

/// A container store with a batched append primitive.
///
/// `append` is the only way units get written. It is not transactional: a
/// medium may fail after part of the batch has landed.
#[async_trait]
pub trait BlockMedium: Send + Sync {
    /// Ensure an (empty) container exists for `id`.
    async fn create(&self, id: &Identifier) -> MediumResult<()>;

    /// Append `units` to the end of an existing container, in order.
    async fn append(&self, id: &Identifier, units: Vec<Unit>) -> MediumResult<()>;

    /// Fetch the container for `id`, or `None` if there is none.
    async fn fetch(&self, id: &Identifier) -> MediumResult<Option<Container>>;

    /// Remove the container. Returns `true` if it existed.
    async fn remove(&self, id: &Identifier) -> MediumResult<bool>;

    /// Set the legacy single-field payload, creating the container if needed.
    async fn put_legacy(&self, id: &Identifier, text: &str) -> MediumResult<()>;
}

/// Check a batch against an optional per-unit limit.
pub(crate) fn check_unit_limit(units: &[Unit], limit: Option<usize>) -> MediumResult<()> {
    let Some(limit) = limit else {
        return Ok(());
    };
    match units.iter().map(Unit::text_len).find(|len| *len > limit) {
        Some(len) => Err(MediumError::UnitTooLarge { len, limit }),
        None => Ok(()),
    }
}
