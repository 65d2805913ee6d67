//! Content storage for pagedrop.
//!
//! This crate stores HTML payloads of any length under short identifiers,
//! on media that cap the size of each stored unit.
//!
//! # Backends
//!
//! All backends implement the [`ContentStore`] trait:
//!
//! - [`ChunkedContentStore`] -- splits payloads into `max_unit`-char chunks
//!   behind a sentinel marker, on any [`BlockMedium`]:
//!   - [`InMemoryMedium`] -- `HashMap`-based, for tests and ephemeral use
//!   - [`FsMedium`] -- JSON-lines container files
//! - [`FsContentStore`] -- one file per payload, no chunking
//!
//! [`open_store`] builds the one backend named by a [`StorageConfig`].
//!
//! # Design Rules
//!
//! 1. Round trip is exact: no trimming, re-encoding or re-sorting.
//! 2. Payloads are immutable once written.
//! 3. Each chunked write issues exactly one batched append.
//! 4. "Absent" is `Ok(None)`; a backend failure is always an `Err`.
//! 5. A failed append is reported, and its container removed best-effort.

pub mod chunked;
pub mod config;
pub mod error;
pub mod fs;
pub mod medium;
pub mod traits;

pub use chunked::ChunkedContentStore;
pub use config::{
    ChunkConfig, DEFAULT_MARKER_LABEL, DEFAULT_MAX_UNIT, StorageConfig, open_store,
};
pub use error::{StoreError, StoreResult};
pub use fs::FsContentStore;
pub use medium::{BlockMedium, Container, FsMedium, InMemoryMedium, MediumError, Unit};
pub use traits::{ContentStore, PayloadInfo};
