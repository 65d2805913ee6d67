//! Foundation types for pagedrop.
//!
//! Every other pagedrop crate depends on `pagedrop-types`.
//!
//! # Key Types
//!
//! - [`Identifier`] -- Short opaque name of a stored payload
//! - [`ContentBlob`] -- An identifier together with its full text payload
//! - [`Chunk`] -- One bounded-size slice of a payload, ordered by sequence index

pub mod blob;
pub mod error;
pub mod identifier;

pub use blob::{Chunk, ContentBlob, chunk_count, join_chunks, split_into_chunks};
pub use error::TypeError;
pub use identifier::Identifier;
