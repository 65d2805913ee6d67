//! Identifier derivation for pagedrop.
//!
//! Identifiers are MD5 digests, hex-encoded and truncated to
//! [`IDENTIFIER_LEN`] characters. Content- and title-derived identifiers share
//! one digest, so either kind can be used as the lookup key for a page, and
//! both agree with the identifiers already issued to existing pages.
//!
//! Lengths are measured in UTF-16 code units, the unit those identifiers
//! were computed with.
//!
//! All functions here are pure apart from [`derive_from_content`], which
//! reads the wall clock.

pub mod derive;
pub mod hasher;

pub use derive::{
    CONTENT_PREFIX_LEN, IDENTIFIER_LEN, derive_from_content, derive_from_content_at,
    derive_from_title,
};
pub use hasher::ContentHasher;
