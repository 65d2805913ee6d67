//! Page metadata records for pagedrop.
//!
//! A page record ties a human-facing title and description to the
//! [`Identifier`](pagedrop_types::Identifier) its HTML is stored under, plus
//! the public share URL, creation time and list position.
//!
//! # Modules
//!
//! - [`error`] -- Error types for record operations
//! - [`types`] -- [`PageRecord`], [`NewPage`], [`PageUpdate`], and the
//!   [`RecordField`] mapping to external column names
//! - [`traits`] -- The [`RecordStore`] trait
//! - [`memory`] -- In-memory [`InMemoryRecordStore`]

pub mod error;
pub mod memory;
pub mod traits;
pub mod types;

pub use error::{RecordError, Result};
pub use memory::InMemoryRecordStore;
pub use traits::RecordStore;
pub use types::{DeleteMode, NewPage, PageId, PageRecord, PageUpdate, RecordField};
