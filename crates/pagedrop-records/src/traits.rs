//! The [`RecordStore`] trait defining the page metadata interface.
//!
//! Any backend (in-memory, document database, relational table) implements
//! this trait; handlers only ever see [`PageRecord`]s.

use async_trait::async_trait;
use pagedrop_types::Identifier;

use crate::error::Result;
use crate::types::{DeleteMode, NewPage, PageId, PageRecord, PageUpdate, RecordField};

/// Storage backend for page records.
///
/// Archived records are invisible to `get`, `query_by_field`, `list` and
/// `update`. At most one active record may point at a given identifier.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Create a record, assigning its page id and creation time.
    async fn create(&self, page: NewPage) -> Result<PageRecord>;

    /// Read an active record by page id.
    ///
    /// Returns `Ok(None)` if there is none.
    async fn get(&self, page_id: &PageId) -> Result<Option<PageRecord>>;

    /// All active records whose field equals the given value.
    async fn query_by_field(&self, field: &RecordField) -> Result<Vec<PageRecord>>;

    /// All active records, by `sort_order` ascending then newest first.
    async fn list(&self) -> Result<Vec<PageRecord>>;

    /// Apply a partial update and return the updated record.
    async fn update(&self, page_id: &PageId, update: PageUpdate) -> Result<PageRecord>;

    /// Archive or purge a record. Returns `true` if an active record existed.
    async fn archive_or_delete(&self, page_id: &PageId, mode: DeleteMode) -> Result<bool>;

    /// Look up the active record for a stored identifier.
    async fn find_by_identifier(&self, identifier: &Identifier) -> Result<Option<PageRecord>> {
        let mut found = self
            .query_by_field(&RecordField::Identifier(identifier.clone()))
            .await?;
        Ok(found.pop())
    }
}
