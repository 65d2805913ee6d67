//! In-memory record store for testing and ephemeral use.
//!
//! [`InMemoryRecordStore`] keeps all records in a `HashMap` protected by a
//! `RwLock`. Data is lost when the store is dropped.

use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use chrono::Utc;

use crate::error::{RecordError, Result};
use crate::traits::RecordStore;
use crate::types::{DeleteMode, NewPage, PageId, PageRecord, PageUpdate, RecordField};

/// An in-memory implementation of [`RecordStore`].
#[derive(Debug, Default)]
pub struct InMemoryRecordStore {
    records: RwLock<HashMap<PageId, PageRecord>>,
}

impl InMemoryRecordStore {
    /// Create a new empty record store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a fully formed record, e.g. one imported from another store.
    pub fn insert(&self, record: PageRecord) -> Result<()> {
        let mut records = self.records.write().map_err(poisoned)?;
        records.insert(record.page_id.clone(), record);
        Ok(())
    }
}

fn poisoned(e: impl std::fmt::Display) -> RecordError {
    RecordError::Unavailable(format!("lock poisoned: {e}"))
}

fn validate_title(title: &str) -> Result<()> {
    if title.trim().is_empty() {
        return Err(RecordError::InvalidField {
            field: "title",
            reason: "must not be empty".into(),
        });
    }
    Ok(())
}

#[async_trait]
impl RecordStore for InMemoryRecordStore {
    async fn create(&self, page: NewPage) -> Result<PageRecord> {
        validate_title(&page.title)?;

        let mut records = self.records.write().map_err(poisoned)?;
        if records
            .values()
            .any(|r| !r.archived && r.identifier == page.identifier)
        {
            return Err(RecordError::DuplicateIdentifier(page.identifier));
        }

        let record = PageRecord {
            page_id: PageId::generate(),
            title: page.title,
            description: page.description,
            identifier: page.identifier,
            share_url: page.share_url,
            created_at: Utc::now(),
            sort_order: page.sort_order,
            archived: false,
        };
        records.insert(record.page_id.clone(), record.clone());
        tracing::debug!(page_id = %record.page_id, identifier = %record.identifier, "created page record");
        Ok(record)
    }

    async fn get(&self, page_id: &PageId) -> Result<Option<PageRecord>> {
        let records = self.records.read().map_err(poisoned)?;
        Ok(records.get(page_id).filter(|r| !r.archived).cloned())
    }

    async fn query_by_field(&self, field: &RecordField) -> Result<Vec<PageRecord>> {
        let records = self.records.read().map_err(poisoned)?;
        let mut found: Vec<PageRecord> = records
            .values()
            .filter(|r| !r.archived && field.matches(r))
            .cloned()
            .collect();
        found.sort_by(|a, b| a.page_id.cmp(&b.page_id));
        Ok(found)
    }

    async fn list(&self) -> Result<Vec<PageRecord>> {
        let records = self.records.read().map_err(poisoned)?;
        let mut active: Vec<PageRecord> =
            records.values().filter(|r| !r.archived).cloned().collect();
        active.sort_by(|a, b| {
            a.sort_order
                .cmp(&b.sort_order)
                .then_with(|| b.created_at.cmp(&a.created_at))
                .then_with(|| b.page_id.cmp(&a.page_id))
        });
        Ok(active)
    }

    async fn update(&self, page_id: &PageId, update: PageUpdate) -> Result<PageRecord> {
        if let Some(title) = &update.title {
            validate_title(title)?;
        }
        let mut records = self.records.write().map_err(poisoned)?;
        let record = records
            .get_mut(page_id)
            .filter(|r| !r.archived)
            .ok_or_else(|| RecordError::NotFound(page_id.clone()))?;
        update.apply(record);
        Ok(record.clone())
    }

    async fn archive_or_delete(&self, page_id: &PageId, mode: DeleteMode) -> Result<bool> {
        let mut records = self.records.write().map_err(poisoned)?;
        let active = records.get(page_id).is_some_and(|r| !r.archived);
        if !active {
            return Ok(false);
        }
        match mode {
            DeleteMode::Archive => {
                if let Some(record) = records.get_mut(page_id) {
                    record.archived = true;
                }
            }
            DeleteMode::Purge => {
                records.remove(page_id);
            }
        }
        tracing::debug!(%page_id, ?mode, "removed page record");
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};
    use pagedrop_types::Identifier;

    fn new_page(title: &str, id: &str) -> NewPage {
        NewPage {
            title: title.into(),
            description: String::new(),
            identifier: Identifier::new(id).unwrap(),
            share_url: format!("http://localhost:3000/view/{id}"),
            sort_order: 0,
        }
    }

    #[tokio::test]
    async fn create_and_get() {
        let store = InMemoryRecordStore::new();
        let record = store.create(new_page("Home", "aaaa1111")).await.unwrap();
        assert!(!record.archived);
        let fetched = store.get(&record.page_id).await.unwrap().unwrap();
        assert_eq!(fetched, record);
        assert!(store.get(&PageId::new("missing")).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn create_rejects_blank_title() {
        let store = InMemoryRecordStore::new();
        let err = store.create(new_page("  ", "aaaa1111")).await.unwrap_err();
        assert!(matches!(err, RecordError::InvalidField { field: "title", .. }));
    }

    #[tokio::test]
    async fn identifier_is_unique_among_active_records() {
        let store = InMemoryRecordStore::new();
        let first = store.create(new_page("One", "dup00000")).await.unwrap();
        let err = store.create(new_page("Two", "dup00000")).await.unwrap_err();
        assert!(matches!(err, RecordError::DuplicateIdentifier(_)));

        store
            .archive_or_delete(&first.page_id, DeleteMode::Archive)
            .await
            .unwrap();
        store.create(new_page("Two", "dup00000")).await.unwrap();
    }

    #[tokio::test]
    async fn query_by_identifier_and_title() {
        let store = InMemoryRecordStore::new();
        store.create(new_page("Alpha", "a0000000")).await.unwrap();
        store.create(new_page("Beta", "b0000000")).await.unwrap();

        let id = Identifier::new("b0000000").unwrap();
        let hits = store
            .query_by_field(&RecordField::Identifier(id.clone()))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].title, "Beta");
        assert_eq!(store.find_by_identifier(&id).await.unwrap().unwrap().title, "Beta");

        let hits = store
            .query_by_field(&RecordField::Title("Alpha".into()))
            .await
            .unwrap();
        assert_eq!(hits.len(), 1);
    }

    #[tokio::test]
    async fn list_orders_by_sort_order_then_newest() {
        let store = InMemoryRecordStore::new();
        let base = DateTime::from_timestamp(1_700_000_000, 0).unwrap();
        for (n, (title, order, age)) in [("old", 0, 10), ("new", 0, 1), ("pinned", -1, 100)]
            .into_iter()
            .enumerate()
        {
            store
                .insert(PageRecord {
                    page_id: PageId::new(format!("p{n}")),
                    title: title.into(),
                    description: String::new(),
                    identifier: Identifier::new(format!("id{n}")).unwrap(),
                    share_url: String::new(),
                    created_at: base - Duration::seconds(age),
                    sort_order: order,
                    archived: false,
                })
                .unwrap();
        }
        let titles: Vec<String> = store
            .list()
            .await
            .unwrap()
            .into_iter()
            .map(|r| r.title)
            .collect();
        assert_eq!(titles, vec!["pinned", "new", "old"]);
    }

    #[tokio::test]
    async fn update_changes_fields() {
        let store = InMemoryRecordStore::new();
        let record = store.create(new_page("Draft", "c0000000")).await.unwrap();
        let updated = store
            .update(
                &record.page_id,
                PageUpdate {
                    title: Some("Final".into()),
                    sort_order: Some(5),
                    ..PageUpdate::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.title, "Final");
        assert_eq!(updated.sort_order, 5);
        assert_eq!(updated.identifier, record.identifier);

        let err = store
            .update(&PageId::new("missing"), PageUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));
    }

    #[tokio::test]
    async fn archive_hides_record() {
        let store = InMemoryRecordStore::new();
        let record = store.create(new_page("Gone", "d0000000")).await.unwrap();
        assert!(store
            .archive_or_delete(&record.page_id, DeleteMode::Archive)
            .await
            .unwrap());
        assert!(store.get(&record.page_id).await.unwrap().is_none());
        assert!(store.list().await.unwrap().is_empty());
        assert!(!store
            .archive_or_delete(&record.page_id, DeleteMode::Archive)
            .await
            .unwrap());
        let err = store
            .update(&record.page_id, PageUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, RecordError::NotFound(_)));
    }

    #[tokio::test]
    async fn purge_removes_record() {
        let store = InMemoryRecordStore::new();
        let record = store.create(new_page("Gone", "e0000000")).await.unwrap();
        assert!(store
            .archive_or_delete(&record.page_id, DeleteMode::Purge)
            .await
            .unwrap());
        assert!(!store
            .archive_or_delete(&record.page_id, DeleteMode::Purge)
            .await
            .unwrap());
    }
}
