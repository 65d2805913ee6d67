//! Core record types.
//!
//! Serialized field names follow the external table layout (`html_hash` for
//! the identifier, snake_case elsewhere). [`RecordField::column_name`] is the
//! only other place those names appear.

use std::fmt;

use chrono::{DateTime, Utc};
use pagedrop_types::Identifier;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Opaque primary key of a page record (a UUID v7 string).
#[derive(Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PageId(String);

impl PageId {
    /// Generate a fresh, time-ordered page id.
    pub fn generate() -> Self {
        Self(Uuid::now_v7().to_string())
    }

    /// Wrap an existing page id string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Debug for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PageId({})", self.0)
    }
}

impl fmt::Display for PageId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Metadata for one deployed page.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRecord {
    pub page_id: PageId,
    pub title: String,
    pub description: String,
    /// Identifier the HTML payload is stored under.
    #[serde(rename = "html_hash")]
    pub identifier: Identifier,
    pub share_url: String,
    pub created_at: DateTime<Utc>,
    /// List position; lower sorts first.
    pub sort_order: i64,
    /// Archived records are kept but hidden from listings and queries.
    #[serde(default)]
    pub archived: bool,
}

/// Fields supplied when creating a record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewPage {
    pub title: String,
    pub description: String,
    pub identifier: Identifier,
    pub share_url: String,
    pub sort_order: i64,
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub sort_order: Option<i64>,
}

impl PageUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.sort_order.is_none()
    }

    pub(crate) fn apply(self, record: &mut PageRecord) {
        if let Some(title) = self.title {
            record.title = title;
        }
        if let Some(description) = self.description {
            record.description = description;
        }
        if let Some(sort_order) = self.sort_order {
            record.sort_order = sort_order;
        }
    }
}

/// A filter on one record field.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum RecordField {
    PageId(PageId),
    Title(String),
    Identifier(Identifier),
    ShareUrl(String),
}

impl RecordField {
    /// Column name of this field in the external record table.
    pub fn column_name(&self) -> &'static str {
        match self {
            Self::PageId(_) => "page_id",
            Self::Title(_) => "title",
            Self::Identifier(_) => "html_hash",
            Self::ShareUrl(_) => "share_url",
        }
    }

    /// Whether `record` carries this field value.
    pub fn matches(&self, record: &PageRecord) -> bool {
        match self {
            Self::PageId(id) => record.page_id == *id,
            Self::Title(title) => record.title == *title,
            Self::Identifier(id) => record.identifier == *id,
            Self::ShareUrl(url) => record.share_url == *url,
        }
    }
}

/// How `archive_or_delete` disposes of a record.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum DeleteMode {
    /// Keep the record but mark it archived.
    #[default]
    Archive,
    /// Remove the record entirely.
    Purge,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record() -> PageRecord {
        PageRecord {
            page_id: PageId::new("p1"),
            title: "测试5".into(),
            description: "long page".into(),
            identifier: Identifier::new("abc123").unwrap(),
            share_url: "http://localhost:3000/view/abc123".into(),
            created_at: DateTime::from_timestamp(1_700_000_000, 0).unwrap(),
            sort_order: 0,
            archived: false,
        }
    }

    #[test]
    fn generated_page_ids_are_unique() {
        assert_ne!(PageId::generate(), PageId::generate());
        assert_eq!(PageId::generate().as_str().len(), 36);
    }

    #[test]
    fn record_serializes_with_column_names() {
        let json = serde_json::to_value(record()).unwrap();
        assert_eq!(json["html_hash"], "abc123");
        assert_eq!(json["page_id"], "p1");
        assert!(json.get("identifier").is_none());
    }

    #[test]
    fn field_column_names() {
        let r = record();
        let fields = [
            RecordField::PageId(r.page_id.clone()),
            RecordField::Title(r.title.clone()),
            RecordField::Identifier(r.identifier.clone()),
            RecordField::ShareUrl(r.share_url.clone()),
        ];
        let names: Vec<_> = fields.iter().map(RecordField::column_name).collect();
        assert_eq!(names, vec!["page_id", "title", "html_hash", "share_url"]);
        assert!(fields.iter().all(|f| f.matches(&r)));
        assert!(!RecordField::Title("other".into()).matches(&r));
    }

    #[test]
    fn update_applies_only_set_fields() {
        let mut r = record();
        let update = PageUpdate {
            sort_order: Some(7),
            ..PageUpdate::default()
        };
        assert!(!update.is_empty());
        update.apply(&mut r);
        assert_eq!(r.sort_order, 7);
        assert_eq!(r.title, "测试5");
        assert!(PageUpdate::default().is_empty());
    }

    #[test]
    fn update_parses_camel_case() {
        let update: PageUpdate =
            serde_json::from_str(r#"{"title":"New","sortOrder":3}"#).unwrap();
        assert_eq!(update.title.as_deref(), Some("New"));
        assert_eq!(update.sort_order, Some(3));
        assert!(update.description.is_none());
    }

    #[test]
    fn delete_mode_serde() {
        assert_eq!(serde_json::to_string(&DeleteMode::Purge).unwrap(), "\"purge\"");
        assert_eq!(DeleteMode::default(), DeleteMode::Archive);
    }
}
