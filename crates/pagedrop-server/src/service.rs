use std::sync::Arc;

use pagedrop_crypto::{derive_from_content, derive_from_title};
use pagedrop_records::{
    DeleteMode, NewPage, PageId, PageRecord, PageUpdate, RecordError, RecordField, RecordStore,
};
use pagedrop_store::ContentStore;
use pagedrop_types::Identifier;
use serde::Deserialize;
use tracing::{debug, info, warn};

use crate::config::ServerConfig;
use crate::error::{ServerError, ServerResult};

/// Body of a deploy request.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployRequest {
    pub title: String,
    pub html_content: String,
    #[serde(default)]
    pub description: Option<String>,
}

/// Page operations over one content store and one record store.
///
/// Both stores are built once at startup and shared by every request.
pub struct PageService {
    content: Arc<dyn ContentStore>,
    records: Arc<dyn RecordStore>,
    config: ServerConfig,
}

impl PageService {
    pub fn new(
        content: Arc<dyn ContentStore>,
        records: Arc<dyn RecordStore>,
        config: ServerConfig,
    ) -> Self {
        Self {
            content,
            records,
            config,
        }
    }

    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    pub fn content(&self) -> &Arc<dyn ContentStore> {
        &self.content
    }

    /// Store the HTML under a derived identifier and create its record.
    pub async fn deploy(&self, request: DeployRequest) -> ServerResult<PageRecord> {
        let title = request.title.trim();
        if title.is_empty() || request.html_content.is_empty() {
            return Err(ServerError::BadRequest(
                "title and htmlContent must not be empty".into(),
            ));
        }

        let identifier = derive_from_content(&request.html_content);
        if self.records.find_by_identifier(&identifier).await?.is_some() {
            return Err(ServerError::Conflict(format!(
                "a page with identifier {identifier} is already deployed"
            )));
        }

        self.content
            .store(&identifier, &request.html_content)
            .await?;

        let page = NewPage {
            title: title.to_string(),
            description: request.description.unwrap_or_default(),
            identifier: identifier.clone(),
            share_url: self.config.share_url(&identifier),
            sort_order: 0,
        };
        match self.records.create(page).await {
            Ok(record) => {
                info!(page_id = %record.page_id, %identifier, "deployed page");
                Ok(record)
            }
            Err(RecordError::DuplicateIdentifier(id)) => Err(ServerError::Conflict(format!(
                "a page with identifier {id} is already deployed"
            ))),
            Err(err) => {
                if let Err(cleanup) = self.content.remove(&identifier).await {
                    warn!(%identifier, error = %cleanup, "could not remove orphaned content");
                }
                Err(err.into())
            }
        }
    }

    pub async fn list(&self) -> ServerResult<Vec<PageRecord>> {
        Ok(self.records.list().await?)
    }

    pub async fn get(&self, page_id: &PageId) -> ServerResult<PageRecord> {
        self.records
            .get(page_id)
            .await?
            .ok_or_else(|| ServerError::PageNotFound(page_id.to_string()))
    }

    pub async fn update(&self, page_id: &PageId, update: PageUpdate) -> ServerResult<PageRecord> {
        if update.is_empty() {
            return self.get(page_id).await;
        }
        match self.records.update(page_id, update).await {
            Ok(record) => Ok(record),
            Err(RecordError::NotFound(_)) => Err(ServerError::PageNotFound(page_id.to_string())),
            Err(err) => Err(err.into()),
        }
    }

    /// Remove a page's content, then archive or purge its record.
    pub async fn delete(&self, page_id: &PageId) -> ServerResult<()> {
        let record = self.get(page_id).await?;
        if !self.content.remove(&record.identifier).await? {
            warn!(%page_id, identifier = %record.identifier, "page had no stored content");
        }
        self.records
            .archive_or_delete(page_id, self.config.delete_mode)
            .await?;
        info!(%page_id, mode = ?self.config.delete_mode, "deleted page");
        Ok(())
    }

    /// Resolve a view key to stored HTML.
    ///
    /// The key is tried as an identifier first, then as a title: hashed
    /// into a title-derived identifier, and finally matched against record
    /// titles.
    pub async fn view(&self, key: &str) -> ServerResult<String> {
        if let Ok(id) = Identifier::new(key) {
            if let Some(html) = self.content.retrieve(&id).await? {
                return Ok(html);
            }
        }

        let alias = derive_from_title(key);
        if let Some(html) = self.content.retrieve(&alias).await? {
            debug!(key, %alias, "resolved view key as title hash");
            return Ok(html);
        }

        let by_title = self
            .records
            .query_by_field(&RecordField::Title(key.to_string()))
            .await?;
        for record in by_title {
            if let Some(html) = self.content.retrieve(&record.identifier).await? {
                debug!(key, identifier = %record.identifier, "resolved view key as page title");
                return Ok(html);
            }
        }

        Err(ServerError::ContentNotFound(key.to_string()))
    }

    pub fn delete_mode(&self) -> DeleteMode {
        self.config.delete_mode
    }
}
