use std::io::{ErrorKind, Write};
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pagedrop_types::Identifier;
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::traits::ContentStore;

/// One HTML file per identifier: `{root}/{id}.html`.
///
/// No chunking; the filesystem has no unit size limit. Files are written to
/// a temporary file in the same directory and linked into place without
/// clobbering, so a reader never sees a half-written payload and a racing
/// writer cannot replace an existing one.
#[derive(Clone, Debug)]
pub struct FsContentStore {
    root: PathBuf,
}

impl FsContentStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn path_for(&self, id: &Identifier) -> PathBuf {
        self.root.join(format!("{id}.html"))
    }

    async fn read_path(path: &Path) -> StoreResult<Option<String>> {
        match tokio::fs::read_to_string(path).await {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// Write `payload` to `target` unless it already exists.
///
/// Returns `Ok(false)` if `target` was already present.
fn write_new(root: &Path, target: &Path, payload: &str) -> StoreResult<bool> {
    std::fs::create_dir_all(root)?;
    let mut tmp = tempfile::NamedTempFile::new_in(root)?;
    tmp.write_all(payload.as_bytes())?;
    tmp.as_file().sync_data()?;
    match tmp.persist_noclobber(target) {
        Ok(_) => Ok(true),
        Err(e) if e.error.kind() == ErrorKind::AlreadyExists => Ok(false),
        Err(e) => Err(e.error.into()),
    }
}

#[async_trait]
impl ContentStore for FsContentStore {
    fn backend_name(&self) -> &'static str {
        "filesystem"
    }

    async fn store(&self, id: &Identifier, payload: &str) -> StoreResult<()> {
        let target = self.path_for(id);
        let root = self.root.clone();
        let owned_target = target.clone();
        let owned_payload = payload.to_string();
        let created = tokio::task::spawn_blocking(move || {
            write_new(&root, &owned_target, &owned_payload)
        })
        .await
        .map_err(|e| StoreError::BackendUnavailable(format!("write task failed: {e}")))??;

        if created {
            debug!(%id, bytes = payload.len(), "stored payload file");
            return Ok(());
        }
        match Self::read_path(&target).await? {
            Some(existing) if existing == payload => {
                debug!(%id, "payload already stored");
                Ok(())
            }
            _ => Err(StoreError::AlreadyExists(id.clone())),
        }
    }

    async fn retrieve(&self, id: &Identifier) -> StoreResult<Option<String>> {
        Self::read_path(&self.path_for(id)).await
    }

    async fn remove(&self, id: &Identifier) -> StoreResult<bool> {
        match tokio::fs::remove_file(self.path_for(id)).await {
            Ok(()) => {
                debug!(%id, "removed payload file");
                Ok(true)
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e.into()),
        }
    }
}
