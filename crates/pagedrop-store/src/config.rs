use std::path::PathBuf;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::chunked::ChunkedContentStore;
use crate::error::{StoreError, StoreResult};
use crate::fs::FsContentStore;
use crate::medium::{FsMedium, InMemoryMedium};
use crate::traits::ContentStore;

/// Default maximum chunk length in chars.
///
/// Matches the per-field text limit of the document database the chunked
/// layout was designed for; the real bound belongs to the medium in use.
pub const DEFAULT_MAX_UNIT: usize = 2000;

/// Default text of the label and marker units that precede the chunks.
pub const DEFAULT_MARKER_LABEL: &str = "HTML content";

fn default_max_unit() -> usize {
    DEFAULT_MAX_UNIT
}

fn default_marker_label() -> String {
    DEFAULT_MARKER_LABEL.to_string()
}

/// Chunking parameters for [`ChunkedContentStore`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChunkConfig {
    /// Maximum chunk length in chars (`MAX_UNIT`).
    #[serde(default = "default_max_unit")]
    pub max_unit: usize,
    /// Label identifying the payload marker.
    #[serde(default = "default_marker_label")]
    pub marker_label: String,
}

impl Default for ChunkConfig {
    fn default() -> Self {
        Self {
            max_unit: DEFAULT_MAX_UNIT,
            marker_label: default_marker_label(),
        }
    }
}

impl ChunkConfig {
    pub fn validate(&self) -> StoreResult<()> {
        if self.max_unit == 0 {
            return Err(StoreError::Config("max_unit must be at least 1".into()));
        }
        if self.marker_label.trim().is_empty() {
            return Err(StoreError::Config("marker_label must not be empty".into()));
        }
        Ok(())
    }
}

/// Which content store a process runs with. Exactly one is built at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "backend", rename_all = "kebab-case")]
pub enum StorageConfig {
    /// Chunked layout over an in-process medium. Nothing is persisted.
    ChunkedMemory {
        #[serde(default = "default_max_unit")]
        max_unit: usize,
        #[serde(default = "default_marker_label")]
        marker_label: String,
    },
    /// Chunked layout over JSON-lines container files under `root`.
    ChunkedFs {
        root: PathBuf,
        #[serde(default = "default_max_unit")]
        max_unit: usize,
        #[serde(default = "default_marker_label")]
        marker_label: String,
    },
    /// One HTML file per identifier under `root`.
    Filesystem { root: PathBuf },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::ChunkedMemory {
            max_unit: DEFAULT_MAX_UNIT,
            marker_label: default_marker_label(),
        }
    }
}

impl StorageConfig {
    /// Chunking parameters, for the chunked backends.
    pub fn chunk_config(&self) -> Option<ChunkConfig> {
        match self {
            Self::ChunkedMemory {
                max_unit,
                marker_label,
            }
            | Self::ChunkedFs {
                max_unit,
                marker_label,
                ..
            } => Some(ChunkConfig {
                max_unit: *max_unit,
                marker_label: marker_label.clone(),
            }),
            Self::Filesystem { .. } => None,
        }
    }

    /// Config key of the selected backend.
    pub fn backend(&self) -> &'static str {
        match self {
            Self::ChunkedMemory { .. } => "chunked-memory",
            Self::ChunkedFs { .. } => "chunked-fs",
            Self::Filesystem { .. } => "filesystem",
        }
    }

    pub fn validate(&self) -> StoreResult<()> {
        if let Some(chunking) = self.chunk_config() {
            chunking.validate()?;
        }
        Ok(())
    }
}

/// Build the content store selected by `config`.
pub fn open_store(config: &StorageConfig) -> StoreResult<Arc<dyn ContentStore>> {
    config.validate()?;
    let store: Arc<dyn ContentStore> = match config {
        StorageConfig::ChunkedMemory { .. } => Arc::new(ChunkedContentStore::new(
            InMemoryMedium::new(),
            chunk_config_of(config)?,
        )?),
        StorageConfig::ChunkedFs { root, .. } => Arc::new(ChunkedContentStore::new(
            FsMedium::new(root.clone()),
            chunk_config_of(config)?,
        )?),
        StorageConfig::Filesystem { root } => Arc::new(FsContentStore::new(root.clone())),
    };
    tracing::debug!(backend = config.backend(), "opened content store");
    Ok(store)
}

fn chunk_config_of(config: &StorageConfig) -> StoreResult<ChunkConfig> {
    config
        .chunk_config()
        .ok_or_else(|| StoreError::Config(format!("{} does not chunk", config.backend())))
}
