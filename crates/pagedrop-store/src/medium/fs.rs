use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use pagedrop_types::Identifier;
use tokio::io::AsyncWriteExt;

use super::{BlockMedium, Container, MediumError, MediumResult, Unit, check_unit_limit};

const UNITS_EXT: &str = "units";
const LEGACY_EXT: &str = "legacy";

/// Block medium backed by a directory of JSON-lines files.
///
/// Container `id` is `{root}/{id}.units`, one serialized [`Unit`] per line,
/// plus an optional `{root}/{id}.legacy` holding the legacy field verbatim.
/// A batched append is a single `write_all` on a file opened for appending;
/// a trailing line without its newline is the remains of an interrupted
/// append and is ignored on read.
#[derive(Clone, Debug)]
pub struct FsMedium {
    root: PathBuf,
    unit_limit: Option<usize>,
}

impl FsMedium {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            unit_limit: None,
        }
    }

    pub fn with_unit_limit(root: impl Into<PathBuf>, limit: usize) -> Self {
        Self {
            root: root.into(),
            unit_limit: Some(limit),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn units_path(&self, id: &Identifier) -> PathBuf {
        self.root.join(format!("{id}.{UNITS_EXT}"))
    }

    fn legacy_path(&self, id: &Identifier) -> PathBuf {
        self.root.join(format!("{id}.{LEGACY_EXT}"))
    }

    async fn touch_units(&self, id: &Identifier) -> MediumResult<()> {
        tokio::fs::create_dir_all(&self.root).await?;
        tokio::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(self.units_path(id))
            .await?;
        Ok(())
    }
}

fn parse_units(id: &Identifier, text: &str) -> MediumResult<Vec<Unit>> {
    let complete = match text.rfind('\n') {
        Some(end) => &text[..=end],
        None => "",
    };
    if complete.len() < text.len() {
        tracing::debug!(%id, "ignoring torn trailing unit line");
    }
    complete
        .lines()
        .filter(|line| !line.is_empty())
        .map(|line| {
            serde_json::from_str(line).map_err(|e| MediumError::Serialization(e.to_string()))
        })
        .collect()
}

async fn read_optional(path: &Path) -> MediumResult<Option<String>> {
    match tokio::fs::read_to_string(path).await {
        Ok(text) => Ok(Some(text)),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
        Err(e) => Err(e.into()),
    }
}

async fn remove_optional(path: &Path) -> MediumResult<bool> {
    match tokio::fs::remove_file(path).await {
        Ok(()) => Ok(true),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(false),
        Err(e) => Err(e.into()),
    }
}

#[async_trait]
impl BlockMedium for FsMedium {
    async fn create(&self, id: &Identifier) -> MediumResult<()> {
        self.touch_units(id).await
    }

    async fn append(&self, id: &Identifier, units: Vec<Unit>) -> MediumResult<()> {
        check_unit_limit(&units, self.unit_limit)?;

        let mut buf = String::new();
        for unit in &units {
            let line =
                serde_json::to_string(unit).map_err(|e| MediumError::Serialization(e.to_string()))?;
            buf.push_str(&line);
            buf.push('\n');
        }

        let mut file = match tokio::fs::OpenOptions::new()
            .append(true)
            .open(self.units_path(id))
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(MediumError::NoSuchContainer(id.clone()));
            }
            Err(e) => return Err(e.into()),
        };
        file.write_all(buf.as_bytes()).await?;
        file.sync_data().await?;
        Ok(())
    }

    async fn fetch(&self, id: &Identifier) -> MediumResult<Option<Container>> {
        let units = read_optional(&self.units_path(id)).await?;
        let legacy = read_optional(&self.legacy_path(id)).await?;
        if units.is_none() && legacy.is_none() {
            return Ok(None);
        }
        let units = match units {
            Some(text) => parse_units(id, &text)?,
            None => Vec::new(),
        };
        Ok(Some(Container { units, legacy }))
    }

    async fn remove(&self, id: &Identifier) -> MediumResult<bool> {
        let had_units = remove_optional(&self.units_path(id)).await?;
        let had_legacy = remove_optional(&self.legacy_path(id)).await?;
        Ok(had_units || had_legacy)
    }

    async fn put_legacy(&self, id: &Identifier, text: &str) -> MediumResult<()> {
        self.touch_units(id).await?;
        tokio::fs::write(self.legacy_path(id), text).await?;
        Ok(())
    }
}
