use std::collections::HashMap;
use std::sync::RwLock;

use async_trait::async_trait;
use pagedrop_types::Identifier;

use super::{BlockMedium, Container, MediumError, MediumResult, Unit, check_unit_limit};

/// In-memory, HashMap-based block medium.
///
/// Intended for tests and single-process deployments. Containers live behind
/// a `RwLock`; nothing survives the process.
pub struct InMemoryMedium {
    containers: RwLock<HashMap<Identifier, Container>>,
    unit_limit: Option<usize>,
}

impl InMemoryMedium {
    /// Create an empty medium with no per-unit limit.
    pub fn new() -> Self {
        Self {
            containers: RwLock::new(HashMap::new()),
            unit_limit: None,
        }
    }

    /// Create an empty medium that rejects units longer than `limit` chars.
    pub fn with_unit_limit(limit: usize) -> Self {
        Self {
            containers: RwLock::new(HashMap::new()),
            unit_limit: Some(limit),
        }
    }

    /// Number of containers currently held.
    pub fn len(&self) -> usize {
        self.containers.read().map(|map| map.len()).unwrap_or(0)
    }

    /// Returns `true` if no containers are held.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn poisoned(e: impl std::fmt::Display) -> MediumError {
        MediumError::Unavailable(format!("lock poisoned: {e}"))
    }
}

impl Default for InMemoryMedium {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl BlockMedium for InMemoryMedium {
    async fn create(&self, id: &Identifier) -> MediumResult<()> {
        let mut map = self.containers.write().map_err(Self::poisoned)?;
        map.entry(id.clone()).or_default();
        Ok(())
    }

    async fn append(&self, id: &Identifier, units: Vec<Unit>) -> MediumResult<()> {
        check_unit_limit(&units, self.unit_limit)?;
        let mut map = self.containers.write().map_err(Self::poisoned)?;
        let container = map
            .get_mut(id)
            .ok_or_else(|| MediumError::NoSuchContainer(id.clone()))?;
        container.units.extend(units);
        Ok(())
    }

    async fn fetch(&self, id: &Identifier) -> MediumResult<Option<Container>> {
        let map = self.containers.read().map_err(Self::poisoned)?;
        Ok(map.get(id).cloned())
    }

    async fn remove(&self, id: &Identifier) -> MediumResult<bool> {
        let mut map = self.containers.write().map_err(Self::poisoned)?;
        Ok(map.remove(id).is_some())
    }

    async fn put_legacy(&self, id: &Identifier, text: &str) -> MediumResult<()> {
        let mut map = self.containers.write().map_err(Self::poisoned)?;
        map.entry(id.clone()).or_default().legacy = Some(text.to_string());
        Ok(())
    }
}

impl std::fmt::Debug for InMemoryMedium {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryMedium")
            .field("container_count", &self.len())
            .field("unit_limit", &self.unit_limit)
            .finish()
    }
}
