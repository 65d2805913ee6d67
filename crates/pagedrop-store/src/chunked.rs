use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use pagedrop_types::{Chunk, Identifier, join_chunks, split_into_chunks};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};
use tracing::{debug, warn};

use crate::config::ChunkConfig;
use crate::error::{StoreError, StoreResult};
use crate::medium::{BlockMedium, Container, Unit};
use crate::traits::{ContentStore, PayloadInfo};

/// Payloads of unbounded length on top of a size-limited [`BlockMedium`].
///
/// A write lays out one container as
///
/// ```text
/// Label(marker_label)
/// Marker { label: marker_label, chunk_count: n }
/// Chunk(0) .. Chunk(n - 1)
/// ```
///
/// in a single batched append. Readers skip everything up to the marker and
/// concatenate the chunk units after it in stored order. Containers without
/// a marker fall back to their legacy single-field payload.
///
/// An empty payload is a marker declaring zero chunks.
///
/// Writes and deletes of one identifier are serialized within a store, so
/// two racing writes can never interleave their appends in one container.
pub struct ChunkedContentStore<M> {
    medium: M,
    config: ChunkConfig,
    locks: WriteLocks,
}

/// One async mutex per identifier with a write in flight.
#[derive(Default)]
struct WriteLocks {
    slots: Mutex<HashMap<Identifier, Arc<AsyncMutex<()>>>>,
}

impl WriteLocks {
    async fn acquire(&self, id: &Identifier) -> StoreResult<OwnedMutexGuard<()>> {
        let slot = {
            let mut slots = self
                .slots
                .lock()
                .map_err(|e| StoreError::BackendUnavailable(format!("lock poisoned: {e}")))?;
            // Slots only referenced by the map have no holder or waiter.
            slots.retain(|_, slot| Arc::strong_count(slot) > 1);
            Arc::clone(slots.entry(id.clone()).or_default())
        };
        Ok(slot.lock_owned().await)
    }
}

/// What a container holds, as far as the payload is concerned.
enum Decoded {
    Payload { text: String, chunks: u64 },
    Legacy(String),
    Absent,
}

impl<M: BlockMedium> ChunkedContentStore<M> {
    pub fn new(medium: M, config: ChunkConfig) -> StoreResult<Self> {
        config.validate()?;
        Ok(Self {
            medium,
            config,
            locks: WriteLocks::default(),
        })
    }

    pub fn medium(&self) -> &M {
        &self.medium
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.config
    }

    fn layout(&self, chunks: Vec<Chunk>) -> Vec<Unit> {
        let label = self.config.marker_label.clone();
        let mut units = Vec::with_capacity(chunks.len() + 2);
        units.push(Unit::Label(label.clone()));
        units.push(Unit::Marker {
            label,
            chunk_count: chunks.len() as u64,
        });
        units.extend(chunks.into_iter().map(|chunk| Unit::Chunk(chunk.text)));
        units
    }

    fn decode(&self, id: &Identifier, container: &Container) -> StoreResult<Decoded> {
        let mut units = container.units.iter();
        let declared = units.by_ref().find_map(|unit| match unit {
            Unit::Marker { label, chunk_count } if *label == self.config.marker_label => {
                Some(*chunk_count)
            }
            _ => None,
        });

        let Some(declared) = declared else {
            return Ok(match &container.legacy {
                Some(text) => Decoded::Legacy(text.clone()),
                None => Decoded::Absent,
            });
        };

        let chunks: Vec<Chunk> = units
            .filter_map(|unit| match unit {
                Unit::Chunk(text) => Some(text.as_str()),
                _ => None,
            })
            .enumerate()
            .map(|(index, text)| Chunk::new(index as u32, text))
            .collect();
        let found = chunks.len() as u64;

        if found == declared {
            return Ok(Decoded::Payload {
                text: join_chunks(&chunks)?,
                chunks: found,
            });
        }
        if found == 0 {
            debug!(%id, declared, "marker without chunks, treating payload as absent");
            return Ok(Decoded::Absent);
        }
        Err(StoreError::Truncated {
            id: id.clone(),
            expected: declared,
            found,
        })
    }

    /// Remove a container left behind by an earlier failed write so the
    /// identifier can be written again.
    async fn clear_leftover(&self, id: &Identifier) -> StoreResult<()> {
        warn!(%id, "discarding incomplete container from an earlier write");
        self.medium.remove(id).await?;
        Ok(())
    }
}

#[async_trait]
impl<M: BlockMedium> ContentStore for ChunkedContentStore<M> {
    fn backend_name(&self) -> &'static str {
        "chunked"
    }

    async fn store(&self, id: &Identifier, payload: &str) -> StoreResult<()> {
        let chunks = split_into_chunks(payload, self.config.max_unit)?;
        let _guard = self.locks.acquire(id).await?;

        if let Some(existing) = self.medium.fetch(id).await? {
            match self.decode(id, &existing) {
                Ok(Decoded::Payload { text, .. } | Decoded::Legacy(text)) => {
                    if text == payload {
                        debug!(%id, "payload already stored");
                        return Ok(());
                    }
                    return Err(StoreError::AlreadyExists(id.clone()));
                }
                Ok(Decoded::Absent) | Err(StoreError::Truncated { .. }) => {
                    self.clear_leftover(id).await?;
                }
                Err(e) => return Err(e),
            }
        }

        self.medium.create(id).await?;

        let chunk_count = chunks.len();
        let units = self.layout(chunks);
        if let Err(err) = self.medium.append(id, units).await {
            warn!(%id, error = %err, "chunk append failed, removing container");
            if let Err(cleanup) = self.medium.remove(id).await {
                warn!(%id, error = %cleanup, "cleanup of partial container failed");
            }
            return Err(StoreError::PartialWrite {
                id: id.clone(),
                reason: err.to_string(),
            });
        }

        debug!(%id, chunks = chunk_count, bytes = payload.len(), "stored chunked payload");
        Ok(())
    }

    async fn retrieve(&self, id: &Identifier) -> StoreResult<Option<String>> {
        let Some(container) = self.medium.fetch(id).await? else {
            return Ok(None);
        };
        Ok(match self.decode(id, &container)? {
            Decoded::Payload { text, .. } => Some(text),
            Decoded::Legacy(text) => {
                debug!(%id, "serving legacy single-field payload");
                Some(text)
            }
            Decoded::Absent => None,
        })
    }

    async fn remove(&self, id: &Identifier) -> StoreResult<bool> {
        let _guard = self.locks.acquire(id).await?;
        let existed = self.medium.remove(id).await?;
        debug!(%id, existed, "removed chunked payload");
        Ok(existed)
    }

    async fn describe(&self, id: &Identifier) -> StoreResult<Option<PayloadInfo>> {
        let Some(container) = self.medium.fetch(id).await? else {
            return Ok(None);
        };
        Ok(match self.decode(id, &container)? {
            Decoded::Payload { text, chunks } => Some(PayloadInfo {
                chunks: Some(chunks),
                ..PayloadInfo::of(&text)
            }),
            Decoded::Legacy(text) => Some(PayloadInfo::of(&text)),
            Decoded::Absent => None,
        })
    }
}

impl<M> std::fmt::Debug for ChunkedContentStore<M> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChunkedContentStore")
            .field("max_unit", &self.config.max_unit)
            .field("marker_label", &self.config.marker_label)
            .finish()
    }
}
