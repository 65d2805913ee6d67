use async_trait::async_trait;
use pagedrop_types::Identifier;
use serde::Serialize;

use crate::error::StoreResult;

/// Size facts about a stored payload.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PayloadInfo {
    pub char_len: usize,
    pub byte_len: usize,
    /// Number of stored chunks, for backends that chunk.
    pub chunks: Option<u64>,
}

impl PayloadInfo {
    pub fn of(payload: &str) -> Self {
        Self {
            char_len: payload.chars().count(),
            byte_len: payload.len(),
            chunks: None,
        }
    }
}

/// Storage for HTML payloads keyed by [`Identifier`].
///
/// All implementations must satisfy these invariants:
/// - Round-trip fidelity: `retrieve` returns exactly the string passed to
///   `store`, including the empty string.
/// - Payloads are immutable. Storing the same payload again under the same
///   identifier succeeds; storing a different one fails with
///   [`StoreError::AlreadyExists`](crate::StoreError::AlreadyExists).
/// - An absent payload is `Ok(None)` / `Ok(false)`, never an error, and is
///   always distinguishable from a backend failure.
#[async_trait]
pub trait ContentStore: Send + Sync {
    /// Short name of the backend, for diagnostics.
    fn backend_name(&self) -> &'static str;

    /// Persist `payload` under `id`.
    async fn store(&self, id: &Identifier, payload: &str) -> StoreResult<()>;

    /// Read the payload stored under `id`.
    ///
    /// Returns `Ok(None)` if nothing is stored there.
    async fn retrieve(&self, id: &Identifier) -> StoreResult<Option<String>>;

    /// Delete the payload under `id`. Returns `true` if it existed.
    async fn remove(&self, id: &Identifier) -> StoreResult<bool>;

    /// Describe the payload under `id` without returning it.
    ///
    /// The default implementation reads the full payload.
    async fn describe(&self, id: &Identifier) -> StoreResult<Option<PayloadInfo>> {
        Ok(self.retrieve(id).await?.as_deref().map(PayloadInfo::of))
    }
}
