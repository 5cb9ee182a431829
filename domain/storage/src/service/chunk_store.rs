use async_trait::async_trait;

use crate::exception::UploadResult;
use crate::model::vo::{Chunk, UploadId};

/// # Chunk store
///
/// Staging area persisting chunk payloads keyed by `(upload id, nth)`.
#[async_trait]
pub trait ChunkStore: Send + Sync {
    /// Persist a chunk, creating the staging area if absent.
    async fn put(&self, chunk: Chunk) -> UploadResult<()>;

    /// Read a chunk, `ChunkMissing` if it was never persisted.
    async fn read(&self, upload_id: &UploadId, nth: u64) -> UploadResult<Vec<u8>>;

    /// Remove a chunk. Callers treat failures as warnings.
    async fn delete(&self, upload_id: &UploadId, nth: u64) -> anyhow::Result<()>;
}
