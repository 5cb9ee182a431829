use async_trait::async_trait;

use crate::exception::UploadResult;
use crate::model::vo::{ChunkReceipt, ChunkUpload};

/// # Chunked upload service
///
/// Records chunk arrivals and reassembles an upload once all its chunks are in.
#[async_trait]
pub trait ChunkUploadService: Send + Sync {
    async fn handle_chunk(&self, upload: ChunkUpload) -> UploadResult<ChunkReceipt>;
}
