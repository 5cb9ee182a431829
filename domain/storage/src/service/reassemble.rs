use async_trait::async_trait;

use crate::exception::UploadResult;
use crate::model::vo::{ReassemblyReport, UploadId};

#[async_trait]
pub trait ReassembleService: Send + Sync {
    /// Concatenate chunks `0..total` of `upload_id` into the final artifact.
    ///
    /// On failure no artifact is produced and every chunk stays in the staging
    /// area. On success the consumed chunks are removed.
    async fn reassemble(&self, upload_id: &UploadId, total: u64) -> UploadResult<ReassemblyReport>;
}
