use async_trait::async_trait;

use crate::exception::UploadResult;
use crate::model::vo::UploadId;

#[async_trait]
pub trait WholeFileService: Send + Sync {
    /// Store a complete file in the output area under `name`.
    async fn upload(&self, name: &str, content: Vec<u8>) -> UploadResult<UploadId>;
}
