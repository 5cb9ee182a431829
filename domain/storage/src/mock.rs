use crate::{
    command::{ArtifactOperateCommand, ArtifactReadCommand},
    exception::UploadResult,
    model::vo::{Chunk, ReassemblyReport, UploadId},
    service::{ArtifactStore, ChunkStore, ReassembleService},
};
use async_trait::async_trait;
use mockall::mock;

mock! {
    pub ChunkStore {}
    #[async_trait]
    impl ChunkStore for ChunkStore {
        async fn put(&self, chunk: Chunk) -> UploadResult<()>;
        async fn read(&self, upload_id: &UploadId, nth: u64) -> UploadResult<Vec<u8>>;
        async fn delete(&self, upload_id: &UploadId, nth: u64) -> anyhow::Result<()>;
    }
}

mock! {
    pub ArtifactStore {}
    #[async_trait]
    impl ArtifactStore for ArtifactStore {
        async fn operate(&self, cmd: ArtifactOperateCommand) -> anyhow::Result<()>;
        async fn read(&self, cmd: ArtifactReadCommand) -> anyhow::Result<Vec<u8>>;
    }
}

mock! {
    pub ReassembleService {}
    #[async_trait]
    impl ReassembleService for ReassembleService {
        async fn reassemble(&self, upload_id: &UploadId, total: u64) -> UploadResult<ReassemblyReport>;
    }
}
