use std::sync::Arc;

use async_trait::async_trait;
use domain_storage::{
    command::ArtifactOperateCommand,
    exception::UploadResult,
    model::vo::UploadId,
    service::{ArtifactStore, WholeFileService},
};
use tracing::info;
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct WholeFileServiceImpl {
    artifact_store: Arc<dyn ArtifactStore>,
}

#[async_trait]
impl WholeFileService for WholeFileServiceImpl {
    async fn upload(&self, name: &str, content: Vec<u8>) -> UploadResult<UploadId> {
        let name = UploadId::parse(name)?;
        let size = content.len();
        self.artifact_store
            .operate(ArtifactOperateCommand::WriteWhole {
                name: name.to_owned(),
                content,
            })
            .await?;
        info!(file = %name, size, "Whole file stored.");
        Ok(name)
    }
}

#[cfg(test)]
mod tests {
    use domain_storage::{command::ArtifactReadCommand, exception::UploadException};

    use super::*;
    use crate::LocalArtifactStoreImpl;

    #[tokio::test]
    async fn stores_identical_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(
            LocalArtifactStoreImpl::builder()
                .base(dir.path().join("uploads"))
                .staging(dir.path().join("chunks"))
                .build(),
        );
        let service = WholeFileServiceImpl::builder().artifact_store(store.clone()).build();

        let content = b"0123456789".to_vec();
        let name = service.upload("ten.bin", content.clone()).await.unwrap();
        let stored = store.read(ArtifactReadCommand::Read { name }).await.unwrap();
        assert_eq!(stored.len(), 10);
        assert_eq!(stored, content);
    }

    #[tokio::test]
    async fn rejects_traversing_name() {
        let dir = tempfile::tempdir().unwrap();
        let store = Arc::new(LocalArtifactStoreImpl::builder().base(dir.path()).build());
        let service = WholeFileServiceImpl::builder().artifact_store(store).build();
        assert!(matches!(
            service.upload("../escape.txt", b"x".to_vec()).await,
            Err(UploadException::InvalidUploadId { .. })
        ));
    }
}
