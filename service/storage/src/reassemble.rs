use std::sync::Arc;

use async_trait::async_trait;
use domain_storage::{
    command::ArtifactOperateCommand,
    exception::UploadResult,
    model::vo::{ReassemblyReport, UploadId},
    service::{ArtifactStore, ChunkStore, ReassembleService},
};
use tracing::{debug, info, warn};
use typed_builder::TypedBuilder;

#[derive(TypedBuilder)]
pub struct ReassembleServiceImpl {
    chunk_store: Arc<dyn ChunkStore>,
    artifact_store: Arc<dyn ArtifactStore>,
}

impl ReassembleServiceImpl {
    /// Append chunks in index order to the staged artifact, then commit it.
    async fn stage_and_commit(&self, upload_id: &UploadId, total: u64) -> UploadResult<u64> {
        let mut size = 0;
        for nth in 0..total {
            let content = self.chunk_store.read(upload_id, nth).await?;
            debug!(%upload_id, nth, len = content.len(), "Appending chunk.");
            size += content.len() as u64;
            self.artifact_store
                .operate(ArtifactOperateCommand::AppendStaged {
                    name: upload_id.to_owned(),
                    content,
                })
                .await?;
        }
        self.artifact_store
            .operate(ArtifactOperateCommand::CommitStaged {
                name: upload_id.to_owned(),
            })
            .await?;
        Ok(size)
    }
}

#[async_trait]
impl ReassembleService for ReassembleServiceImpl {
    async fn reassemble(&self, upload_id: &UploadId, total: u64) -> UploadResult<ReassemblyReport> {
        // An earlier failed attempt may have left a staged artifact behind.
        self.artifact_store
            .operate(ArtifactOperateCommand::DiscardStaged {
                name: upload_id.to_owned(),
            })
            .await?;

        let size = match self.stage_and_commit(upload_id, total).await {
            Ok(size) => size,
            Err(e) => {
                if let Err(discard) = self
                    .artifact_store
                    .operate(ArtifactOperateCommand::DiscardStaged {
                        name: upload_id.to_owned(),
                    })
                    .await
                {
                    warn!(%upload_id, "Failed to discard staged artifact: {discard:#}");
                }
                return Err(e);
            }
        };

        let mut leftover_chunks = vec![];
        for nth in 0..total {
            if let Err(e) = self.chunk_store.delete(upload_id, nth).await {
                warn!(%upload_id, nth, "Failed to remove consumed chunk: {e:#}");
                leftover_chunks.push(nth);
            }
        }
        info!(%upload_id, total, size, "Upload reassembled.");
        Ok(ReassemblyReport {
            upload_id: upload_id.to_owned(),
            size,
            leftover_chunks,
        })
    }
}

#[cfg(test)]
mod tests {
    use domain_storage::{
        command::ArtifactReadCommand,
        exception::UploadException,
        mock::{MockArtifactStore, MockChunkStore},
        model::vo::{Chunk, ChunkRetryPolicy},
    };

    use super::*;
    use crate::{LocalArtifactStoreImpl, LocalChunkStoreImpl};

    struct Fixture {
        dir: tempfile::TempDir,
        chunks: Arc<LocalChunkStoreImpl>,
        artifacts: Arc<LocalArtifactStoreImpl>,
        service: ReassembleServiceImpl,
    }

    fn load() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let chunks = Arc::new(
            LocalChunkStoreImpl::builder()
                .base(dir.path().join("chunks"))
                .retry_policy(ChunkRetryPolicy::Replace)
                .build(),
        );
        let artifacts = Arc::new(
            LocalArtifactStoreImpl::builder()
                .base(dir.path().join("uploads"))
                .staging(dir.path().join("chunks"))
                .build(),
        );
        let service = ReassembleServiceImpl::builder()
            .chunk_store(chunks.clone())
            .artifact_store(artifacts.clone())
            .build();
        Fixture {
            dir,
            chunks,
            artifacts,
            service,
        }
    }

    async fn put(fixture: &Fixture, id: &UploadId, nth: u64, content: &[u8]) {
        fixture
            .chunks
            .put(Chunk {
                upload_id: id.to_owned(),
                nth,
                content: content.to_vec(),
            })
            .await
            .unwrap();
    }

    #[tokio::test]
    async fn concatenates_in_index_order_and_consumes_chunks() {
        let fixture = load();
        let id = UploadId::parse("video.mp4").unwrap();
        put(&fixture, &id, 2, b"CC").await;
        put(&fixture, &id, 0, b"AA").await;
        put(&fixture, &id, 1, b"BB").await;

        let report = fixture.service.reassemble(&id, 3).await.unwrap();
        assert_eq!(report.size, 6);
        assert!(report.leftover_chunks.is_empty());

        let content =
            fixture.artifacts.read(ArtifactReadCommand::Read { name: id.clone() }).await.unwrap();
        assert_eq!(content, b"AABBCC");
        let staging = fixture.dir.path().join("chunks");
        assert_eq!(std::fs::read_dir(staging).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn missing_chunk_leaves_no_artifact_and_keeps_chunks() {
        let fixture = load();
        let id = UploadId::parse("video.mp4").unwrap();
        for nth in [0, 1, 3, 4] {
            put(&fixture, &id, nth, b"xx").await;
        }

        let err = fixture.service.reassemble(&id, 5).await.unwrap_err();
        assert!(matches!(err, UploadException::ChunkMissing { nth: 2, .. }));
        assert!(!fixture.artifacts.artifact_path(&id).exists());
        assert!(!fixture.artifacts.staged_path(&id).exists());
        for nth in [0, 1, 3, 4] {
            assert!(fixture.chunks.chunk_path(&id, nth).exists());
        }

        // Once the chunk shows up a later attempt succeeds.
        put(&fixture, &id, 2, b"xx").await;
        let report = fixture.service.reassemble(&id, 5).await.unwrap();
        assert_eq!(report.size, 10);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn chunk_retried_during_reassembly_keeps_artifact_whole() {
        let fixture = load();
        let id = UploadId::parse("big.bin").unwrap();
        let content = vec![b'z'; 8 * 1024 * 1024];

        for _ in 0..10 {
            put(&fixture, &id, 0, &content).await;
            let retries = async {
                for _ in 0..5 {
                    put(&fixture, &id, 0, &content).await;
                }
            };
            let (report, ()) = tokio::join!(fixture.service.reassemble(&id, 1), retries);
            assert_eq!(report.unwrap().size, content.len() as u64);

            let stored =
                fixture.artifacts.read(ArtifactReadCommand::Read { name: id.clone() }).await.unwrap();
            assert_eq!(stored.len(), content.len());
        }
    }

    #[tokio::test]
    async fn chunk_removal_failure_is_reported_not_fatal() {
        let mut chunks = MockChunkStore::new();
        chunks.expect_read().returning(|_, nth| Ok(vec![b'a' + nth as u8]));
        chunks
            .expect_delete()
            .returning(|_, nth| if nth == 1 { Err(anyhow::anyhow!("busy")) } else { Ok(()) });
        let mut artifacts = MockArtifactStore::new();
        artifacts.expect_operate().returning(|_| Ok(()));

        let service = ReassembleServiceImpl::builder()
            .chunk_store(Arc::new(chunks))
            .artifact_store(Arc::new(artifacts))
            .build();
        let id = UploadId::parse("abc.txt").unwrap();
        let report = service.reassemble(&id, 3).await.unwrap();
        assert_eq!(report.size, 3);
        assert_eq!(report.leftover_chunks, vec![1]);
    }

    #[tokio::test]
    async fn commit_failure_discards_staged_artifact() {
        let mut chunks = MockChunkStore::new();
        chunks.expect_read().returning(|_, _| Ok(b"zz".to_vec()));
        chunks.expect_delete().never();
        let mut artifacts = MockArtifactStore::new();
        artifacts.expect_operate().returning(|cmd| match cmd {
            ArtifactOperateCommand::CommitStaged { .. } => Err(anyhow::anyhow!("read-only fs")),
            _ => Ok(()),
        });

        let service = ReassembleServiceImpl::builder()
            .chunk_store(Arc::new(chunks))
            .artifact_store(Arc::new(artifacts))
            .build();
        let id = UploadId::parse("abc.txt").unwrap();
        let err = service.reassemble(&id, 2).await.unwrap_err();
        assert!(matches!(err, UploadException::Persistence { .. }));
    }
}
