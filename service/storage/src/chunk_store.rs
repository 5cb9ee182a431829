use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use anyhow::Context;
use async_trait::async_trait;
use domain_storage::{
    exception::{UploadException, UploadResult},
    model::vo::{Chunk, ChunkRetryPolicy, UploadId},
    service::ChunkStore,
};
use tokio::io::AsyncWriteExt;
use typed_builder::TypedBuilder;

/// Chunk store on the local filesystem.
///
/// All chunks share one flat staging directory, chunk `nth` of upload `id` lives
/// at `{base}/{nth}-{id}`.
#[derive(TypedBuilder)]
pub struct LocalChunkStoreImpl {
    #[builder(default = "chunks".into(), setter(into))]
    base: PathBuf,
    #[builder(default)]
    retry_policy: ChunkRetryPolicy,
    #[builder(default, setter(skip))]
    part_seq: AtomicU64,
}

impl LocalChunkStoreImpl {
    pub fn chunk_path(&self, upload_id: &UploadId, nth: u64) -> PathBuf {
        self.base.join(format!("{nth}-{upload_id}"))
    }

    /// Unique scratch file for one write of chunk `nth`.
    fn part_path(&self, upload_id: &UploadId, nth: u64) -> PathBuf {
        let seq = self.part_seq.fetch_add(1, Ordering::Relaxed);
        self.base.join(format!(".{nth}-{upload_id}.{seq}.part"))
    }

    /// Writes the whole chunk beside its final name, then renames it over. A
    /// reader sees either the previous chunk or the new one, never a
    /// truncated file.
    async fn replace(&self, path: &Path, chunk: &Chunk) -> anyhow::Result<()> {
        let part = self.part_path(&chunk.upload_id, chunk.nth);
        let written = async {
            tokio::fs::write(&part, &chunk.content)
                .await
                .with_context(|| format!("write chunk: {part:?}"))?;
            tokio::fs::rename(&part, path)
                .await
                .with_context(|| format!("replace chunk: {part:?} -> {path:?}"))
        }
        .await;
        if written.is_err() {
            let _ = tokio::fs::remove_file(&part).await;
        }
        written
    }
}

#[async_trait]
impl ChunkStore for LocalChunkStoreImpl {
    async fn put(&self, chunk: Chunk) -> UploadResult<()> {
        tokio::fs::create_dir_all(&self.base)
            .await
            .with_context(|| format!("create chunk dir: {:?}", self.base))?;
        let path = self.chunk_path(&chunk.upload_id, chunk.nth);
        match self.retry_policy {
            ChunkRetryPolicy::Replace => self.replace(&path, &chunk).await?,
            ChunkRetryPolicy::Append => {
                let mut file = tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .await
                    .with_context(|| format!("open chunk: {path:?}"))?;
                file.write_all(&chunk.content)
                    .await
                    .with_context(|| format!("append chunk: {path:?}"))?;
                file.flush().await.with_context(|| format!("flush chunk: {path:?}"))?;
            }
        }
        Ok(())
    }

    async fn read(&self, upload_id: &UploadId, nth: u64) -> UploadResult<Vec<u8>> {
        let path = self.chunk_path(upload_id, nth);
        match tokio::fs::read(&path).await {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == ErrorKind::NotFound => Err(UploadException::ChunkMissing {
                upload_id: upload_id.to_owned(),
                nth,
            }),
            Err(e) => Err(anyhow::Error::new(e).context(format!("read chunk: {path:?}")).into()),
        }
    }

    async fn delete(&self, upload_id: &UploadId, nth: u64) -> anyhow::Result<()> {
        let path = self.chunk_path(upload_id, nth);
        tokio::fs::remove_file(&path)
            .await
            .with_context(|| format!("remove chunk: {path:?}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(dir: &tempfile::TempDir, retry_policy: ChunkRetryPolicy) -> LocalChunkStoreImpl {
        LocalChunkStoreImpl::builder()
            .base(dir.path().join("chunks"))
            .retry_policy(retry_policy)
            .build()
    }

    fn chunk(name: &str, nth: u64, content: &[u8]) -> Chunk {
        Chunk {
            upload_id: UploadId::parse(name).unwrap(),
            nth,
            content: content.to_vec(),
        }
    }

    #[tokio::test]
    async fn chunk_file_name_is_index_then_upload_id() {
        let dir = tempfile::tempdir().unwrap();
        let store = load(&dir, ChunkRetryPolicy::Replace);
        store.put(chunk("report.final.pdf", 7, b"abc")).await.unwrap();

        let expected = dir.path().join("chunks").join("7-report.final.pdf");
        assert_eq!(store.chunk_path(&UploadId::parse("report.final.pdf").unwrap(), 7), expected);
        assert_eq!(tokio::fs::read(&expected).await.unwrap(), b"abc");
    }

    #[tokio::test]
    async fn replace_overwrites_retried_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let store = load(&dir, ChunkRetryPolicy::Replace);
        store.put(chunk("a.bin", 0, b"123")).await.unwrap();
        store.put(chunk("a.bin", 0, b"456")).await.unwrap();

        let id = UploadId::parse("a.bin").unwrap();
        assert_eq!(store.read(&id, 0).await.unwrap(), b"456");
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn retried_chunk_is_never_read_half_written() {
        let dir = tempfile::tempdir().unwrap();
        let store = std::sync::Arc::new(load(&dir, ChunkRetryPolicy::Replace));
        let id = UploadId::parse("big.bin").unwrap();
        let content = vec![7u8; 4 * 1024 * 1024];
        store.put(chunk("big.bin", 0, &content)).await.unwrap();

        let writer = {
            let store = store.clone();
            let content = content.clone();
            tokio::spawn(async move {
                for _ in 0..5 {
                    store.put(chunk("big.bin", 0, &content)).await.unwrap();
                }
            })
        };
        for _ in 0..20 {
            assert_eq!(store.read(&id, 0).await.unwrap().len(), content.len());
        }
        writer.await.unwrap();

        // Only the chunk itself is left, no scratch files.
        assert_eq!(std::fs::read_dir(dir.path().join("chunks")).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn append_duplicates_retried_chunk() {
        let dir = tempfile::tempdir().unwrap();
        let store = load(&dir, ChunkRetryPolicy::Append);
        store.put(chunk("a.bin", 0, b"123")).await.unwrap();
        store.put(chunk("a.bin", 0, b"456")).await.unwrap();

        let id = UploadId::parse("a.bin").unwrap();
        assert_eq!(store.read(&id, 0).await.unwrap(), b"123456");
    }

    #[tokio::test]
    async fn missing_chunk_and_delete() {
        let dir = tempfile::tempdir().unwrap();
        let store = load(&dir, ChunkRetryPolicy::Replace);
        let id = UploadId::parse("a.bin").unwrap();
        assert!(matches!(
            store.read(&id, 2).await,
            Err(UploadException::ChunkMissing { nth: 2, .. })
        ));

        store.put(chunk("a.bin", 2, b"x")).await.unwrap();
        store.delete(&id, 2).await.unwrap();
        assert!(store.read(&id, 2).await.is_err());
        assert!(store.delete(&id, 2).await.is_err());
    }
}
