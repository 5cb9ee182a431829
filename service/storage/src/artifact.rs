use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use anyhow::{anyhow, Context};
use async_trait::async_trait;
use domain_storage::{
    command::{ArtifactOperateCommand, ArtifactReadCommand},
    model::vo::UploadId,
    service::ArtifactStore,
};
use tokio::io::AsyncWriteExt;
use typed_builder::TypedBuilder;

/// Artifact store on the local filesystem.
///
/// Completed artifacts live in `base`. Artifacts being reassembled are staged in
/// `staging` and only moved into `base` once complete.
#[derive(TypedBuilder, Clone)]
pub struct LocalArtifactStoreImpl {
    #[builder(default = "uploads".into(), setter(into))]
    base: PathBuf,
    #[builder(default = "chunks".into(), setter(into))]
    staging: PathBuf,
}

impl LocalArtifactStoreImpl {
    pub fn artifact_path(&self, name: &UploadId) -> PathBuf {
        self.base.join(name.as_str())
    }

    pub fn staged_path(&self, name: &UploadId) -> PathBuf {
        self.staging.join(format!("assembling-{name}"))
    }
}

async fn create_parent_and_write(path: &Path, content: &[u8]) -> anyhow::Result<()> {
    tokio::fs::create_dir_all(&path.parent().ok_or(anyhow!("path: {path:?} doesn't has parent."))?)
        .await?;
    tokio::fs::write(path, content).await?;
    Ok(())
}

async fn remove_if_exists(path: &Path) -> anyhow::Result<()> {
    match tokio::fs::remove_file(path).await {
        Err(e) if e.kind() != ErrorKind::NotFound => {
            Err(anyhow::Error::new(e).context(format!("remove: {path:?}")))
        }
        _ => Ok(()),
    }
}

#[async_trait]
impl ArtifactStore for LocalArtifactStoreImpl {
    async fn operate(&self, cmd: ArtifactOperateCommand) -> anyhow::Result<()> {
        use ArtifactOperateCommand::*;
        match cmd {
            WriteWhole { name, content } => {
                let path = self.artifact_path(&name);
                create_parent_and_write(&path, &content)
                    .await
                    .with_context(|| format!("write artifact: {path:?}"))?;
            }
            AppendStaged { name, content } => {
                tokio::fs::create_dir_all(&self.staging).await?;
                let path = self.staged_path(&name);
                let mut file = tokio::fs::OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(&path)
                    .await
                    .with_context(|| format!("open staged artifact: {path:?}"))?;
                file.write_all(&content).await?;
                file.flush().await?;
            }
            CommitStaged { name } => {
                tokio::fs::create_dir_all(&self.base).await?;
                let from = self.staged_path(&name);
                let to = self.artifact_path(&name);
                tokio::fs::rename(&from, &to)
                    .await
                    .with_context(|| format!("commit artifact: {from:?} -> {to:?}"))?;
            }
            DiscardStaged { name } => {
                remove_if_exists(&self.staged_path(&name)).await?;
            }
            Wipe => {
                match tokio::fs::remove_dir_all(&self.base).await {
                    Err(e) if e.kind() != ErrorKind::NotFound => {
                        return Err(anyhow::Error::new(e).context(format!("wipe: {:?}", self.base)));
                    }
                    _ => {}
                }
                tokio::fs::create_dir_all(&self.base).await?;
            }
        };
        Ok(())
    }

    async fn read(&self, cmd: ArtifactReadCommand) -> anyhow::Result<Vec<u8>> {
        use ArtifactReadCommand::*;
        Ok(match cmd {
            Read { name } => {
                let path = self.artifact_path(&name);
                tokio::fs::read(&path).await.with_context(|| format!("read artifact: {path:?}"))?
            }
        })
    }
}
