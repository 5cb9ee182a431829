use async_trait::async_trait;

use crate::command::*;

/// # Artifact store
///
/// Final-output area holding completed uploads, addressed by upload id.
#[async_trait]
pub trait ArtifactStore: Send + Sync {
    async fn operate(&self, cmd: ArtifactOperateCommand) -> anyhow::Result<()>;
    /// Inspection hook for stored artifacts; the upload paths only write.
    async fn read(&self, cmd: ArtifactReadCommand) -> anyhow::Result<Vec<u8>>;
}
