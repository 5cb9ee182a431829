use std::sync::Arc;
use std::time::Duration;

use domain_storage::{command::ArtifactOperateCommand, service::ArtifactStore};
use tokio::time::interval;
use tracing::{error, info, Instrument};
use typed_builder::TypedBuilder;

use super::BackgroundService;

/// Periodically wipes the upload areas.
///
/// Only talks to storage, never to the upload ledger.
#[derive(TypedBuilder)]
pub struct UploadJanitor {
    output_store: Arc<dyn ArtifactStore>,
    /// Wiped as well when set.
    #[builder(default)]
    staging_store: Option<Arc<dyn ArtifactStore>>,
    interval: Duration,
}

impl UploadJanitor {
    pub async fn sweep(&self) {
        info!("Clean up upload folder.");
        if let Err(e) = self.output_store.operate(ArtifactOperateCommand::Wipe).await {
            error!("Failed to wipe upload folder: {e:#}");
        }
        if let Some(staging) = &self.staging_store {
            info!("Clean up chunk folder.");
            if let Err(e) = staging.operate(ArtifactOperateCommand::Wipe).await {
                error!("Failed to wipe chunk folder: {e:#}");
            }
        }
    }
}

#[async_trait::async_trait]
impl BackgroundService for UploadJanitor {
    async fn run(&self) {
        let mut interval = interval(self.interval);
        loop {
            interval.tick().await;
            self.sweep().instrument(tracing::trace_span!("upload_janitor")).await;
        }
    }
}
