use std::sync::Arc;
use std::time::Duration;

use domain_storage::service::{ArtifactStore, ChunkUploadService, WholeFileService};
use service_storage::*;

use super::{config::UploadServerConfig, janitor::UploadJanitor, BackgroundService};

/// Services shared by every request handler.
#[derive(Clone)]
pub struct ServiceProvider {
    pub config: UploadServerConfig,
    pub chunk_upload_service: Arc<dyn ChunkUploadService>,
    pub whole_file_service: Arc<dyn WholeFileService>,
    pub background_services: Vec<Arc<dyn BackgroundService>>,
}

impl ServiceProvider {
    pub fn build(config: config::Config) -> anyhow::Result<Self> {
        let config = config.try_deserialize::<UploadServerConfig>()?;
        Ok(Self::from_config(config))
    }

    pub fn from_config(config: UploadServerConfig) -> Self {
        let storage = &config.storage;
        let ledger = Arc::new(
            MemoryUploadLedgerImpl::builder().retry_policy(storage.chunk_retry_policy).build(),
        );
        let chunk_store = Arc::new(
            LocalChunkStoreImpl::builder()
                .base(&storage.chunk_path)
                .retry_policy(storage.chunk_retry_policy)
                .build(),
        );
        let artifact_store: Arc<dyn ArtifactStore> = Arc::new(
            LocalArtifactStoreImpl::builder()
                .base(&storage.upload_path)
                .staging(&storage.chunk_path)
                .build(),
        );
        let reassemble_service = Arc::new(
            ReassembleServiceImpl::builder()
                .chunk_store(chunk_store.clone())
                .artifact_store(artifact_store.clone())
                .build(),
        );
        let chunk_upload_service = Arc::new(
            ChunkUploadServiceImpl::builder()
                .ledger(ledger)
                .chunk_store(chunk_store)
                .reassemble_service(reassemble_service)
                .build(),
        );
        let whole_file_service = Arc::new(
            WholeFileServiceImpl::builder().artifact_store(artifact_store.clone()).build(),
        );

        let mut background_services: Vec<Arc<dyn BackgroundService>> = vec![];
        if config.janitor.enable {
            let staging_store: Option<Arc<dyn ArtifactStore>> = if config.janitor.sweep_staging {
                Some(Arc::new(LocalArtifactStoreImpl::builder().base(&storage.chunk_path).build()))
            } else {
                None
            };
            background_services.push(Arc::new(
                UploadJanitor::builder()
                    .output_store(artifact_store)
                    .staging_store(staging_store)
                    .interval(Duration::from_secs(config.janitor.interval_secs))
                    .build(),
            ));
        }

        Self {
            config,
            chunk_upload_service,
            whole_file_service,
            background_services,
        }
    }
}
