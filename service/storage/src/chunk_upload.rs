use std::sync::Arc;

use async_trait::async_trait;
use domain_storage::{
    exception::{UploadException, UploadResult},
    model::vo::{ChunkReceipt, ChunkUpload},
    repository::UploadLedger,
    service::{ChunkStore, ChunkUploadService, ReassembleService},
};
use tracing::{debug, error, info};
use typed_builder::TypedBuilder;

/// Coordinates chunk arrivals of concurrent requests.
///
/// A chunk is persisted before it is counted. The arrival whose count completes
/// the upload holds the ledger claim and is the only one running reassembly.
#[derive(TypedBuilder)]
pub struct ChunkUploadServiceImpl {
    ledger: Arc<dyn UploadLedger>,
    chunk_store: Arc<dyn ChunkStore>,
    reassemble_service: Arc<dyn ReassembleService>,
}

#[async_trait]
impl ChunkUploadService for ChunkUploadServiceImpl {
    async fn handle_chunk(&self, upload: ChunkUpload) -> UploadResult<ChunkReceipt> {
        if upload.total == 0 {
            return Err(UploadException::MalformedField {
                field: "totalChunks",
                reason: "must be greater than 0".to_string(),
            });
        }
        if upload.nth >= upload.total {
            return Err(UploadException::ChunkOutOfRange {
                upload_id: upload.upload_id,
                nth: upload.nth,
                total: upload.total,
            });
        }
        self.ledger.reserve_total(&upload.upload_id, upload.total)?;

        let (chunk, total) = upload.into_chunk();
        let upload_id = chunk.upload_id.to_owned();
        let nth = chunk.nth;
        self.chunk_store.put(chunk).await?;

        let arrival = self.ledger.record_arrival(&upload_id, nth, total)?;
        debug!(%upload_id, nth, received = arrival.received, total, "Chunk recorded.");
        let mut receipt = ChunkReceipt {
            upload_id,
            complete: false,
            received: arrival.received,
            total,
        };
        if !arrival.claimed {
            if self.ledger.is_complete(&receipt.upload_id, total) {
                debug!(
                    upload_id = %receipt.upload_id,
                    nth,
                    "Upload is being reassembled by another arrival."
                );
            }
            return Ok(receipt);
        }

        match self.reassemble_service.reassemble(&receipt.upload_id, total).await {
            Ok(report) => {
                self.ledger.clear(&receipt.upload_id);
                if !report.leftover_chunks.is_empty() {
                    info!(
                        upload_id = %receipt.upload_id,
                        leftover = ?report.leftover_chunks,
                        "Upload completed with chunks left in staging."
                    );
                }
                receipt.complete = true;
                debug!(in_flight = self.ledger.len(), "Upload ledger size.");
                Ok(receipt)
            }
            Err(e) => {
                // Keep the count, a later arrival retries the reassembly.
                self.ledger.release(&receipt.upload_id);
                error!(
                    upload_id = %receipt.upload_id,
                    received = ?self.ledger.received(&receipt.upload_id),
                    "Reassembly failed: {e}"
                );
                Err(e)
            }
        }
    }
}
