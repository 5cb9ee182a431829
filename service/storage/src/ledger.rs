use dashmap::DashMap;
use domain_storage::{
    exception::{UploadException, UploadResult},
    model::{
        entity::{Arrival, UploadProgress},
        vo::{ChunkRetryPolicy, UploadId},
    },
    repository::UploadLedger,
};
use typed_builder::TypedBuilder;

/// Upload ledger kept in process memory.
///
/// Each entry is only touched under its `DashMap` shard lock, and the lock is
/// never held across an await point.
#[derive(TypedBuilder, Default)]
pub struct MemoryUploadLedgerImpl {
    #[builder(default)]
    entries: DashMap<UploadId, UploadProgress>,
    #[builder(default)]
    retry_policy: ChunkRetryPolicy,
}

fn conflicted(upload_id: &UploadId, recorded: u64, provided: u64) -> UploadException {
    UploadException::ConflictedTotal {
        upload_id: upload_id.to_owned(),
        recorded,
        provided,
    }
}

impl UploadLedger for MemoryUploadLedgerImpl {
    fn reserve_total(&self, upload_id: &UploadId, total: u64) -> UploadResult<()> {
        let progress = self
            .entries
            .entry(upload_id.to_owned())
            .or_insert_with(|| UploadProgress::new(total));
        if progress.total != total {
            return Err(conflicted(upload_id, progress.total, total));
        }
        Ok(())
    }

    fn record_arrival(&self, upload_id: &UploadId, nth: u64, total: u64) -> UploadResult<Arrival> {
        let mut progress = self
            .entries
            .entry(upload_id.to_owned())
            .or_insert_with(|| UploadProgress::new(total));
        if progress.total != total {
            return Err(conflicted(upload_id, progress.total, total));
        }
        Ok(progress.arrive(nth, self.retry_policy))
    }

    fn received(&self, upload_id: &UploadId) -> Option<u64> {
        self.entries.get(upload_id).map(|progress| progress.received)
    }

    fn is_complete(&self, upload_id: &UploadId, total: u64) -> bool {
        self.received(upload_id).is_some_and(|received| received >= total)
    }

    fn release(&self, upload_id: &UploadId) {
        if let Some(mut progress) = self.entries.get_mut(upload_id) {
            progress.completing = false;
        }
    }

    fn clear(&self, upload_id: &UploadId) {
        self.entries.remove(upload_id);
    }

    fn len(&self) -> usize {
        self.entries.len()
    }
}
