use crate::exception::UploadResult;
use crate::model::entity::Arrival;
use crate::model::vo::UploadId;

/// # Upload ledger
///
/// In-memory progress of in-flight uploads. Progress isn't durable, an upload
/// spanning a process restart never completes.
pub trait UploadLedger: Send + Sync {
    /// Pins `total` for an unknown upload, or verifies it against the pinned
    /// one. Fails with `ConflictedTotal` on a mismatch.
    ///
    /// Insert and compare happen under the entry lock, so of two first chunks
    /// declaring different totals exactly one passes. Called before a chunk is
    /// persisted; the entry stays even if persisting fails.
    fn reserve_total(&self, upload_id: &UploadId, total: u64) -> UploadResult<()>;

    /// Counts one arrival of chunk `nth`, creating the entry if absent.
    ///
    /// Increment, completion check and claim happen in one critical section, so
    /// for every completion exactly one caller gets `claimed == true`.
    fn record_arrival(&self, upload_id: &UploadId, nth: u64, total: u64) -> UploadResult<Arrival>;

    /// Received count, `None` if the upload isn't tracked.
    fn received(&self, upload_id: &UploadId) -> Option<u64>;

    fn is_complete(&self, upload_id: &UploadId, total: u64) -> bool;

    /// Gives the completion claim back, keeping the count.
    fn release(&self, upload_id: &UploadId);

    /// Removes the entry so the id can be reused by a later upload.
    fn clear(&self, upload_id: &UploadId);

    /// Number of tracked uploads, logged by the coordinator.
    fn len(&self) -> usize;

    /// Inspection hook, see [`UploadLedger::len`].
    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
