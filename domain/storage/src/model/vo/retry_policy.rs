use serde::{Deserialize, Serialize};

/// How a chunk arriving again for an already stored `(upload, nth)` is handled.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ChunkRetryPolicy {
    /// Overwrite the stored chunk; the ledger counts distinct indices only.
    #[default]
    Replace,
    /// Append to the stored chunk and count every arrival.
    ///
    /// Legacy behavior: a retried chunk duplicates its bytes and completes the
    /// upload early.
    Append,
}
