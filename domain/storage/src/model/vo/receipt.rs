use super::UploadId;

/// Result of handling one chunk arrival.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkReceipt {
    pub upload_id: UploadId,
    /// Whether this arrival completed the upload and the final artifact exists.
    pub complete: bool,
    /// Received chunk count after this arrival.
    pub received: u64,
    pub total: u64,
}

/// Result of a successful reassembly.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReassemblyReport {
    pub upload_id: UploadId,
    /// Size of the final artifact in bytes.
    pub size: u64,
    /// Chunks whose removal failed after the artifact was committed.
    pub leftover_chunks: Vec<u64>,
}
