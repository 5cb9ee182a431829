use super::UploadId;

/// One piece of a logical upload.
pub struct Chunk {
    /// Logical upload the chunk belongs to.
    pub upload_id: UploadId,
    /// Zero based index of the chunk.
    pub nth: u64,
    /// Chunk content.
    pub content: Vec<u8>,
}

/// A chunk arrival as delivered by the transport.
pub struct ChunkUpload {
    pub upload_id: UploadId,
    pub nth: u64,
    /// Declared total chunk count of the upload.
    pub total: u64,
    pub content: Vec<u8>,
}

impl ChunkUpload {
    pub fn into_chunk(self) -> (Chunk, u64) {
        (
            Chunk {
                upload_id: self.upload_id,
                nth: self.nth,
                content: self.content,
            },
            self.total,
        )
    }
}
