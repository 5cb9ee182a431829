use actix_easy_multipart::{tempfile::Tempfile, text::Text, MultipartForm};
use domain_storage::model::vo::ChunkReceipt;
use serde::{Deserialize, Serialize};

/// Error body.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseBase<T> {
    pub status: i32,
    pub message: String,
    pub content: Option<T>,
}

impl<T> ResponseBase<T> {
    pub fn new(status: i32, message: &str, content: Option<T>) -> Self {
        Self {
            status,
            message: message.to_string(),
            content,
        }
    }

    pub fn err(status: i32, message: &str) -> Self {
        Self::new(status, message, None)
    }
}

#[derive(MultipartForm)]
pub struct UploadRequest {
    pub file: Tempfile,
}

/// Numeric fields arrive as text so malformed values are reported with the
/// field name.
#[derive(MultipartForm)]
pub struct UploadChunkRequest {
    #[multipart(rename = "chunkIndex")]
    pub chunk_index: Text<String>,
    #[multipart(rename = "totalChunks")]
    pub total_chunks: Text<String>,
    #[multipart(rename = "filenameWithExtension")]
    pub filename_with_extension: Text<String>,
    pub file: Tempfile,
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UploadResponse {
    pub status: String,
    pub file: String,
    pub timestamp: String,
}

impl UploadResponse {
    pub fn ok(file: String) -> Self {
        Self {
            status: "200".to_string(),
            file,
            timestamp: now(),
        }
    }
}

#[derive(Serialize, Deserialize, Debug)]
pub struct UploadChunkResponse {
    pub status: String,
    pub file: String,
    pub timestamp: String,
    /// Whether this chunk completed the upload.
    pub complete: bool,
    pub received: u64,
    pub total: u64,
}

impl From<ChunkReceipt> for UploadChunkResponse {
    fn from(receipt: ChunkReceipt) -> Self {
        Self {
            status: "200".to_string(),
            file: receipt.upload_id.into(),
            timestamp: now(),
            complete: receipt.complete,
            received: receipt.received,
            total: receipt.total,
        }
    }
}

fn now() -> String {
    chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string()
}
