use actix_easy_multipart::{tempfile::Tempfile, MultipartForm};
use actix_web::{post, web};
use domain_storage::{
    exception::UploadException,
    model::vo::{ChunkUpload, UploadId},
};

use super::dtos::{UploadChunkRequest, UploadChunkResponse, UploadRequest, UploadResponse};
use super::ApiError;
use crate::infrastructure::ServiceProvider;

fn parse_count(field: &'static str, value: &str) -> Result<u64, UploadException> {
    value.trim().parse::<u64>().map_err(|e| UploadException::MalformedField {
        field,
        reason: format!("{value:?} isn't a non-negative integer ({e})"),
    })
}

async fn read_tempfile(file: &Tempfile) -> Result<Vec<u8>, UploadException> {
    Ok(tokio::fs::read(file.file.path()).await?)
}

/// Stores one complete file, suited to small files.
#[post("/upload")]
pub async fn upload(
    sp: web::Data<ServiceProvider>,
    data: MultipartForm<UploadRequest>,
) -> Result<web::Json<UploadResponse>, ApiError> {
    let data = data.0;
    let name = data.file.file_name.clone().ok_or(UploadException::MalformedField {
        field: "file",
        reason: "the part has no file name".to_string(),
    })?;
    let content = read_tempfile(&data.file).await?;
    let name = sp.whole_file_service.upload(&name, content).await?;
    Ok(web::Json(UploadResponse::ok(name.into())))
}

/// Accepts one chunk of a big file and reassembles the file once all chunks
/// arrived.
#[post("/upload_chunk")]
pub async fn upload_chunk(
    sp: web::Data<ServiceProvider>,
    data: MultipartForm<UploadChunkRequest>,
) -> Result<web::Json<UploadChunkResponse>, ApiError> {
    let data = data.0;
    let nth = parse_count("chunkIndex", &data.chunk_index.0)?;
    let total = parse_count("totalChunks", &data.total_chunks.0)?;
    let upload_id = UploadId::parse(data.filename_with_extension.0)?;
    let content = read_tempfile(&data.file).await?;

    let receipt = sp
        .chunk_upload_service
        .handle_chunk(ChunkUpload {
            upload_id,
            nth,
            total,
            content,
        })
        .await?;
    Ok(web::Json(receipt.into()))
}
