use crate::model::vo::UploadId;

pub type UploadResult<T> = Result<T, UploadException>;

/// Coarse classification of an [`UploadException`], used at the request boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExceptionKind {
    /// Malformed request fields. Nothing was mutated.
    Input,
    /// Storage create/write/read/delete failure.
    Persistence,
    /// A declared chunk was never persisted.
    Reassembly,
}

#[derive(Debug, thiserror::Error)]
pub enum UploadException {
    #[error("Upload name: {name:?} is invalid, {reason}.")]
    InvalidUploadId { name: String, reason: &'static str },

    #[error("Field `{field}` is malformed: {reason}.")]
    MalformedField { field: &'static str, reason: String },

    #[error("Chunk nth: {nth} of upload: {upload_id} is out of range, total chunks: {total}.")]
    ChunkOutOfRange {
        upload_id: UploadId,
        nth: u64,
        total: u64,
    },

    #[error("Upload: {upload_id} was started with {recorded} chunks, but this chunk declares {provided}.")]
    ConflictedTotal {
        upload_id: UploadId,
        recorded: u64,
        provided: u64,
    },

    #[error("Upload: {upload_id} doesn't have chunk nth: {nth}, reassembly aborted.")]
    ChunkMissing { upload_id: UploadId, nth: u64 },

    #[error("Storage internal error: {source}")]
    Persistence {
        #[source]
        source: anyhow::Error,
    },
}

impl UploadException {
    pub fn kind(&self) -> ExceptionKind {
        use UploadException::*;
        match self {
            InvalidUploadId { .. }
            | MalformedField { .. }
            | ChunkOutOfRange { .. }
            | ConflictedTotal { .. } => ExceptionKind::Input,
            ChunkMissing { .. } => ExceptionKind::Reassembly,
            Persistence { .. } => ExceptionKind::Persistence,
        }
    }

    /// HTTP-like status code of the exception.
    pub fn status(&self) -> u16 {
        use UploadException::*;
        match self {
            InvalidUploadId { .. } | MalformedField { .. } | ChunkOutOfRange { .. } => 400,
            ConflictedTotal { .. } => 409,
            ChunkMissing { .. } => 422,
            Persistence { .. } => 500,
        }
    }
}

impl From<anyhow::Error> for UploadException {
    fn from(e: anyhow::Error) -> Self {
        UploadException::Persistence { source: e }
    }
}

impl From<std::io::Error> for UploadException {
    fn from(e: std::io::Error) -> Self {
        UploadException::Persistence { source: e.into() }
    }
}
