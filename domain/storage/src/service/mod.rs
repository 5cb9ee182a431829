mod artifact;
mod chunk_store;
mod chunk_upload;
mod reassemble;
mod whole_file;

#[rustfmt::skip]
pub use {
    artifact::ArtifactStore,
    chunk_store::ChunkStore,
    chunk_upload::ChunkUploadService,
    reassemble::ReassembleService,
    whole_file::WholeFileService,
};
