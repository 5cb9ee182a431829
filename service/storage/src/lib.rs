mod artifact;
mod chunk_store;
mod chunk_upload;
mod ledger;
mod reassemble;
mod whole_file;

#[rustfmt::skip]
pub use {
    artifact::LocalArtifactStoreImpl,
    chunk_store::LocalChunkStoreImpl,
    chunk_upload::ChunkUploadServiceImpl,
    ledger::MemoryUploadLedgerImpl,
    reassemble::ReassembleServiceImpl,
    whole_file::WholeFileServiceImpl,
};
