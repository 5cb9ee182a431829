use crate::model::vo::UploadId;

pub enum ArtifactOperateCommand {
    /// Whole file upload.
    WriteWhole { name: UploadId, content: Vec<u8> },
    /// Append reassembled bytes to the staged artifact, creating it if absent.
    AppendStaged { name: UploadId, content: Vec<u8> },
    /// Move the staged artifact into the output area.
    CommitStaged { name: UploadId },
    /// Remove the staged artifact if present.
    DiscardStaged { name: UploadId },
    /// Remove everything in the output area, keeping the area itself.
    Wipe,
}

pub enum ArtifactReadCommand {
    Read { name: UploadId },
}
