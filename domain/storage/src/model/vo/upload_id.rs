use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::exception::{UploadException, UploadResult};

/// Longest accepted upload name in bytes.
///
/// Chunk and staging file names add a prefix to the id, so this stays well below
/// common file name limits.
pub const MAX_UPLOAD_ID_LEN: usize = 200;

/// Caller supplied filename-with-extension identifying one logical upload.
///
/// Every storage path is derived from an `UploadId`, so it can't contain path
/// separators or name a parent/current directory.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UploadId(String);

impl UploadId {
    pub fn parse(name: impl Into<String>) -> UploadResult<Self> {
        let name = name.into();
        let reason = if name.is_empty() {
            Some("it is empty")
        } else if name == "." || name == ".." {
            Some("it names a directory")
        } else if name.contains(['/', '\\']) {
            Some("it contains a path separator")
        } else if name.contains('\0') {
            Some("it contains a NUL byte")
        } else if name.len() > MAX_UPLOAD_ID_LEN {
            Some("it is too long")
        } else {
            None
        };
        match reason {
            Some(reason) => Err(UploadException::InvalidUploadId { name, reason }),
            None => Ok(Self(name)),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for UploadId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for UploadId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl FromStr for UploadId {
    type Err = UploadException;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for UploadId {
    type Error = UploadException;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(value)
    }
}

impl From<UploadId> for String {
    fn from(value: UploadId) -> Self {
        value.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_plain_file_names() {
        for name in ["video.mp4", "archive.tar.gz", "no-extension", ".hidden", "with space.txt"] {
            assert_eq!(UploadId::parse(name).unwrap().as_str(), name);
        }
    }

    #[test]
    fn rejects_names_escaping_the_storage_area() {
        for name in ["", ".", "..", "../etc/passwd", "a/b.txt", "a\\b.txt", "nul\0.txt"] {
            assert!(
                matches!(UploadId::parse(name), Err(UploadException::InvalidUploadId { .. })),
                "{name:?} should be rejected"
            );
        }
        let long = "x".repeat(MAX_UPLOAD_ID_LEN + 1);
        assert!(UploadId::parse(long).is_err());
    }
}
