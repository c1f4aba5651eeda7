use std::io;

/// Errors raised while reading a zip archive.
#[derive(Debug, thiserror::Error)]
pub enum ArchiveError {
    #[error("not a valid zip archive: {0}")]
    Corrupt(String),

    #[error("entry '{name}' uses unsupported compression method {method}")]
    UnsupportedCompression { name: String, method: u16 },

    #[error("entry '{name}' is encrypted")]
    Encrypted { name: String },

    #[error("entry '{name}' failed its checksum (expected {expected:08x}, got {actual:08x})")]
    ChecksumMismatch {
        name: String,
        expected: u32,
        actual: u32,
    },

    #[error("failed to inflate entry '{name}': {source}")]
    Inflate { name: String, source: io::Error },

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl ArchiveError {
    pub(crate) fn corrupt(reason: impl Into<String>) -> Self {
        Self::Corrupt(reason.into())
    }
}

pub type Result<T> = std::result::Result<T, ArchiveError>;
