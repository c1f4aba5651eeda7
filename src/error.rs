use std::io;

use crate::archive::ArchiveError;
use crate::store::StoreError;

/// Terminal failure of a pipeline run. No step is retried.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("file error: cannot fetch {bucket}/{key}: {source}")]
    Fetch {
        bucket: String,
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("scratch file error: {0}")]
    Io(#[from] io::Error),

    #[error("file is not of type zip (detected {detected}); please select a valid .zip file")]
    UnsupportedFormat { detected: String },

    #[error("corrupt archive: {0}")]
    CorruptArchive(#[source] ArchiveError),

    #[error("the zip file was empty")]
    EmptyArchive,

    #[error("upload error: {key}: {source}")]
    Upload {
        key: String,
        #[source]
        source: StoreError,
    },

    #[error("delete error: cannot remove {bucket}/{key}: {source}")]
    Delete {
        bucket: String,
        key: String,
        #[source]
        source: StoreError,
    },
}

pub type Result<T> = std::result::Result<T, Error>;

/// Failing to read the scratch file is a local I/O problem. Running out of
/// bytes while following the archive's own offsets means the archive is
/// truncated.
impl From<ArchiveError> for Error {
    fn from(e: ArchiveError) -> Self {
        match e {
            ArchiveError::Io(e) if e.kind() != io::ErrorKind::UnexpectedEof => Error::Io(e),
            e => Error::CorruptArchive(e),
        }
    }
}
