use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::io::{LocalFileReader, ScratchFile};

use super::error::Result;
use super::extractor::{Member, ZipExtractor};

/// An archive opened from a scratch file.
///
/// The handle owns the scratch file: releasing or dropping the handle
/// removes it, whichever way the caller exits.
pub struct ArchiveHandle {
    extractor: ZipExtractor<LocalFileReader>,
    scratch: ScratchFile,
}

impl ArchiveHandle {
    /// Open `scratch` for reading. On failure the scratch file is removed
    /// along with the consumed value.
    pub fn open(scratch: ScratchFile) -> Result<Self> {
        let reader = LocalFileReader::from_file(scratch.reopen()?)?;
        Ok(Self {
            extractor: ZipExtractor::new(Arc::new(reader)),
            scratch,
        })
    }

    /// Whether the scratch file carries a zip end record, wherever the
    /// archive starts inside it.
    pub async fn has_end_record(&self) -> bool {
        self.extractor.has_end_record().await
    }

    /// Extract every member into memory.
    pub async fn members(&self) -> Result<Vec<Member>> {
        self.extractor.members().await
    }

    pub fn scratch_path(&self) -> &Path {
        self.scratch.path()
    }

    /// Close the archive and delete the scratch file, returning its path.
    pub fn release(self) -> io::Result<PathBuf> {
        let Self { extractor, scratch } = self;
        // Close our read handle before unlinking
        drop(extractor);
        scratch.release()
    }
}
