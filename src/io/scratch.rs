//! Scratch storage for downloaded archives.
//!
//! A [`ScratchFile`] is a uniquely named temp file holding one downloaded
//! archive. The file is removed when the value is released or dropped, so
//! every exit path of the pipeline cleans up after itself.

use std::fs::File;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

/// MIME type reported for zip archives.
pub const ZIP_MIME: &str = "application/zip";

const PREFIX: &str = "s3unzip-";
const SUFFIX: &str = ".zip";

/// A temp file owned by a single pipeline invocation.
#[derive(Debug)]
pub struct ScratchFile {
    file: NamedTempFile,
}

impl ScratchFile {
    /// Create a scratch file containing `contents`.
    ///
    /// The name is random, so concurrent invocations never collide. When
    /// `dir` is `None` the system temp directory is used.
    pub fn create(dir: Option<&Path>, contents: &[u8]) -> io::Result<Self> {
        let mut builder = tempfile::Builder::new();
        builder.prefix(PREFIX).suffix(SUFFIX);

        let mut file = match dir {
            Some(dir) => builder.tempfile_in(dir)?,
            None => builder.tempfile()?,
        };
        file.write_all(contents)?;
        file.flush()?;

        Ok(Self { file })
    }

    pub fn path(&self) -> &Path {
        self.file.path()
    }

    /// Open an independent read handle on the scratch contents.
    pub fn reopen(&self) -> io::Result<File> {
        self.file.reopen()
    }

    /// Detect the content type from the file's magic bytes.
    ///
    /// Returns `None` when the type is not recognised.
    pub fn content_type(&self) -> io::Result<Option<&'static str>> {
        Ok(infer::get_from_path(self.path())?.map(|kind| kind.mime_type()))
    }

    /// Delete the file now, reporting any error instead of swallowing it.
    pub fn release(self) -> io::Result<PathBuf> {
        let path = self.path().to_path_buf();
        self.file.close()?;
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_are_unique_and_removed_on_drop() {
        let dir = tempfile::tempdir().unwrap();

        let a = ScratchFile::create(Some(dir.path()), b"a").unwrap();
        let b = ScratchFile::create(Some(dir.path()), b"b").unwrap();
        assert_ne!(a.path(), b.path());

        let name = a.path().file_name().unwrap().to_string_lossy().to_string();
        assert!(name.starts_with(PREFIX) && name.ends_with(SUFFIX));

        let path = a.path().to_path_buf();
        drop(a);
        assert!(!path.exists());

        let released = b.release().unwrap();
        assert!(!released.exists());
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn detects_zip_magic() {
        let dir = tempfile::tempdir().unwrap();

        let mut empty_zip = b"PK\x05\x06".to_vec();
        empty_zip.resize(22, 0);
        let zip = ScratchFile::create(Some(dir.path()), &empty_zip).unwrap();
        assert_eq!(zip.content_type().unwrap(), Some(ZIP_MIME));

        let text = ScratchFile::create(Some(dir.path()), b"just some text").unwrap();
        assert_ne!(text.content_type().unwrap(), Some(ZIP_MIME));
    }
}
