use super::ReadAt;
use async_trait::async_trait;
use std::fs::File;
use std::io;

/// Local file reader with random access support
pub struct LocalFileReader {
    #[cfg(unix)]
    file: File,
    #[cfg(not(unix))]
    file: parking_lot::Mutex<File>,
    size: u64,
}

impl LocalFileReader {
    /// Wrap an already opened handle, e.g. one reopened from a scratch file
    pub fn from_file(file: File) -> io::Result<Self> {
        let size = file.metadata()?.len();

        #[cfg(not(unix))]
        let file = parking_lot::Mutex::new(file);

        Ok(Self { file, size })
    }
}

#[async_trait]
impl ReadAt for LocalFileReader {
    async fn read_at(&self, offset: u64, buf: &mut [u8]) -> io::Result<usize> {
        #[cfg(unix)]
        {
            use std::os::unix::fs::FileExt;
            self.file.read_at(buf, offset)
        }

        #[cfg(not(unix))]
        {
            use std::io::{Read, Seek, SeekFrom};
            // Seek and read must not interleave with another reader
            let mut file = self.file.lock();
            file.seek(SeekFrom::Start(offset))?;
            file.read(buf)
        }
    }

    fn size(&self) -> u64 {
        self.size
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[tokio::test]
    async fn reads_at_offsets() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"0123456789").unwrap();

        let reader = LocalFileReader::from_file(file).unwrap();
        assert_eq!(reader.size(), 10);

        let mut buf = [0u8; 4];
        reader.read_exact_at(3, &mut buf).await.unwrap();
        assert_eq!(&buf, b"3456");
    }

    #[tokio::test]
    async fn short_source_is_unexpected_eof() {
        let mut file = tempfile::tempfile().unwrap();
        file.write_all(b"abc").unwrap();

        let reader = LocalFileReader::from_file(file).unwrap();
        let mut buf = [0u8; 8];
        let err = reader.read_exact_at(1, &mut buf).await.unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
