use bytes::Bytes;
use flate2::read::DeflateDecoder;
use std::io::Read;
use std::sync::Arc;

use crate::io::ReadAt;

use super::error::{ArchiveError, Result};
use super::parser::ZipParser;
use super::structures::{CompressionMethod, ZipFileEntry};

/// One file extracted from an archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Member {
    /// Path of the entry relative to the archive root
    pub name: String,
    pub content: Bytes,
}

/// ZIP file extractor
pub struct ZipExtractor<R: ReadAt> {
    parser: ZipParser<R>,
}

impl<R: ReadAt> ZipExtractor<R> {
    pub fn new(reader: Arc<R>) -> Self {
        Self {
            parser: ZipParser::new(reader),
        }
    }

    /// List all entries in the archive, directories included
    pub async fn list_files(&self) -> Result<Vec<ZipFileEntry>> {
        self.parser.list_files().await
    }

    /// Whether the source ends with a readable end of central directory.
    pub async fn has_end_record(&self) -> bool {
        self.parser.find_eocd().await.is_ok()
    }

    /// Extract every file entry into memory, skipping directories.
    pub async fn members(&self) -> Result<Vec<Member>> {
        let entries = self.list_files().await?;

        let mut members = Vec::with_capacity(entries.len());
        for entry in entries.iter().filter(|e| !e.is_directory) {
            let content = self.extract_to_memory(entry).await?;
            members.push(Member {
                name: entry.file_name.clone(),
                content: Bytes::from(content),
            });
        }

        Ok(members)
    }

    /// Extract and verify a single entry's data.
    pub async fn extract_to_memory(&self, entry: &ZipFileEntry) -> Result<Vec<u8>> {
        if entry.is_encrypted() {
            return Err(ArchiveError::Encrypted {
                name: entry.file_name.clone(),
            });
        }

        let data_offset = self.parser.get_data_offset(entry).await?;

        let mut raw = vec![0u8; entry.compressed_size as usize];
        self.parser
            .reader()
            .read_exact_at(data_offset, &mut raw)
            .await?;

        let data = match entry.compression_method {
            CompressionMethod::Stored => raw,
            CompressionMethod::Deflate => inflate(entry, &raw)?,
            CompressionMethod::Unknown(method) => {
                return Err(ArchiveError::UnsupportedCompression {
                    name: entry.file_name.clone(),
                    method,
                });
            }
        };

        if data.len() as u64 != entry.uncompressed_size {
            return Err(ArchiveError::corrupt(format!(
                "entry '{}' is {} bytes, header says {}",
                entry.file_name,
                data.len(),
                entry.uncompressed_size
            )));
        }

        let mut crc = flate2::Crc::new();
        crc.update(&data);
        if crc.sum() != entry.crc32 {
            return Err(ArchiveError::ChecksumMismatch {
                name: entry.file_name.clone(),
                expected: entry.crc32,
                actual: crc.sum(),
            });
        }

        Ok(data)
    }
}

fn inflate(entry: &ZipFileEntry, raw: &[u8]) -> Result<Vec<u8>> {
    // The declared size is only a capacity hint; a lying header is caught
    // by the length check afterwards
    let hint = entry.uncompressed_size.min(64 * 1024 * 1024) as usize;
    let mut out = Vec::with_capacity(hint);

    // Cap output one byte past the declared size so a bomb cannot run away
    DeflateDecoder::new(raw)
        .take(entry.uncompressed_size.saturating_add(1))
        .read_to_end(&mut out)
        .map_err(|source| ArchiveError::Inflate {
            name: entry.file_name.clone(),
            source,
        })?;

    Ok(out)
}
