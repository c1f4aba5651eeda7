//! ZIP archive parsing and extraction.
//!
//! ## Architecture
//!
//! - [`structures`]: Data structures representing ZIP format elements (EOCD, file headers, etc.)
//! - [`parser`]: Low-level parsing of ZIP structures from a [`ReadAt`](crate::io::ReadAt) source
//! - [`extractor`]: Decompression of entries into in-memory [`Member`]s
//! - [`handle`]: [`ArchiveHandle`], an archive backed by a scratch file it owns
//!
//! ## Supported Features
//!
//! - Standard ZIP format (PKZIP APPNOTE 6.3.x compatible)
//! - ZIP64 extensions for files > 4GB
//! - STORED and DEFLATE entries, verified against their CRC-32
//!
//! ## Limitations
//!
//! - No encryption support
//! - No multi-disk archive support
//! - No BZIP2, LZMA, or other compression methods

mod error;
mod extractor;
mod handle;
mod parser;
mod structures;

pub use error::{ArchiveError, Result};
pub use extractor::{Member, ZipExtractor};
pub use handle::ArchiveHandle;
pub use parser::ZipParser;
pub use structures::*;
