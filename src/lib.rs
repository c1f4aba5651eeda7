//! # s3unzip
//!
//! Decompress a zip archive stored in an object-storage bucket back into
//! the same bucket.
//!
//! A run downloads the archive, buffers it in a scratch file, checks that
//! it really is a zip, extracts every member in memory and uploads the
//! members concurrently under a destination folder. Optionally the source
//! archive is deleted once every member is stored. Each run ends in exactly
//! one outcome, and the scratch file is removed on every path.
//!
//! ## Features
//!
//! - Pluggable storage via the [`ObjectStore`] trait: S3, local directory, in-memory
//! - STORED and DEFLATE entries, ZIP64 archives, CRC-32 verification
//! - Bounded or unbounded upload fan-out
//!
//! ## Example
//!
//! ```no_run
//! use std::sync::Arc;
//! use s3unzip::{Job, Pipeline, S3Store};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let store = Arc::new(S3Store::from_env(None, None).await);
//!     let pipeline = Pipeline::new(store);
//!
//!     let job = Job::new("my-bucket", "reports.zip").delete_on_success(true);
//!     let summary = pipeline.run(&job).await?;
//!     println!("{} files unpacked into {}/", summary.uploaded, summary.destination_prefix);
//!
//!     Ok(())
//! }
//! ```

pub mod archive;
pub mod cli;
pub mod error;
pub mod io;
pub mod job;
pub mod pipeline;
pub mod store;
pub mod telemetry;

pub use archive::{ArchiveError, ArchiveHandle, Member, ZipExtractor, ZipFileEntry};
pub use cli::Cli;
pub use error::{Error, Result};
pub use io::{LocalFileReader, ReadAt, ScratchFile};
pub use job::{Job, UnzipCommand, destination_prefix};
pub use pipeline::{CompletionTracker, Pipeline, PipelineOptions, Signal, Summary};
pub use store::{FsStore, MemoryStore, ObjectStore, S3Store, StoreError, StoreResult};
