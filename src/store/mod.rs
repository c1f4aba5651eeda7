//! Object storage backends.
//!
//! The pipeline only needs three operations against a bucket/key namespace,
//! expressed by the [`ObjectStore`] trait. Backends:
//!
//! - [`S3Store`]: AWS S3 or any S3-compatible endpoint
//! - [`FsStore`]: a local directory, one subdirectory per bucket
//! - [`MemoryStore`]: in-process map, for tests and embedding

mod fs;
mod memory;
mod s3;

pub use fs::FsStore;
pub use memory::MemoryStore;
pub use s3::S3Store;

use async_trait::async_trait;
use bytes::Bytes;

pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors returned by object store backends.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("object {bucket}/{key} does not exist")]
    NotFound { bucket: String, key: String },

    #[error("invalid object key '{key}': {reason}")]
    InvalidKey { key: String, reason: &'static str },

    #[error("{op} {bucket}/{key} failed: {source}")]
    Request {
        op: &'static str,
        bucket: String,
        key: String,
        source: BoxError,
    },

    #[error("upload task ended without reporting a result")]
    Interrupted,
}

impl StoreError {
    pub(crate) fn not_found(bucket: &str, key: &str) -> Self {
        Self::NotFound {
            bucket: bucket.to_string(),
            key: key.to_string(),
        }
    }

    pub(crate) fn request(
        op: &'static str,
        bucket: &str,
        key: &str,
        source: impl Into<BoxError>,
    ) -> Self {
        Self::Request {
            op,
            bucket: bucket.to_string(),
            key: key.to_string(),
            source: source.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }
}

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Minimal object storage interface consumed by the pipeline.
#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Fetch the whole object body.
    async fn get(&self, bucket: &str, key: &str) -> StoreResult<Bytes>;

    /// Store `body` under `key`, returning a printable location.
    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> StoreResult<String>;

    /// Remove an object. Removing a missing object is not an error.
    async fn delete(&self, bucket: &str, key: &str) -> StoreResult<()>;
}
