use std::io;
use std::path::PathBuf;

use async_trait::async_trait;
use bytes::Bytes;
use tokio::fs;

use super::{ObjectStore, StoreError, StoreResult};

/// Object store backed by a local directory.
///
/// Objects live at `<root>/<bucket>/<key>`, with `/` in keys mapped to
/// subdirectories.
#[derive(Debug, Clone)]
pub struct FsStore {
    root: PathBuf,
}

impl FsStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// Map a bucket/key pair to a path that cannot escape the root.
    pub fn object_path(&self, bucket: &str, key: &str) -> StoreResult<PathBuf> {
        let invalid = |reason| StoreError::InvalidKey {
            key: format!("{bucket}/{key}"),
            reason,
        };

        if bucket.is_empty() || bucket.contains(['/', '\\']) || bucket == "." || bucket == ".." {
            return Err(invalid("bucket must be a single path segment"));
        }
        if key.starts_with('/') || key.ends_with('/') || key.is_empty() {
            return Err(invalid("key must be a relative file path"));
        }

        let mut path = self.root.join(bucket);
        for segment in key.split('/').filter(|s| !s.is_empty()) {
            if segment == "." || segment == ".." || segment.contains('\\') {
                return Err(invalid("key contains a relative or foreign path segment"));
            }
            path.push(segment);
        }
        Ok(path)
    }
}

#[async_trait]
impl ObjectStore for FsStore {
    async fn get(&self, bucket: &str, key: &str) -> StoreResult<Bytes> {
        let path = self.object_path(bucket, key)?;
        match fs::read(&path).await {
            Ok(data) => Ok(Bytes::from(data)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Err(StoreError::not_found(bucket, key)),
            Err(e) => Err(StoreError::request("get", bucket, key, e)),
        }
    }

    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> StoreResult<String> {
        let path = self.object_path(bucket, key)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .await
                .map_err(|e| StoreError::request("put", bucket, key, e))?;
        }
        fs::write(&path, &body)
            .await
            .map_err(|e| StoreError::request("put", bucket, key, e))?;
        Ok(format!("file://{}", path.display()))
    }

    async fn delete(&self, bucket: &str, key: &str) -> StoreResult<()> {
        let path = self.object_path(bucket, key)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StoreError::request("delete", bucket, key, e)),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::path::Path;

    use super::*;

    #[tokio::test]
    async fn round_trips_nested_keys() {
        let root = tempfile::tempdir().unwrap();
        let store = FsStore::new(root.path());

        store
            .put("bucket", "folder/a/b.txt", Bytes::from_static(b"data"))
            .await
            .unwrap();
        assert!(root.path().join("bucket/folder/a/b.txt").is_file());
        assert_eq!(
            store.get("bucket", "folder/a/b.txt").await.unwrap(),
            Bytes::from_static(b"data")
        );

        store.delete("bucket", "folder/a/b.txt").await.unwrap();
        let err = store.get("bucket", "folder/a/b.txt").await.unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn rejects_escaping_keys() {
        let store = FsStore::new("/srv/objects");
        for key in ["../etc/passwd", "a/../../b", "/abs", "dir/", ""] {
            assert!(
                matches!(store.object_path("bucket", key), Err(StoreError::InvalidKey { .. })),
                "{key}"
            );
        }
        assert!(store.object_path("..", "k").is_err());
        assert_eq!(
            store.object_path("bucket", "x/y.zip").unwrap(),
            Path::new("/srv/objects/bucket/x/y.zip")
        );
    }
}
