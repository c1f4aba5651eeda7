#![allow(dead_code)]

use std::io::{Cursor, Write};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use bytes::Bytes;
use rand::Rng;
use s3unzip::{MemoryStore, ObjectStore, StoreError, StoreResult};
use zip::write::FileOptions;

/// Build a zip archive, alternating STORED and DEFLATE entries.
/// Names ending in `/` become directory entries.
pub fn zip_archive(entries: &[(&str, &[u8])]) -> Vec<u8> {
    let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
    for (i, (name, content)) in entries.iter().enumerate() {
        let method = if i % 2 == 0 {
            zip::CompressionMethod::Stored
        } else {
            zip::CompressionMethod::Deflated
        };
        let options = FileOptions::default().compression_method(method);
        if name.ends_with('/') {
            writer.add_directory(*name, options).unwrap();
        } else {
            writer.start_file(*name, options).unwrap();
            writer.write_all(content).unwrap();
        }
    }
    writer.finish().unwrap().into_inner()
}

/// Offset of the central directory header describing `name`.
pub fn central_header(archive: &[u8], name: &str) -> usize {
    (0..archive.len() - 46)
        .find(|&i| {
            &archive[i..i + 4] == b"PK\x01\x02" && archive[i + 46..].starts_with(name.as_bytes())
        })
        .unwrap_or_else(|| panic!("no central directory header for {name}"))
}

/// A memory store that counts calls and can inject failures and delays.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: MemoryStore,
    fail_put: Option<String>,
    fail_delete: bool,
    jitter: bool,
    gets: AtomicUsize,
    puts: AtomicUsize,
    deletes: AtomicUsize,
    in_flight: AtomicUsize,
    peak_in_flight: AtomicUsize,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every put whose key ends with `suffix`.
    pub fn fail_put(mut self, suffix: &str) -> Self {
        self.fail_put = Some(suffix.to_string());
        self
    }

    pub fn fail_delete(mut self) -> Self {
        self.fail_delete = true;
        self
    }

    /// Delay each put by a random few milliseconds.
    pub fn jitter(mut self) -> Self {
        self.jitter = true;
        self
    }

    pub fn calls(&self) -> usize {
        self.gets() + self.puts() + self.deletes()
    }

    pub fn gets(&self) -> usize {
        self.gets.load(Ordering::SeqCst)
    }

    pub fn puts(&self) -> usize {
        self.puts.load(Ordering::SeqCst)
    }

    pub fn deletes(&self) -> usize {
        self.deletes.load(Ordering::SeqCst)
    }

    pub fn peak_in_flight(&self) -> usize {
        self.peak_in_flight.load(Ordering::SeqCst)
    }

    fn injected(op: &'static str, bucket: &str, key: &str) -> StoreError {
        StoreError::Request {
            op,
            bucket: bucket.to_string(),
            key: key.to_string(),
            source: "injected failure".into(),
        }
    }
}

#[async_trait]
impl ObjectStore for FaultyStore {
    async fn get(&self, bucket: &str, key: &str) -> StoreResult<Bytes> {
        self.gets.fetch_add(1, Ordering::SeqCst);
        self.inner.get(bucket, key).await
    }

    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> StoreResult<String> {
        self.puts.fetch_add(1, Ordering::SeqCst);
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak_in_flight.fetch_max(now, Ordering::SeqCst);

        if self.jitter {
            let millis = rand::thread_rng().gen_range(0..8);
            tokio::time::sleep(Duration::from_millis(millis)).await;
        } else {
            tokio::task::yield_now().await;
        }

        let result = match &self.fail_put {
            Some(suffix) if key.ends_with(suffix.as_str()) => Err(Self::injected("put", bucket, key)),
            _ => self.inner.put(bucket, key, body).await,
        };
        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        result
    }

    async fn delete(&self, bucket: &str, key: &str) -> StoreResult<()> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        if self.fail_delete {
            return Err(Self::injected("delete", bucket, key));
        }
        self.inner.delete(bucket, key).await
    }
}

pub fn dir_is_empty(dir: &std::path::Path) -> bool {
    std::fs::read_dir(dir).unwrap().next().is_none()
}
