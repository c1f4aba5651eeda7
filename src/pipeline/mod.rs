//! The decompression pipeline.
//!
//! A run is linear up to the fan-out:
//!
//! ```text
//! validate -> download -> scratch file -> type check -> enumerate
//!          -> upload every member concurrently -> cleanup -> outcome
//! ```
//!
//! Each run produces exactly one outcome. Uploads report into a
//! [`CompletionTracker`], which hands the terminal signal to exactly one
//! of them; the coordinator waits for that signal only.

mod completion;

pub use completion::{CompletionTracker, Signal};

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::{Semaphore, mpsc};
use tracing::warn;

use crate::archive::{ArchiveHandle, Member};
use crate::error::{Error, Result};
use crate::io::{ScratchFile, ZIP_MIME};
use crate::job::Job;
use crate::store::{ObjectStore, StoreError};

/// Progress notices are `info` for verbose jobs and `debug` otherwise.
macro_rules! progress {
    ($verbose:expr, $($arg:tt)+) => {
        if $verbose {
            tracing::info!($($arg)+)
        } else {
            tracing::debug!($($arg)+)
        }
    };
}

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    /// Where scratch files are created; the system temp dir when unset
    pub scratch_dir: Option<PathBuf>,
    /// Upper bound on in-flight uploads; unbounded when unset
    pub max_concurrent_uploads: Option<usize>,
}

/// Successful outcome of a run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub uploaded: usize,
    pub destination_prefix: String,
    pub source_deleted: bool,
}

enum Terminal {
    Completed,
    Failed { key: String, source: StoreError },
}

/// Unpacks archives from an [`ObjectStore`] back into the same store.
pub struct Pipeline<S: ObjectStore> {
    store: Arc<S>,
    options: PipelineOptions,
}

impl<S: ObjectStore + 'static> Pipeline<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self::with_options(store, PipelineOptions::default())
    }

    pub fn with_options(store: Arc<S>, options: PipelineOptions) -> Self {
        Self { store, options }
    }

    /// Run one job to its single outcome.
    ///
    /// The scratch file is gone by the time this returns, whatever the
    /// outcome. Uploads still in flight when another upload fails are not
    /// cancelled; their results are ignored.
    #[tracing::instrument(skip_all, fields(bucket = %job.bucket, key = %job.key))]
    pub async fn run(&self, job: &Job) -> Result<Summary> {
        job.validate()?;

        let body = self
            .store
            .get(&job.bucket, &job.key)
            .await
            .map_err(|source| Error::Fetch {
                bucket: job.bucket.clone(),
                key: job.key.clone(),
                source,
            })?;
        progress!(
            job.verbose,
            size = body.len(),
            "Zip file '{}' found in bucket '{}'",
            job.key,
            job.bucket
        );

        let scratch = self.write_scratch(body).await?;
        let detected = scratch.content_type()?;

        let archive = ArchiveHandle::open(scratch)?;
        if detected != Some(ZIP_MIME) {
            // Zip-based formats and archives behind a stub are sniffed as
            // something else but still end with a zip end record
            if !archive.has_end_record().await {
                let detected = detected.unwrap_or("unknown").to_string();
                remove_scratch(archive.release(), job.verbose);
                return Err(Error::UnsupportedFormat { detected });
            }
            progress!(
                job.verbose,
                detected = detected.unwrap_or("unknown"),
                "Content not sniffed as zip but carries a zip end record"
            );
        }

        let members = match archive.members().await {
            Ok(members) => members,
            Err(e) => {
                remove_scratch(archive.release(), job.verbose);
                return Err(e.into());
            }
        };
        if members.is_empty() {
            remove_scratch(archive.release(), job.verbose);
            return Err(Error::EmptyArchive);
        }

        let uploaded = members.len();
        let terminal = self.upload_all(job, members).await;
        remove_scratch(archive.release(), job.verbose);

        if let Terminal::Failed { key, source } = terminal {
            return Err(Error::Upload { key, source });
        }

        if job.delete_on_success {
            self.store
                .delete(&job.bucket, &job.key)
                .await
                .map_err(|source| Error::Delete {
                    bucket: job.bucket.clone(),
                    key: job.key.clone(),
                    source,
                })?;
            progress!(job.verbose, "Source archive '{}' deleted", job.key);
        }

        Ok(Summary {
            uploaded,
            destination_prefix: job.destination_prefix(),
            source_deleted: job.delete_on_success,
        })
    }

    async fn write_scratch(&self, body: Bytes) -> Result<ScratchFile> {
        let dir = self.options.scratch_dir.clone();
        let scratch = tokio::task::spawn_blocking(move || ScratchFile::create(dir.as_deref(), &body))
            .await
            .map_err(io::Error::other)??;
        Ok(scratch)
    }

    /// Spawn one upload task per member and wait for the terminal signal.
    async fn upload_all(&self, job: &Job, members: Vec<Member>) -> Terminal {
        let tracker = Arc::new(CompletionTracker::new(members.len()));
        let limiter = self
            .options
            .max_concurrent_uploads
            .map(|n| Arc::new(Semaphore::new(n.max(1))));
        let (tx, mut rx) = mpsc::unbounded_channel();

        for member in members {
            let store = Arc::clone(&self.store);
            let tracker = Arc::clone(&tracker);
            let limiter = limiter.clone();
            let tx = tx.clone();
            let bucket = job.bucket.clone();
            let key = job.destination_key(&member.name);
            let verbose = job.verbose;

            tokio::spawn(async move {
                let _permit = match limiter {
                    Some(limiter) => limiter.acquire_owned().await.ok(),
                    None => None,
                };

                let result = store.put(&bucket, &key, member.content).await;
                let signal = tracker.record(result.is_ok());

                let terminal = match result {
                    Ok(location) => {
                        progress!(verbose, "File decompressed to: {}", location);
                        if signal != Signal::Completed {
                            return;
                        }
                        Terminal::Completed
                    }
                    Err(source) => {
                        warn!(key = %key, error = %source, "upload failed");
                        if signal != Signal::Failed {
                            return;
                        }
                        Terminal::Failed { key, source }
                    }
                };
                // The coordinator stops listening after the first message,
                // and the tracker never produces a second one
                let _ = tx.send(terminal);
            });
        }
        drop(tx);

        // Every sender gone without a signal means the tasks died
        rx.recv().await.unwrap_or_else(|| Terminal::Failed {
            key: job.destination_prefix(),
            source: StoreError::Interrupted,
        })
    }
}

fn remove_scratch(result: io::Result<PathBuf>, verbose: bool) {
    match result {
        Ok(path) => progress!(verbose, path = %path.display(), "Local temp zip file deleted"),
        Err(e) => warn!(error = %e, "failed to delete scratch file"),
    }
}
