//! Job description and the command surface that produces it.

use crate::error::{Error, Result};

/// Input of a single pipeline run. Immutable once the run starts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Job {
    pub bucket: String,
    /// Key of the archive inside `bucket`
    pub key: String,
    /// Explicit destination folder; derived from `key` when absent
    pub foldername: Option<String>,
    pub delete_on_success: bool,
    pub verbose: bool,
}

impl Job {
    pub fn new(bucket: impl Into<String>, key: impl Into<String>) -> Self {
        Self {
            bucket: bucket.into(),
            key: key.into(),
            ..Self::default()
        }
    }

    pub fn foldername(mut self, foldername: impl Into<String>) -> Self {
        self.foldername = Some(foldername.into());
        self
    }

    pub fn delete_on_success(mut self, delete: bool) -> Self {
        self.delete_on_success = delete;
        self
    }

    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Both the bucket and the key are required.
    pub fn validate(&self) -> Result<()> {
        if self.bucket.is_empty() || self.key.is_empty() {
            return Err(Error::InvalidArgument(
                "missing either bucket name or full filename".into(),
            ));
        }
        Ok(())
    }

    /// The prefix members are uploaded under.
    pub fn destination_prefix(&self) -> String {
        destination_prefix(self.foldername.as_deref(), &self.key)
    }

    /// Destination key of a member.
    pub fn destination_key(&self, member: &str) -> String {
        let prefix = self.destination_prefix();
        if prefix.is_empty() {
            member.to_string()
        } else {
            format!("{prefix}/{member}")
        }
    }
}

/// Resolve the destination folder for an archive.
///
/// A non-empty `explicit` name always wins. Otherwise the folder is the
/// key up to its first `.`, so `reports.zip` unpacks into `reports/`.
pub fn destination_prefix(explicit: Option<&str>, key: &str) -> String {
    match explicit {
        Some(name) if !name.is_empty() => name.trim_end_matches('/').to_string(),
        _ => key.split('.').next().unwrap_or_default().to_string(),
    }
}

/// Loosely specified invocation, as accepted by callers and the CLI.
///
/// The bucket and key may come either from `args` (`[bucket, file]`) or
/// from the named fields; named fields take precedence.
#[derive(Debug, Clone, Default)]
pub struct UnzipCommand {
    pub args: Vec<String>,
    pub bucket: Option<String>,
    pub file: Option<String>,
    pub foldername: Option<String>,
    pub delete_on_success: bool,
    pub verbose: bool,
}

impl UnzipCommand {
    /// Resolve into a [`Job`]. Missing values stay empty and are rejected
    /// by [`Job::validate`] when the job runs.
    pub fn into_job(self) -> Job {
        let (mut bucket, mut key) = match self.args.as_slice() {
            [bucket, file, ..] => (bucket.clone(), file.clone()),
            _ => (String::new(), String::new()),
        };
        if let Some(named) = self.bucket.filter(|b| !b.is_empty()) {
            bucket = named;
        }
        if let Some(named) = self.file.filter(|f| !f.is_empty()) {
            key = named;
        }

        Job {
            bucket,
            key,
            foldername: self.foldername,
            delete_on_success: self.delete_on_success,
            verbose: self.verbose,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_folder_wins() {
        assert_eq!(destination_prefix(Some("out"), "archive.zip"), "out");
        assert_eq!(destination_prefix(Some("out/"), "archive.zip"), "out");
        assert_eq!(destination_prefix(Some(""), "archive.zip"), "archive");
        assert_eq!(destination_prefix(None, "archive.zip"), "archive");
        assert_eq!(destination_prefix(None, "dir/archive.tar.zip"), "dir/archive");
        assert_eq!(destination_prefix(None, "noext"), "noext");
    }

    #[test]
    fn destination_key_joins_prefix() {
        let job = Job::new("b", "photos.zip");
        assert_eq!(job.destination_key("a/b.jpg"), "photos/a/b.jpg");

        let job = Job::new("b", ".zip");
        assert_eq!(job.destination_key("x"), "x");
    }

    #[test]
    fn positional_args_fill_in_bucket_and_key() {
        let job = UnzipCommand {
            args: vec!["bucket".into(), "file.zip".into()],
            ..Default::default()
        }
        .into_job();
        assert_eq!((job.bucket.as_str(), job.key.as_str()), ("bucket", "file.zip"));
    }

    #[test]
    fn named_fields_take_precedence() {
        let job = UnzipCommand {
            args: vec!["pos-bucket".into(), "pos.zip".into()],
            bucket: Some("named-bucket".into()),
            file: None,
            foldername: Some("out".into()),
            delete_on_success: true,
            verbose: true,
        }
        .into_job();
        assert_eq!(job.bucket, "named-bucket");
        assert_eq!(job.key, "pos.zip");
        assert_eq!(job.foldername.as_deref(), Some("out"));
        assert!(job.delete_on_success && job.verbose);
    }

    #[test]
    fn single_positional_is_ignored() {
        let job = UnzipCommand {
            args: vec!["only-one".into()],
            ..Default::default()
        }
        .into_job();
        assert!(job.validate().is_err());
    }
}
