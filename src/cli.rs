use std::path::PathBuf;

use clap::Parser;

use crate::job::UnzipCommand;
use crate::pipeline::PipelineOptions;

#[derive(Parser, Debug)]
#[command(name = "s3unzip")]
#[command(version)]
#[command(about = "Decompress a zip archive in S3 back into the same bucket", long_about = None)]
#[command(after_help = "Examples:\n  \
  s3unzip my-bucket reports.zip              unpack into my-bucket/reports/\n  \
  s3unzip my-bucket reports.zip -f out -d    unpack into my-bucket/out/, then delete reports.zip\n  \
  s3unzip --local-root ./data b a.zip -v     use ./data/b/a.zip instead of S3")]
pub struct Cli {
    /// Bucket and archive key, in that order
    #[arg(value_name = "BUCKET_AND_FILE", num_args = 0..=2)]
    pub args: Vec<String>,

    /// Source bucket (overrides the positional form)
    #[arg(long)]
    pub bucket: Option<String>,

    /// Archive key inside the bucket (overrides the positional form)
    #[arg(long)]
    pub file: Option<String>,

    /// Destination folder (default: the key up to its first '.')
    #[arg(short = 'f', long, value_name = "DIR")]
    pub foldername: Option<String>,

    /// Delete the archive once every member is uploaded
    #[arg(short = 'd', long)]
    pub delete_on_success: bool,

    /// Print progress notices
    #[arg(short = 'v', long)]
    pub verbose: bool,

    /// Custom S3 endpoint, e.g. a MinIO server
    #[arg(long, value_name = "URL", env = "S3UNZIP_ENDPOINT_URL")]
    pub endpoint_url: Option<String>,

    /// AWS region (default: from the AWS environment)
    #[arg(long)]
    pub region: Option<String>,

    /// Serve buckets from subdirectories of DIR instead of S3
    #[arg(long, value_name = "DIR", env = "S3UNZIP_LOCAL_ROOT")]
    pub local_root: Option<PathBuf>,

    /// Directory for the scratch copy of the archive
    #[arg(long, value_name = "DIR", env = "S3UNZIP_SCRATCH_DIR")]
    pub scratch_dir: Option<PathBuf>,

    /// Limit on simultaneous uploads (default: unlimited)
    #[arg(long, value_name = "N", value_parser = clap::value_parser!(u32).range(1..))]
    pub max_concurrent_uploads: Option<u32>,
}

impl Cli {
    pub fn to_command(&self) -> UnzipCommand {
        UnzipCommand {
            args: self.args.clone(),
            bucket: self.bucket.clone(),
            file: self.file.clone(),
            foldername: self.foldername.clone(),
            delete_on_success: self.delete_on_success,
            verbose: self.verbose,
        }
    }

    pub fn pipeline_options(&self) -> PipelineOptions {
        PipelineOptions {
            scratch_dir: self.scratch_dir.clone(),
            max_concurrent_uploads: self.max_concurrent_uploads.map(|n| n as usize),
        }
    }
}
