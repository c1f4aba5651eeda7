//! Main entry point for the s3unzip CLI application.

use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use s3unzip::{Cli, FsStore, Job, ObjectStore, Pipeline, PipelineOptions, S3Store, telemetry};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    telemetry::init(cli.verbose);

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e}");
            ExitCode::FAILURE
        }
    }
}

/// Pick the storage backend and run the job against it.
async fn run(cli: Cli) -> Result<()> {
    let job = cli.to_command().into_job();
    let options = cli.pipeline_options();

    if let Some(root) = &cli.local_root {
        let store = Arc::new(FsStore::new(root));
        unzip(store, options, &job).await
    } else {
        let store = Arc::new(
            S3Store::from_env(cli.endpoint_url.as_deref(), cli.region.as_deref()).await,
        );
        unzip(store, options, &job).await
    }
}

async fn unzip<S: ObjectStore + 'static>(
    store: Arc<S>,
    options: PipelineOptions,
    job: &Job,
) -> Result<()> {
    let summary = Pipeline::with_options(store, options).run(job).await?;

    if job.verbose {
        eprintln!(
            "Success! {} file(s) unpacked into {}/{}",
            summary.uploaded, job.bucket, summary.destination_prefix
        );
    }
    Ok(())
}
