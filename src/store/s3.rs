use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::Client;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::DisplayErrorContext;
use aws_sdk_s3::primitives::ByteStream;
use bytes::Bytes;
use tracing::debug;

use super::{ObjectStore, StoreError, StoreResult};

/// Object store backed by S3 or an S3-compatible service.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
}

impl S3Store {
    pub fn new(client: Client) -> Self {
        Self { client }
    }

    /// Build a client from the default AWS provider chain.
    ///
    /// An explicit endpoint (MinIO, LocalStack, ...) switches to
    /// path-style addressing, which those services expect.
    pub async fn from_env(endpoint_url: Option<&str>, region: Option<&str>) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());
        if let Some(region) = region {
            loader = loader.region(Region::new(region.to_string()));
        }
        if let Some(url) = endpoint_url {
            loader = loader.endpoint_url(url);
        }
        let shared = loader.load().await;

        let mut builder = aws_sdk_s3::config::Builder::from(&shared);
        if endpoint_url.is_some() {
            builder = builder.force_path_style(true);
        }

        debug!(
            region = ?shared.region(),
            endpoint = endpoint_url.unwrap_or("default"),
            "S3 client configured"
        );
        Self::new(Client::from_conf(builder.build()))
    }
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn get(&self, bucket: &str, key: &str) -> StoreResult<Bytes> {
        let output = match self.client.get_object().bucket(bucket).key(key).send().await {
            Ok(output) => output,
            Err(e) => {
                if e.as_service_error().is_some_and(|se| se.is_no_such_key()) {
                    return Err(StoreError::not_found(bucket, key));
                }
                return Err(StoreError::request(
                    "get",
                    bucket,
                    key,
                    DisplayErrorContext(&e).to_string(),
                ));
            }
        };

        let body = output
            .body
            .collect()
            .await
            .map_err(|e| StoreError::request("get", bucket, key, e))?;
        Ok(body.into_bytes())
    }

    async fn put(&self, bucket: &str, key: &str, body: Bytes) -> StoreResult<String> {
        self.client
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(ByteStream::from(body))
            .send()
            .await
            .map_err(|e| StoreError::request("put", bucket, key, DisplayErrorContext(&e).to_string()))?;
        Ok(format!("s3://{bucket}/{key}"))
    }

    async fn delete(&self, bucket: &str, key: &str) -> StoreResult<()> {
        self.client
            .delete_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| {
                StoreError::request("delete", bucket, key, DisplayErrorContext(&e).to_string())
            })?;
        Ok(())
    }
}
