//! S3 client construction and the single-request probe backend
//!
//! Wraps aws-sdk-s3 and implements the StorageProbe trait from sc-core.

use std::path::Path;

use async_trait::async_trait;
use aws_config::{Region, SdkConfig};
use aws_smithy_types::byte_stream::ByteStream;
use sc_core::{Error, FixtureSet, Result, StorageProbe};

use crate::error::map_sdk_error;

/// Build an S3 client from the session, pinned to `region`
pub fn s3_client(sdk_config: &SdkConfig, region: &str) -> aws_sdk_s3::Client {
    let s3_config = aws_sdk_s3::config::Builder::from(sdk_config)
        .region(Region::new(region.to_string()))
        .build();

    aws_sdk_s3::Client::from_conf(s3_config)
}

/// Delete one object, shared by both backends
pub(crate) async fn delete_object(
    client: &aws_sdk_s3::Client,
    bucket: &str,
    key: &str,
) -> Result<()> {
    client
        .delete_object()
        .bucket(bucket)
        .key(key)
        .send()
        .await
        .map_err(|e| map_sdk_error("delete object failed", e))?;

    Ok(())
}

/// Probe backend using single buffered requests
///
/// Lists with one `ListObjectsV2` call, uploads the fixture from memory and
/// collects the downloaded body before writing it to disk.
pub struct ObjectBackend {
    inner: aws_sdk_s3::Client,
}

impl ObjectBackend {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { inner: client }
    }

    async fn upload(&self, bucket: &str, source: &Path, key: &str) -> Result<()> {
        let data = tokio::fs::read(source).await?;
        let body = ByteStream::from(data);

        self.inner
            .put_object()
            .bucket(bucket)
            .key(key)
            .body(body)
            .send()
            .await
            .map_err(|e| map_sdk_error("put object failed", e))?;

        tracing::debug!(bucket, key, "Uploaded fixture");
        Ok(())
    }

    async fn download(&self, bucket: &str, key: &str, sink: &Path) -> Result<()> {
        let response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(key)
            .send()
            .await
            .map_err(|e| map_sdk_error("get object failed", e))?;

        let data = response
            .body
            .collect()
            .await
            .map_err(|e| Error::Network(format!("get object failed: {e}")))?
            .into_bytes();

        tokio::fs::write(sink, &data).await?;
        tracing::debug!(bucket, key, size = data.len(), "Downloaded fixture");
        Ok(())
    }
}

#[async_trait]
impl StorageProbe for ObjectBackend {
    async fn list(&self, bucket: &str) -> Result<()> {
        let response = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .send()
            .await
            .map_err(|e| map_sdk_error("list objects failed", e))?;

        tracing::debug!(bucket, keys = ?response.key_count(), "Listed objects");
        Ok(())
    }

    async fn put(&self, bucket: &str, fixtures: &FixtureSet) -> Result<()> {
        let source = fixtures.put_source();
        fixtures.write_source(&source).await?;
        self.upload(bucket, &source, &fixtures.put_key()).await
    }

    async fn get(&self, bucket: &str, fixtures: &FixtureSet) -> Result<()> {
        let source = fixtures.get_source();
        let key = fixtures.get_key();
        fixtures.write_source(&source).await?;
        self.upload(bucket, &source, &key).await?;
        self.download(bucket, &key, &fixtures.get_sink()).await
    }

    async fn remove(&self, bucket: &str, key: &str) -> Result<()> {
        delete_object(&self.inner, bucket, key).await
    }
}
