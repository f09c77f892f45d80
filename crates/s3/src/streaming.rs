//! Streaming probe backend
//!
//! Lists through the paginator, uploads straight from the fixture file and
//! streams the downloaded body into the sink chunk by chunk.

use async_trait::async_trait;
use aws_smithy_types::byte_stream::ByteStream;
use sc_core::{Error, FixtureSet, Result, StorageProbe};
use tokio::io::AsyncWriteExt;

use crate::client::delete_object;
use crate::error::map_sdk_error;

pub struct StreamingBackend {
    inner: aws_sdk_s3::Client,
}

impl StreamingBackend {
    pub fn new(client: aws_sdk_s3::Client) -> Self {
        Self { inner: client }
    }

    async fn upload(&self, bucket: &str, source: &std::path::Path, key: &str) -> Result<()> {
        let body = ByteStream::from_path(source)
            .await
            .map_err(std::io::Error::other)?;

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
}

#[async_trait]
impl StorageProbe for StreamingBackend {
    async fn list(&self, bucket: &str) -> Result<()> {
        // One page proves the permission
        let mut pages = self
            .inner
            .list_objects_v2()
            .bucket(bucket)
            .into_paginator()
            .send();

        match pages.next().await {
            Some(Err(e)) => Err(map_sdk_error("list objects failed", e)),
            Some(Ok(page)) => {
                tracing::debug!(bucket, keys = ?page.key_count(), "Listed first page");
                Ok(())
            }
            None => Ok(()),
        }
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

        let mut response = self
            .inner
            .get_object()
            .bucket(bucket)
            .key(&key)
            .send()
            .await
            .map_err(|e| map_sdk_error("get object failed", e))?;

        let mut file = tokio::fs::File::create(fixtures.get_sink()).await?;
        let mut written = 0;
        while let Some(chunk) = response
            .body
            .try_next()
            .await
            .map_err(|e| Error::Network(format!("get object failed: {e}")))?
        {
            file.write_all(&chunk).await?;
            written += chunk.len();
        }
        file.flush().await?;

        tracing::debug!(bucket, key, size = written, "Downloaded fixture");
        Ok(())
    }

    async fn remove(&self, bucket: &str, key: &str) -> Result<()> {
        delete_object(&self.inner, bucket, key).await
    }
}
