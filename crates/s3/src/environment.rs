//! Identity and region lookups
//!
//! Implements `EnvironmentProbe` with STS, the EC2 instance metadata service
//! and S3 `HeadBucket`.

use std::time::Duration;

use async_trait::async_trait;
use aws_config::SdkConfig;
use aws_smithy_types::error::display::DisplayErrorContext;
use sc_core::{CallerIdentity, EnvironmentProbe, Error, Result};

use crate::error::map_sdk_error;
use crate::session::FALLBACK_REGION;

/// Response header carrying a bucket's region, present even on redirects
const BUCKET_REGION_HEADER: &str = "x-amz-bucket-region";

/// Instance metadata path holding the instance's region
const IMDS_REGION_PATH: &str = "/latest/meta-data/placement/region";

/// How long to wait for the metadata service before concluding this is not EC2
const IMDS_TIMEOUT: Duration = Duration::from_secs(1);

/// AWS implementation of the identity and region probes
pub struct AwsEnvironment {
    sts: aws_sdk_sts::Client,
    s3: aws_sdk_s3::Client,
    imds: aws_config::imds::Client,
}

impl AwsEnvironment {
    /// Create the STS, S3 and metadata clients from a resolved session
    pub fn new(sdk_config: &SdkConfig) -> Self {
        let imds = aws_config::imds::Client::builder()
            .max_attempts(1)
            .connect_timeout(IMDS_TIMEOUT)
            .read_timeout(IMDS_TIMEOUT)
            .build();

        Self {
            sts: aws_sdk_sts::Client::new(sdk_config),
            s3: aws_sdk_s3::Client::new(sdk_config),
            imds,
        }
    }
}

#[async_trait]
impl EnvironmentProbe for AwsEnvironment {
    async fn caller_identity(&self) -> Result<CallerIdentity> {
        let output = self
            .sts
            .get_caller_identity()
            .send()
            .await
            .map_err(|e| map_sdk_error("get caller identity failed", e))?;

        Ok(CallerIdentity {
            account: output.account().map(str::to_string),
            arn: output.arn().map(str::to_string),
            user_id: output.user_id().map(str::to_string),
        })
    }

    async fn instance_region(&self) -> Result<String> {
        let region = self
            .imds
            .get(IMDS_REGION_PATH)
            .await
            .map_err(|e| Error::Network(DisplayErrorContext(&e).to_string()))?;

        let region: &str = region.as_ref();
        Ok(region.to_string())
    }

    async fn bucket_region(&self, bucket: &str) -> Result<String> {
        match self.s3.head_bucket().bucket(bucket).send().await {
            Ok(output) => Ok(output
                .bucket_region()
                .unwrap_or(FALLBACK_REGION)
                .to_string()),
            Err(e) => {
                // A redirect or a denied HEAD still names the bucket's region
                let region = e
                    .raw_response()
                    .and_then(|r| r.headers().get(BUCKET_REGION_HEADER))
                    .map(str::to_string);

                match region {
                    Some(region) => {
                        tracing::debug!(bucket, %region, "Bucket region taken from error response");
                        Ok(region)
                    }
                    None => Err(map_sdk_error("get bucket region failed", e)),
                }
            }
        }
    }
}
