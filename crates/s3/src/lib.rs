//! sc-s3: AWS SDK adapter for s3checker
//!
//! This crate provides the implementations of the EnvironmentProbe and
//! StorageProbe traits using the AWS SDK for Rust. It is the only crate that
//! directly depends on the AWS SDK.

pub mod client;
pub mod environment;
mod error;
pub mod session;
pub mod streaming;

use aws_config::SdkConfig;
use sc_core::{SdkVersion, StorageProbe};

pub use client::ObjectBackend;
pub use environment::AwsEnvironment;
pub use session::load_sdk_config;
pub use streaming::StreamingBackend;

/// Create the storage probe backend selected by `version`, pinned to `region`
pub fn storage_backend(
    sdk_config: &SdkConfig,
    version: SdkVersion,
    region: &str,
) -> Box<dyn StorageProbe> {
    let client = client::s3_client(sdk_config, region);
    match version {
        SdkVersion::V1 => Box::new(ObjectBackend::new(client)),
        SdkVersion::V2 => Box::new(StreamingBackend::new(client)),
    }
}
