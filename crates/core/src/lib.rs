//! sc-core: Core library for the s3checker permission probe
//!
//! This crate provides the core functionality for s3checker, including:
//! - Check configuration and validation
//! - Probe traits for identity, region and storage operations
//! - Capability mapping from probe results
//! - Local fixture file management
//! - The probe-and-report workflow
//!
//! This crate is designed to be independent of any specific cloud SDK,
//! allowing the workflow to be tested against mocked probes.

pub mod capability;
pub mod check;
pub mod config;
pub mod env;
pub mod error;
pub mod fixture;
pub mod probe;

pub use capability::{verdicts, Capability, Verdict};
pub use check::{run_check, CheckReport};
pub use config::{AuthMode, CheckConfig, CheckConfigBuilder, SdkVersion, StaticCredentials};
pub use env::EnvDiagnostics;
pub use error::{Error, Result};
pub use fixture::FixtureSet;
pub use probe::{CallerIdentity, EnvironmentProbe, Operation, ProbeResult, ProbeSet, StorageProbe};
