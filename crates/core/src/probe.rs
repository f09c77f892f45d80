//! Probe trait definitions
//!
//! These traits define the narrow interface between the check and the cloud
//! provider. The AWS adapter implements them; tests mock them.

use std::fmt;

use async_trait::async_trait;

use crate::error::{Error, Result};
use crate::fixture::FixtureSet;

/// The authenticated principal, as reported by the identity service
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CallerIdentity {
    pub account: Option<String>,
    pub arn: Option<String>,
    pub user_id: Option<String>,
}

/// A storage operation whose permission is probed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    List,
    Put,
    Get,
}

impl Operation {
    pub const fn label(self) -> &'static str {
        match self {
            Self::List => "list objects",
            Self::Put => "put object",
            Self::Get => "get object",
        }
    }
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Outcome of one probe; a failure is data, not an abort
#[derive(Debug)]
pub struct ProbeResult {
    pub operation: Operation,
    pub error: Option<Error>,
}

impl ProbeResult {
    pub fn success(operation: Operation) -> Self {
        Self {
            operation,
            error: None,
        }
    }

    pub fn failure(operation: Operation, error: Error) -> Self {
        Self {
            operation,
            error: Some(error),
        }
    }

    pub fn from_result(operation: Operation, result: Result<()>) -> Self {
        match result {
            Ok(()) => Self::success(operation),
            Err(e) => Self::failure(operation, e),
        }
    }

    pub fn succeeded(&self) -> bool {
        self.error.is_none()
    }
}

/// Results of the list, put and get probes
#[derive(Debug)]
pub struct ProbeSet {
    pub list: ProbeResult,
    pub put: ProbeResult,
    pub get: ProbeResult,
}

impl ProbeSet {
    /// Results in report order
    pub fn iter(&self) -> impl Iterator<Item = &ProbeResult> {
        [&self.list, &self.put, &self.get].into_iter()
    }
}

/// Identity and region lookups
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EnvironmentProbe: Send + Sync {
    /// Who the credentials belong to
    async fn caller_identity(&self) -> Result<CallerIdentity>;

    /// Region of the compute instance this process runs on
    async fn instance_region(&self) -> Result<String>;

    /// Region the bucket lives in
    async fn bucket_region(&self, bucket: &str) -> Result<String>;
}

/// Permission probes against a bucket
///
/// Implementations must keep the put and get probes on distinct local paths
/// and remote keys so they can run concurrently.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StorageProbe: Send + Sync {
    /// Enumerate objects (first page only)
    async fn list(&self, bucket: &str) -> Result<()>;

    /// Upload the put fixture
    async fn put(&self, bucket: &str, fixtures: &FixtureSet) -> Result<()>;

    /// Upload the get fixture, then download it
    async fn get(&self, bucket: &str, fixtures: &FixtureSet) -> Result<()>;

    /// Delete a probe object
    async fn remove(&self, bucket: &str, key: &str) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_probe_result_from_result() {
        let ok = ProbeResult::from_result(Operation::List, Ok(()));
        assert!(ok.succeeded());

        let failed = ProbeResult::from_result(
            Operation::Put,
            Err(Error::Auth("AccessDenied".into())),
        );
        assert!(!failed.succeeded());
        assert_eq!(failed.operation, Operation::Put);
    }

    #[test]
    fn test_probe_set_order() {
        let set = ProbeSet {
            list: ProbeResult::success(Operation::List),
            put: ProbeResult::success(Operation::Put),
            get: ProbeResult::success(Operation::Get),
        };
        let ops: Vec<&str> = set.iter().map(|r| r.operation.label()).collect();
        assert_eq!(ops, ["list objects", "put object", "get object"]);
    }
}
