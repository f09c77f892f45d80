//! The probe-and-report workflow
//!
//! Runs the identity and region lookups, the three storage probes and the
//! fixture cleanup, and assembles everything the reporter prints. Setup
//! failures abort with an error; probe failures are recorded in the report.

use futures::join;

use crate::capability::{verdicts_for, Verdict};
use crate::config::CheckConfig;
use crate::env::EnvDiagnostics;
use crate::error::{Error, Result};
use crate::fixture::FixtureSet;
use crate::probe::{
    CallerIdentity, EnvironmentProbe, Operation, ProbeResult, ProbeSet, StorageProbe,
};

/// Everything a completed check reports
#[derive(Debug)]
pub struct CheckReport {
    pub bucket: String,
    pub env: EnvDiagnostics,
    pub identity: CallerIdentity,
    /// Instance metadata region, or why it could not be determined
    pub instance_region: Result<String>,
    pub bucket_region: String,
    pub probes: ProbeSet,
    pub verdicts: Vec<Verdict>,
    /// Set when local fixture files could not all be removed
    pub cleanup_warning: Option<Error>,
}

/// Run the full check against `config.bucket`
///
/// `open_storage` receives the region the storage probes should target: the
/// `--region` override when given, otherwise the bucket's own region.
///
/// Fails only when the caller identity or the bucket region cannot be
/// determined. Local fixture cleanup runs whenever the probes ran, and a
/// cleanup failure is returned as a warning inside the report.
pub async fn run_check<F>(
    config: &CheckConfig,
    environment: &dyn EnvironmentProbe,
    open_storage: F,
    env: EnvDiagnostics,
) -> Result<CheckReport>
where
    F: FnOnce(&str) -> Box<dyn StorageProbe>,
{
    let bucket = config.bucket.as_str();

    let identity = environment.caller_identity().await?;
    tracing::debug!(arn = ?identity.arn, "Resolved caller identity");

    let instance_region = environment.instance_region().await;
    if let Err(e) = &instance_region {
        tracing::debug!("Instance region unavailable: {e}");
    }

    let bucket_region = environment.bucket_region(bucket).await?;
    tracing::debug!(bucket, region = %bucket_region, "Resolved bucket region");

    let probe_region = config.region.as_deref().unwrap_or(&bucket_region);
    let storage = open_storage(probe_region);

    let probes = run_probes(storage.as_ref(), bucket, &config.fixtures).await;
    remove_probe_objects(storage.as_ref(), bucket, &config.fixtures).await;

    let cleanup_warning = match config.fixtures.cleanup() {
        Ok(_) => None,
        Err(e) => {
            tracing::warn!("{e}");
            Some(e)
        }
    };

    let verdicts = verdicts_for(&probes);

    Ok(CheckReport {
        bucket: bucket.to_string(),
        env,
        identity,
        instance_region,
        bucket_region,
        probes,
        verdicts,
        cleanup_warning,
    })
}

/// Run the list, put and get probes concurrently
pub async fn run_probes(
    storage: &dyn StorageProbe,
    bucket: &str,
    fixtures: &FixtureSet,
) -> ProbeSet {
    for operation in [Operation::List, Operation::Put, Operation::Get] {
        tracing::debug!(bucket, %operation, "Starting probe");
    }

    let (list, put, get) = join!(
        storage.list(bucket),
        storage.put(bucket, fixtures),
        storage.get(bucket, fixtures)
    );

    let probes = ProbeSet {
        list: ProbeResult::from_result(Operation::List, list),
        put: ProbeResult::from_result(Operation::Put, put),
        get: ProbeResult::from_result(Operation::Get, get),
    };

    for result in probes.iter() {
        match &result.error {
            None => tracing::debug!(operation = %result.operation, "Probe succeeded"),
            Some(e) => tracing::debug!(operation = %result.operation, "Probe failed: {e}"),
        }
    }

    probes
}

/// Best-effort removal of the objects the put and get probes wrote
async fn remove_probe_objects(storage: &dyn StorageProbe, bucket: &str, fixtures: &FixtureSet) {
    let put_key = fixtures.put_key();
    let get_key = fixtures.get_key();
    let (put, get) = join!(
        storage.remove(bucket, &put_key),
        storage.remove(bucket, &get_key)
    );

    for (key, result) in [(put_key, put), (get_key, get)] {
        if let Err(e) = result {
            tracing::debug!(key, "Probe object not removed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{AuthMode, SdkVersion};
    use crate::probe::{MockEnvironmentProbe, MockStorageProbe};
    use tempfile::TempDir;

    fn config(dir: &TempDir) -> CheckConfig {
        CheckConfig {
            bucket: "backups".to_string(),
            auth: AuthMode::Implicit,
            credentials: None,
            region: None,
            debug: false,
            sdk_version: SdkVersion::V1,
            fixtures: FixtureSet::new(dir.path()),
        }
    }

    fn identity() -> CallerIdentity {
        CallerIdentity {
            account: Some("123456789012".into()),
            arn: Some("arn:aws:iam::123456789012:user/backup".into()),
            user_id: Some("AIDAEXAMPLE".into()),
        }
    }

    fn healthy_environment() -> MockEnvironmentProbe {
        let mut environment = MockEnvironmentProbe::new();
        environment
            .expect_caller_identity()
            .returning(|| Ok(identity()));
        environment
            .expect_instance_region()
            .returning(|| Ok("us-east-1".to_string()));
        environment
            .expect_bucket_region()
            .withf(|bucket| bucket.to_string() == "backups")
            .returning(|_| Ok("us-west-2".to_string()));
        environment
    }

    /// Storage mock that writes real fixture files, failing put when asked
    fn storage(put_allowed: bool) -> MockStorageProbe {
        let mut storage = MockStorageProbe::new();
        storage.expect_list().returning(|_| Ok(()));
        storage.expect_put().returning(move |_, fixtures| {
            std::fs::write(fixtures.put_source(), b"fixture")?;
            if put_allowed {
                Ok(())
            } else {
                Err(Error::Auth("AccessDenied".into()))
            }
        });
        storage.expect_get().returning(|_, fixtures| {
            std::fs::write(fixtures.get_source(), b"fixture")?;
            std::fs::write(fixtures.get_sink(), b"fixture")?;
            Ok(())
        });
        storage.expect_remove().returning(|_, _| Ok(()));
        storage
    }

    fn open(storage: MockStorageProbe) -> impl FnOnce(&str) -> Box<dyn StorageProbe> {
        move |_region: &str| -> Box<dyn StorageProbe> { Box::new(storage) }
    }

    fn remaining_files(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path()).unwrap().count()
    }

    #[tokio::test]
    async fn test_all_probes_succeed() {
        let dir = TempDir::new().unwrap();
        let report = run_check(
            &config(&dir),
            &healthy_environment(),
            open(storage(true)),
            EnvDiagnostics::default(),
        )
        .await
        .unwrap();

        assert_eq!(report.bucket, "backups");
        assert_eq!(report.identity, identity());
        assert_eq!(report.instance_region.unwrap(), "us-east-1");
        assert_eq!(report.bucket_region, "us-west-2");
        assert!(report.probes.iter().all(|p| p.succeeded()));
        assert!(report.verdicts.iter().all(|v| v.sufficient));
        assert!(report.cleanup_warning.is_none());
        assert_eq!(remaining_files(&dir), 0);
    }

    #[tokio::test]
    async fn test_storage_targets_bucket_region() {
        let dir = TempDir::new().unwrap();
        let mock = storage(true);
        run_check(
            &config(&dir),
            &healthy_environment(),
            move |region: &str| -> Box<dyn StorageProbe> {
                assert_eq!(region, "us-west-2");
                Box::new(mock)
            },
            EnvDiagnostics::default(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_storage_targets_region_override() {
        let dir = TempDir::new().unwrap();
        let mut config = config(&dir);
        config.region = Some("eu-west-1".to_string());
        let mock = storage(true);

        run_check(
            &config,
            &healthy_environment(),
            move |region: &str| -> Box<dyn StorageProbe> {
                assert_eq!(region, "eu-west-1");
                Box::new(mock)
            },
            EnvDiagnostics::default(),
        )
        .await
        .unwrap();
    }

    #[tokio::test]
    async fn test_put_denied_is_reported_not_fatal() {
        let dir = TempDir::new().unwrap();
        let report = run_check(
            &config(&dir),
            &healthy_environment(),
            open(storage(false)),
            EnvDiagnostics::default(),
        )
        .await
        .unwrap();

        assert!(report.probes.list.succeeded());
        assert!(!report.probes.put.succeeded());
        assert!(report.probes.get.succeeded());

        let sufficient: Vec<bool> = report.verdicts.iter().map(|v| v.sufficient).collect();
        assert_eq!(sufficient, [false, true, true, false, false]);
        assert_eq!(remaining_files(&dir), 0);
    }

    #[tokio::test]
    async fn test_identity_failure_aborts_before_probes() {
        let dir = TempDir::new().unwrap();
        let mut environment = MockEnvironmentProbe::new();
        environment
            .expect_caller_identity()
            .returning(|| Err(Error::Auth("InvalidClientTokenId".into())));
        environment.expect_instance_region().never();
        environment.expect_bucket_region().never();

        let mut storage = MockStorageProbe::new();
        storage.expect_list().never();
        storage.expect_put().never();
        storage.expect_get().never();
        storage.expect_remove().never();

        let result = run_check(
            &config(&dir),
            &environment,
            open(storage),
            EnvDiagnostics::default(),
        )
        .await;

        assert!(matches!(result, Err(Error::Auth(_))));
    }

    #[tokio::test]
    async fn test_instance_region_failure_continues() {
        let dir = TempDir::new().unwrap();
        let mut environment = MockEnvironmentProbe::new();
        environment
            .expect_caller_identity()
            .returning(|| Ok(identity()));
        environment
            .expect_instance_region()
            .returning(|| Err(Error::Network("connection refused".into())));
        environment
            .expect_bucket_region()
            .returning(|_| Ok("eu-central-1".to_string()));

        let report = run_check(
            &config(&dir),
            &environment,
            open(storage(true)),
            EnvDiagnostics::default(),
        )
        .await
        .unwrap();

        assert!(report.instance_region.is_err());
        assert_eq!(report.bucket_region, "eu-central-1");
        assert_eq!(report.verdicts.len(), 5);
        assert!(report.verdicts.iter().all(|v| v.sufficient));
    }

    #[tokio::test]
    async fn test_bucket_region_failure_aborts() {
        let dir = TempDir::new().unwrap();
        let mut environment = MockEnvironmentProbe::new();
        environment
            .expect_caller_identity()
            .returning(|| Ok(identity()));
        environment
            .expect_instance_region()
            .returning(|| Ok("us-east-1".to_string()));
        environment
            .expect_bucket_region()
            .returning(|bucket| Err(Error::NotFound(format!("bucket '{bucket}'"))));

        let mut storage = MockStorageProbe::new();
        storage.expect_list().never();
        storage.expect_put().never();
        storage.expect_get().never();
        storage.expect_remove().never();

        let result = run_check(
            &config(&dir),
            &environment,
            open(storage),
            EnvDiagnostics::default(),
        )
        .await;

        assert!(matches!(result, Err(Error::NotFound(_))));
    }

    #[tokio::test]
    async fn test_every_probe_failing_still_cleans_up() {
        let dir = TempDir::new().unwrap();
        let mut storage = MockStorageProbe::new();
        storage
            .expect_list()
            .returning(|_| Err(Error::Auth("AccessDenied".into())));
        storage.expect_put().returning(|_, fixtures| {
            std::fs::write(fixtures.put_source(), b"fixture")?;
            Err(Error::Auth("AccessDenied".into()))
        });
        storage.expect_get().returning(|_, fixtures| {
            std::fs::write(fixtures.get_source(), b"fixture")?;
            Err(Error::Auth("AccessDenied".into()))
        });
        storage
            .expect_remove()
            .times(2)
            .returning(|_, _| Err(Error::Auth("AccessDenied".into())));

        let report = run_check(
            &config(&dir),
            &healthy_environment(),
            open(storage),
            EnvDiagnostics::default(),
        )
        .await
        .unwrap();

        assert!(report.probes.iter().all(|p| !p.succeeded()));
        assert!(report.verdicts.iter().all(|v| !v.sufficient));
        assert!(report.cleanup_warning.is_none());
        assert_eq!(remaining_files(&dir), 0);
    }

    #[tokio::test]
    async fn test_cleanup_failure_is_advisory() {
        let dir = TempDir::new().unwrap();
        let config = config(&dir);
        let stuck = dir
            .path()
            .join(format!("s3checker-{}-stuck.txt", config.fixtures.run_id()));
        std::fs::create_dir(&stuck).unwrap();

        let report = run_check(
            &config,
            &healthy_environment(),
            open(storage(true)),
            EnvDiagnostics::default(),
        )
        .await
        .unwrap();

        assert!(matches!(report.cleanup_warning, Some(Error::Cleanup(_))));
        assert!(report.probes.iter().all(|p| p.succeeded()));
        assert_eq!(report.verdicts.len(), 5);
        assert!(report.verdicts.iter().all(|v| v.sufficient));

        // Only the directory that could not be removed is left
        assert_eq!(remaining_files(&dir), 1);
        assert!(stuck.is_dir());
    }

    #[tokio::test]
    async fn test_repeated_runs_are_idempotent() {
        let dir = TempDir::new().unwrap();

        let first = run_check(
            &config(&dir),
            &healthy_environment(),
            open(storage(false)),
            EnvDiagnostics::default(),
        )
        .await
        .unwrap();
        assert_eq!(remaining_files(&dir), 0);

        let second = run_check(
            &config(&dir),
            &healthy_environment(),
            open(storage(false)),
            EnvDiagnostics::default(),
        )
        .await
        .unwrap();
        assert_eq!(remaining_files(&dir), 0);

        assert_eq!(first.verdicts, second.verdicts);
    }
}
