//! check command - Probe bucket permissions and report capabilities
//!
//! Resolves the session, prints the caller identity and regions, runs the
//! list/put/get probes against the bucket and maps the outcome onto the
//! CockroachDB features that need them.

use std::path::PathBuf;

use clap::Args;
use sc_core::{AuthMode, CheckConfigBuilder, EnvDiagnostics, SdkVersion, run_check};
use sc_s3::{AwsEnvironment, load_sdk_config, storage_backend};

use crate::exit_code::ExitCode;
use crate::output::{report, Formatter, OutputConfig, ProgressBar};

/// Check which operations the current credentials may perform on a bucket
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Bucket to probe
    #[arg(long, env = "S3CHECKER_BUCKET")]
    pub bucket: String,

    /// Credential source: implicit (SDK default chain) or explicit (flags below)
    #[arg(long, default_value = "implicit")]
    pub auth: AuthMode,

    /// Access key id for explicit auth
    #[arg(long, requires = "access_key")]
    pub key_id: Option<String>,

    /// Secret access key for explicit auth
    #[arg(long, requires = "key_id")]
    pub access_key: Option<String>,

    /// Session token for temporary credentials
    #[arg(long)]
    pub session_token: Option<String>,

    /// Region override; defaults to the SDK provider chain, then us-east-1
    #[arg(long)]
    pub region: Option<String>,

    /// Log SDK requests, responses and signing
    #[arg(long, default_value = "false")]
    pub debug: bool,

    /// Storage probe backend: 1 (buffered) or 2 (streaming)
    #[arg(long, default_value = "1", env = "S3CHECKER_SDK_VERSION")]
    pub sdk_version: SdkVersion,

    /// Directory for the local fixture files; defaults to the system temp dir
    #[arg(long)]
    pub fixture_dir: Option<PathBuf>,
}

impl CheckArgs {
    /// Convert parsed flags into an unvalidated config builder
    pub fn to_builder(&self) -> CheckConfigBuilder {
        CheckConfigBuilder {
            bucket: self.bucket.clone(),
            auth: self.auth,
            key_id: self.key_id.clone(),
            access_key: self.access_key.clone(),
            session_token: self.session_token.clone(),
            region: self.region.clone(),
            debug: self.debug,
            sdk_version: self.sdk_version,
            fixture_dir: self.fixture_dir.clone(),
        }
    }
}

/// Execute the check command
pub async fn execute(args: CheckArgs, output_config: OutputConfig) -> ExitCode {
    let formatter = Formatter::new(output_config.clone());

    let config = match args.to_builder().build() {
        Ok(config) => config,
        Err(e) => {
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    let spinner = ProgressBar::spinner(&output_config, "Resolving session...");

    let sdk_config = match load_sdk_config(&config).await {
        Ok(sdk_config) => sdk_config,
        Err(e) => {
            spinner.finish_and_clear();
            formatter.error(&e.to_string());
            return ExitCode::from_error(&e);
        }
    };

    spinner.set_message(&format!("Probing bucket '{}'...", config.bucket));

    tracing::debug!(
        bucket = %config.bucket,
        backend = %config.sdk_version,
        region_override = ?config.region,
        "Starting check"
    );

    let environment = AwsEnvironment::new(&sdk_config);
    let result = run_check(
        &config,
        &environment,
        |region| {
            tracing::debug!(region, "Opening storage backend");
            storage_backend(&sdk_config, config.sdk_version, region)
        },
        EnvDiagnostics::from_process(),
    )
    .await;

    spinner.finish_and_clear();

    match result {
        Ok(check) => {
            formatter.print(&report::render(&check, formatter.colors_enabled()));
            if let Some(warning) = &check.cleanup_warning {
                formatter.warning(&warning.to_string());
            }
            ExitCode::Success
        }
        Err(e) => {
            formatter.error(&e.to_string());
            ExitCode::from_error(&e)
        }
    }
}
