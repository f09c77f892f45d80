//! Credential resolution
//!
//! Builds the shared SDK configuration every probe client is created from.

use aws_config::meta::region::RegionProviderChain;
use aws_config::retry::RetryConfig;
use aws_config::{BehaviorVersion, Region, SdkConfig};
use aws_credential_types::provider::ProvideCredentials;
use aws_smithy_types::error::display::DisplayErrorContext;
use sc_core::{AuthMode, CheckConfig, Error, Result};

/// Region used when neither the flags nor the provider chain name one
pub const FALLBACK_REGION: &str = "us-east-1";

/// Resolve credentials and region into an `SdkConfig`
///
/// Implicit auth uses the SDK's default credential chain. Explicit auth uses
/// the static key material from the config. Either way the credentials are
/// resolved once here, so a missing or broken credential source fails the
/// check before any probe runs.
pub async fn load_sdk_config(config: &CheckConfig) -> Result<SdkConfig> {
    let region = RegionProviderChain::first_try(config.region.clone().map(Region::new))
        .or_default_provider()
        .or_else(Region::from_static(FALLBACK_REGION));

    let mut loader = aws_config::defaults(BehaviorVersion::latest())
        .region(region)
        .retry_config(RetryConfig::standard().with_max_attempts(1));

    match (config.auth, &config.credentials) {
        (AuthMode::Explicit, Some(creds)) => {
            let credentials = aws_credential_types::Credentials::new(
                creds.access_key_id.clone(),
                creds.secret_access_key.clone(),
                creds.session_token.clone(),
                None, // expiry
                "s3checker-static-credentials",
            );
            loader = loader.credentials_provider(credentials);
        }
        (AuthMode::Explicit, None) => {
            return Err(Error::Config(
                "Explicit auth requires --key-id and --access-key".into(),
            ));
        }
        (AuthMode::Implicit, _) => {}
    }

    let sdk_config = loader.load().await;

    let provider = sdk_config
        .credentials_provider()
        .ok_or_else(|| Error::Auth("get session failed: no credentials provider".into()))?;
    let credentials = provider.provide_credentials().await.map_err(|e| {
        Error::Auth(format!("get session failed: {}", DisplayErrorContext(&e)))
    })?;

    tracing::debug!(
        auth = %config.auth,
        access_key_id = credentials.access_key_id(),
        region = ?sdk_config.region(),
        "Resolved AWS session"
    );

    Ok(sdk_config)
}

#[cfg(test)]
mod tests {
    use super::*;
    use sc_core::CheckConfigBuilder;

    fn explicit_config(region: Option<&str>) -> CheckConfig {
        CheckConfigBuilder {
            bucket: "backups".into(),
            auth: AuthMode::Explicit,
            key_id: Some("AKIDEXAMPLE".into()),
            access_key: Some("wJalrXUtnFEMI".into()),
            session_token: Some("token".into()),
            region: region.map(str::to_string),
            ..Default::default()
        }
        .build()
        .unwrap()
    }

    #[tokio::test]
    async fn test_explicit_credentials_resolve() {
        let sdk_config = load_sdk_config(&explicit_config(Some("eu-west-1")))
            .await
            .unwrap();

        assert_eq!(sdk_config.region(), Some(&Region::new("eu-west-1")));

        let credentials = sdk_config
            .credentials_provider()
            .unwrap()
            .provide_credentials()
            .await
            .unwrap();
        assert_eq!(credentials.access_key_id(), "AKIDEXAMPLE");
        assert_eq!(credentials.secret_access_key(), "wJalrXUtnFEMI");
        assert_eq!(credentials.session_token(), Some("token"));
    }

    #[tokio::test]
    async fn test_explicit_without_credentials_rejected() {
        let mut config = explicit_config(Some("eu-west-1"));
        config.credentials = None;

        let err = load_sdk_config(&config).await.unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }
}
