//! Check configuration
//!
//! A `CheckConfig` is built once from command-line input, validated before any
//! network call is made, and then handed to the credential resolver and the
//! probes. Nothing here is persisted.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use crate::error::{Error, Result};
use crate::fixture::FixtureSet;

/// How credentials are obtained
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Resolve credentials from the environment, shared config files,
    /// container or instance metadata
    #[default]
    Implicit,

    /// Use the access key id, secret key and session token given on the command line
    Explicit,
}

impl FromStr for AuthMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "implicit" => Ok(Self::Implicit),
            "explicit" => Ok(Self::Explicit),
            other => Err(Error::Config(format!(
                "Unknown auth type '{other}'. Expected: implicit or explicit"
            ))),
        }
    }
}

impl fmt::Display for AuthMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Implicit => f.write_str("implicit"),
            Self::Explicit => f.write_str("explicit"),
        }
    }
}

/// Storage probe backend selector
///
/// Both backends exercise the same permissions; they differ in how requests
/// and bodies are driven through the SDK.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SdkVersion {
    /// Single-request object API: buffered bodies, one list call
    #[default]
    V1,

    /// Streaming API: paginator listing, file-backed upload, streamed download
    V2,
}

impl FromStr for SdkVersion {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim() {
            "1" => Ok(Self::V1),
            "2" => Ok(Self::V2),
            other => Err(Error::Config(format!(
                "Unsupported SDK version '{other}'. Expected: 1 or 2"
            ))),
        }
    }
}

impl fmt::Display for SdkVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => f.write_str("1"),
            Self::V2 => f.write_str("2"),
        }
    }
}

/// Static key material for explicit auth
#[derive(Clone, PartialEq, Eq)]
pub struct StaticCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for StaticCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StaticCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"** redacted **")
            .field(
                "session_token",
                &self.session_token.as_ref().map(|_| "** redacted **"),
            )
            .finish()
    }
}

/// Everything one invocation of the check needs
#[derive(Debug, Clone)]
pub struct CheckConfig {
    /// Target bucket
    pub bucket: String,

    /// Credential source
    pub auth: AuthMode,

    /// Key material, required for explicit auth
    pub credentials: Option<StaticCredentials>,

    /// Region override; falls back to the provider chain when absent
    pub region: Option<String>,

    /// Trace SDK requests, responses and signing
    pub debug: bool,

    /// Storage probe backend
    pub sdk_version: SdkVersion,

    /// Local fixture files for this invocation
    pub fixtures: FixtureSet,
}

/// Raw flag values before validation
#[derive(Debug, Clone, Default)]
pub struct CheckConfigBuilder {
    pub bucket: String,
    pub auth: AuthMode,
    pub key_id: Option<String>,
    pub access_key: Option<String>,
    pub session_token: Option<String>,
    pub region: Option<String>,
    pub debug: bool,
    pub sdk_version: SdkVersion,
    pub fixture_dir: Option<PathBuf>,
}

impl CheckConfigBuilder {
    /// Validate the flag combination and produce a `CheckConfig`
    ///
    /// Fails when the bucket is empty, when only one of key id / secret key is
    /// given, or when explicit auth is requested without key material.
    pub fn build(self) -> Result<CheckConfig> {
        let bucket = self.bucket.trim().to_string();
        if bucket.is_empty() {
            return Err(Error::Config("Bucket name cannot be empty".into()));
        }

        let key_id = self.key_id.filter(|k| !k.is_empty());
        let access_key = self.access_key.filter(|k| !k.is_empty());
        let session_token = self.session_token.filter(|t| !t.is_empty());

        let credentials = match (key_id, access_key) {
            (Some(access_key_id), Some(secret_access_key)) => Some(StaticCredentials {
                access_key_id,
                secret_access_key,
                session_token,
            }),
            (None, None) => None,
            _ => {
                return Err(Error::Config(
                    "--key-id and --access-key must be supplied together".into(),
                ));
            }
        };

        let credentials = match self.auth {
            AuthMode::Explicit if credentials.is_none() => {
                return Err(Error::Config(
                    "Explicit auth requires --key-id and --access-key".into(),
                ));
            }
            AuthMode::Explicit => credentials,
            AuthMode::Implicit => {
                if credentials.is_some() {
                    tracing::warn!("--key-id and --access-key are ignored with implicit auth");
                }
                None
            }
        };

        let region = self
            .region
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());

        let fixtures = match self.fixture_dir {
            Some(dir) => FixtureSet::new(dir),
            None => FixtureSet::in_temp_dir(),
        };
        check_fixture_dir(fixtures.dir())?;

        Ok(CheckConfig {
            bucket,
            auth: self.auth,
            credentials,
            region,
            debug: self.debug,
            sdk_version: self.sdk_version,
            fixtures,
        })
    }
}

/// The fixture directory must be an existing directory with a UTF-8 path,
/// since cleanup matches fixture files with a glob pattern built from it.
fn check_fixture_dir(dir: &Path) -> Result<()> {
    if dir.to_str().is_none() {
        return Err(Error::Config(format!(
            "Fixture directory '{}' is not valid UTF-8",
            dir.display()
        )));
    }

    match std::fs::metadata(dir) {
        Ok(meta) if meta.is_dir() => Ok(()),
        Ok(_) => Err(Error::Config(format!(
            "Fixture directory '{}' is not a directory",
            dir.display()
        ))),
        Err(e) => Err(Error::Config(format!(
            "Fixture directory '{}' is not accessible: {e}",
            dir.display()
        ))),
    }
}
