//! Error types for sc-core
//!
//! Provides a unified error type that can be converted to appropriate exit codes.
//! Fatal setup failures and per-probe failures share this type; whether an error
//! aborts the check depends on where it is raised, not on its variant.

use thiserror::Error;

/// Result type alias for sc-core operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error types for s3checker operations
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid flag combination or value
    #[error("Configuration error: {0}")]
    Config(String),

    /// Credential resolution or caller identity failure, or access denied
    #[error("Authentication failed: {0}")]
    Auth(String),

    /// Bucket or object does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Request failed in transit or with an unexpected service error
    #[error("Network error: {0}")]
    Network(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid fixture glob pattern
    #[error("Invalid fixture pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    /// One or more local fixture files could not be removed
    #[error("failed to cleanup test files: {0}")]
    Cleanup(String),

    /// General error
    #[error("{0}")]
    General(String),
}

impl Error {
    /// Get the appropriate exit code for this error
    pub const fn exit_code(&self) -> i32 {
        match self {
            Error::Config(_) => 2,   // UsageError
            Error::Network(_) => 3,  // NetworkError
            Error::Auth(_) => 4,     // AuthError
            Error::NotFound(_) => 5, // NotFound
            _ => 1,                  // GeneralError
        }
    }
}
