//! Exit code definitions for the s3checker CLI
//!
//! Scripts rely on these values. Changing one is a breaking change.

/// Exit codes for the s3checker application.
///
/// Probe failures are part of a successful report and never change the exit
/// code; only failures that prevent the report from being produced do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(i32)]
pub enum ExitCode {
    /// Check completed and the report was printed
    Success = 0,

    /// General/unspecified error
    GeneralError = 1,

    /// User input error: invalid flag value or combination
    UsageError = 2,

    /// Network error while resolving identity or bucket region
    NetworkError = 3,

    /// Credentials could not be resolved or were rejected
    AuthError = 4,

    /// Bucket does not exist
    NotFound = 5,
}

impl ExitCode {
    /// Convert exit code to i32 for use with std::process::exit
    #[inline]
    pub const fn as_i32(self) -> i32 {
        self as i32
    }

    /// Create exit code from i32 value
    ///
    /// Returns None if the value doesn't correspond to a known exit code.
    pub const fn from_i32(code: i32) -> Option<Self> {
        match code {
            0 => Some(Self::Success),
            1 => Some(Self::GeneralError),
            2 => Some(Self::UsageError),
            3 => Some(Self::NetworkError),
            4 => Some(Self::AuthError),
            5 => Some(Self::NotFound),
            _ => None,
        }
    }

    /// Exit code for an error that aborted the check
    pub fn from_error(error: &sc_core::Error) -> Self {
        Self::from_i32(error.exit_code()).unwrap_or(Self::GeneralError)
    }

    /// Get a human-readable description of the exit code
    pub const fn description(self) -> &'static str {
        match self {
            Self::Success => "Check completed",
            Self::GeneralError => "General error",
            Self::UsageError => "Invalid arguments",
            Self::NetworkError => "Network error",
            Self::AuthError => "Authentication or permission failure",
            Self::NotFound => "Bucket not found",
        }
    }
}

impl From<ExitCode> for i32 {
    fn from(code: ExitCode) -> Self {
        code.as_i32()
    }
}

impl std::fmt::Display for ExitCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.description(), self.as_i32())
    }
}
