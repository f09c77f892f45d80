//! SDK error classification
//!
//! Folds AWS SDK errors into the core error taxonomy so the CLI can pick an
//! exit code and the report can show the full error chain.

use aws_sdk_s3::error::{ProvideErrorMetadata, SdkError};
use aws_smithy_types::error::display::DisplayErrorContext;
use sc_core::Error;

/// Error codes that mean the credentials were rejected or lack permission
const AUTH_CODES: &[&str] = &[
    "AccessDenied",
    "AllAccessDisabled",
    "ExpiredToken",
    "InvalidAccessKeyId",
    "InvalidClientTokenId",
    "InvalidToken",
    "SignatureDoesNotMatch",
];

/// Error codes that mean the bucket or object does not exist
const NOT_FOUND_CODES: &[&str] = &["NoSuchBucket", "NoSuchKey", "NotFound"];

/// Convert an SDK error into a core error, prefixed with `context`
pub(crate) fn map_sdk_error<E>(context: &str, err: SdkError<E>) -> Error
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
{
    let status = err.raw_response().map(|r| r.status().as_u16());
    let code = err.code().map(str::to_string);
    let message = format!("{context}: {}", DisplayErrorContext(&err));
    classify(status, code.as_deref(), message)
}

/// Pick the error variant from the HTTP status and service error code
pub(crate) fn classify(status: Option<u16>, code: Option<&str>, message: String) -> Error {
    if let Some(code) = code {
        if AUTH_CODES.contains(&code) {
            return Error::Auth(message);
        }
        if NOT_FOUND_CODES.contains(&code) {
            return Error::NotFound(message);
        }
    }

    match status {
        Some(401 | 403) => Error::Auth(message),
        Some(404) => Error::NotFound(message),
        _ => Error::Network(message),
    }
}
