use aws_sdk_dynamodb::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use thiserror::Error;

/// Service error codes that mean the credentials themselves were rejected.
///
/// Everything else (throttling, timeouts, missing tables, dispatch failures)
/// counts as the service being unavailable for this tick.
const AUTH_ERROR_CODES: &[&str] = &[
    "UnrecognizedClientException",
    "ExpiredTokenException",
    "AccessDeniedException",
    "InvalidClientTokenId",
    "MissingAuthenticationToken",
    "SignatureDoesNotMatch",
];

/// Core errors for the pool monitor.
///
/// Nothing here is fatal: `InvalidRecord` skips one record, the other two
/// fail one poll tick and the loop retries on the next one.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A single record could not be decoded; names the offending key.
    #[error("invalid record {key}: {reason}")]
    InvalidRecord { key: String, reason: String },

    /// The external service could not be reached or refused the call.
    #[error("service unavailable: {0}")]
    Unavailable(String),

    /// Credentials were rejected by the service.
    #[error("credentials rejected: {0}")]
    Auth(String),
}

impl CoreError {
    /// Map an AWS SDK error onto the monitor's taxonomy.
    ///
    /// Both `Auth` and `Unavailable` are retried identically by the poll
    /// loop; the split only changes the message shown to the operator.
    pub fn from_sdk<E, R>(err: SdkError<E, R>) -> Self
    where
        E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
        R: std::fmt::Debug,
    {
        let is_auth = err
            .as_service_error()
            .and_then(|e| e.code())
            .is_some_and(is_auth_code);
        let message = DisplayErrorContext(err).to_string();

        if is_auth {
            Self::Auth(message)
        } else {
            Self::Unavailable(message)
        }
    }
}

fn is_auth_code(code: &str) -> bool {
    AUTH_ERROR_CODES.contains(&code)
}
