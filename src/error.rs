//! Error types for the lookup pipeline
//!
//! Every stage of the pipeline has its own error enum. They are folded into
//! [`LookupError`], which carries a stable [`ErrorReason`] code and a
//! client-safe message. The `Display` output of these errors may include
//! diagnostic detail (e.g. tool stderr) and is meant for server logs only.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Input validation failures. Raised before any subprocess is spawned.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("invalid ASN format: '{0}'")]
    InvalidAsnFormat(String),

    #[error("ASN out of range or reserved: '{0}'")]
    AsnOutOfRange(String),

    #[error("unknown IRR source: '{0}'")]
    UnknownIrrSource(String),

    #[error("invalid query string: {0}")]
    InvalidQuery(String),
}

/// Subprocess execution failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("route query tool timed out after {0:?}")]
    TimedOut(Duration),

    #[error("route query tool exited with code {code:?}: {stderr}")]
    NonZeroExit { code: Option<i32>, stderr: String },

    #[error("failed to spawn route query tool: {0}")]
    SpawnFailure(String),
}

/// Tool output parsing failures
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParseError {
    #[error("malformed route query output: {0}")]
    MalformedOutput(String),
}

/// Any failure of a single lookup request
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LookupError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("internal error: {0}")]
    Internal(String),
}

/// Stable, machine-readable reason code attached to every error response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorReason {
    InvalidAsnFormat,
    AsnOutOfRange,
    UnknownIrrSource,
    InvalidQuery,
    TimedOut,
    NonZeroExit,
    SpawnFailure,
    MalformedOutput,
    InternalError,
}

impl fmt::Display for ErrorReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorReason::InvalidAsnFormat => "InvalidAsnFormat",
            ErrorReason::AsnOutOfRange => "AsnOutOfRange",
            ErrorReason::UnknownIrrSource => "UnknownIrrSource",
            ErrorReason::InvalidQuery => "InvalidQuery",
            ErrorReason::TimedOut => "TimedOut",
            ErrorReason::NonZeroExit => "NonZeroExit",
            ErrorReason::SpawnFailure => "SpawnFailure",
            ErrorReason::MalformedOutput => "MalformedOutput",
            ErrorReason::InternalError => "InternalError",
        };
        write!(f, "{}", name)
    }
}

impl LookupError {
    /// Get the reason code for this error
    pub fn reason(&self) -> ErrorReason {
        match self {
            LookupError::Validation(ValidationError::InvalidAsnFormat(_)) => {
                ErrorReason::InvalidAsnFormat
            }
            LookupError::Validation(ValidationError::AsnOutOfRange(_)) => {
                ErrorReason::AsnOutOfRange
            }
            LookupError::Validation(ValidationError::UnknownIrrSource(_)) => {
                ErrorReason::UnknownIrrSource
            }
            LookupError::Validation(ValidationError::InvalidQuery(_)) => ErrorReason::InvalidQuery,
            LookupError::Execution(ExecutionError::TimedOut(_)) => ErrorReason::TimedOut,
            LookupError::Execution(ExecutionError::NonZeroExit { .. }) => ErrorReason::NonZeroExit,
            LookupError::Execution(ExecutionError::SpawnFailure(_)) => ErrorReason::SpawnFailure,
            LookupError::Parse(ParseError::MalformedOutput(_)) => ErrorReason::MalformedOutput,
            LookupError::Internal(_) => ErrorReason::InternalError,
        }
    }

    /// Whether the error was caused by the request rather than the server
    pub fn is_client_error(&self) -> bool {
        matches!(self, LookupError::Validation(_))
    }

    /// Message that is safe to return to a client.
    ///
    /// Validation messages echo the offending input back; everything else is
    /// a fixed description without stderr, paths, or error chains.
    pub fn public_message(&self) -> String {
        match self {
            LookupError::Validation(ValidationError::InvalidAsnFormat(raw)) => format!(
                "Invalid ASN format: '{}'. Expected a number with an optional 'AS' prefix.",
                raw
            ),
            LookupError::Validation(ValidationError::AsnOutOfRange(raw)) => format!(
                "Invalid ASN value: '{}'. Must be a positive 32-bit non-private ASN.",
                raw
            ),
            LookupError::Validation(ValidationError::UnknownIrrSource(token)) => {
                format!("Invalid IRR source provided: {}", token)
            }
            LookupError::Validation(ValidationError::InvalidQuery(cause)) => {
                format!("Invalid query string: {}", cause)
            }
            LookupError::Execution(ExecutionError::TimedOut(timeout)) => format!(
                "BGP query execution timed out after {} seconds.",
                timeout.as_secs()
            ),
            LookupError::Execution(ExecutionError::NonZeroExit { code, .. }) => match code {
                Some(code) => format!(
                    "Error executing backend BGP query (code: {}). See server logs.",
                    code
                ),
                None => "Backend BGP query was terminated. See server logs.".to_string(),
            },
            LookupError::Execution(ExecutionError::SpawnFailure(_)) => {
                "Backend BGP query tool could not be started. See server logs.".to_string()
            }
            LookupError::Parse(_) => "Failed to parse output from BGP query tool.".to_string(),
            LookupError::Internal(_) => {
                "An unexpected error occurred. See server logs.".to_string()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reason_mapping() {
        let err: LookupError = ValidationError::UnknownIrrSource("FAKE".to_string()).into();
        assert_eq!(err.reason(), ErrorReason::UnknownIrrSource);
        assert!(err.is_client_error());

        let err: LookupError =
            ValidationError::InvalidQuery("duplicate field `asn`".to_string()).into();
        assert_eq!(err.reason(), ErrorReason::InvalidQuery);
        assert_eq!(err.reason().to_string(), "InvalidQuery");
        assert!(err.is_client_error());
        assert!(err.public_message().contains("duplicate field `asn`"));

        let err: LookupError = ExecutionError::TimedOut(Duration::from_secs(5)).into();
        assert_eq!(err.reason(), ErrorReason::TimedOut);
        assert!(!err.is_client_error());

        let err: LookupError = ParseError::MalformedOutput("eof".to_string()).into();
        assert_eq!(err.reason(), ErrorReason::MalformedOutput);

        let err = LookupError::Internal("boom".to_string());
        assert_eq!(err.reason(), ErrorReason::InternalError);
    }

    #[test]
    fn test_public_message_hides_stderr() {
        let err: LookupError = ExecutionError::NonZeroExit {
            code: Some(1),
            stderr: "FATAL: cannot connect to whois.radb.net:43 at /usr/local/etc".to_string(),
        }
        .into();

        let msg = err.public_message();
        assert!(msg.contains("code: 1"));
        assert!(!msg.contains("FATAL"));
        assert!(!msg.contains("/usr/local"));

        // Display keeps the diagnostic detail for logs
        assert!(err.to_string().contains("FATAL"));
    }

    #[test]
    fn test_public_message_hides_spawn_cause() {
        let err: LookupError =
            ExecutionError::SpawnFailure("No such file or directory: /opt/bgpq4".to_string())
                .into();
        assert!(!err.public_message().contains("/opt/bgpq4"));
    }

    #[test]
    fn test_public_message_echoes_invalid_source() {
        let err: LookupError = ValidationError::UnknownIrrSource("FAKE".to_string()).into();
        assert!(err.public_message().contains("FAKE"));
    }

    #[test]
    fn test_reason_serialization() {
        let json = serde_json::to_string(&ErrorReason::UnknownIrrSource).unwrap();
        assert_eq!(json, "\"UnknownIrrSource\"");
        assert_eq!(ErrorReason::TimedOut.to_string(), "TimedOut");
    }
}
