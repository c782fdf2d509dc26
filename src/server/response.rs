//! HTTP response assembly for lookups
//!
//! Every lookup outcome becomes exactly one response:
//!
//! | outcome | status |
//! |---------|--------|
//! | success | 200, `{"AS<n>": [...]}` |
//! | `InvalidAsnFormat`, `AsnOutOfRange`, `UnknownIrrSource`, `InvalidQuery` | 400 |
//! | `SpawnFailure`, `NonZeroExit` | 502 |
//! | `TimedOut` | 504 |
//! | `MalformedOutput`, `InternalError` | 500 |
//!
//! Error bodies are `{"detail": <message>, "reason": <code>}`; the detail is
//! [`LookupError::public_message`], never the diagnostic `Display` text.

use crate::error::{ErrorReason, LookupError};
use crate::lens::lookup::LookupResponse;
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use tracing::{debug, error, warn};

/// JSON body of every non-200 lookup response
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody {
    pub detail: String,
    pub reason: ErrorReason,
}

impl From<&LookupError> for ErrorBody {
    fn from(err: &LookupError) -> Self {
        Self {
            detail: err.public_message(),
            reason: err.reason(),
        }
    }
}

/// HTTP status for a failed lookup
pub fn status_for(err: &LookupError) -> StatusCode {
    match err.reason() {
        ErrorReason::InvalidAsnFormat
        | ErrorReason::AsnOutOfRange
        | ErrorReason::UnknownIrrSource
        | ErrorReason::InvalidQuery => StatusCode::BAD_REQUEST,
        ErrorReason::SpawnFailure | ErrorReason::NonZeroExit => StatusCode::BAD_GATEWAY,
        ErrorReason::TimedOut => StatusCode::GATEWAY_TIMEOUT,
        ErrorReason::MalformedOutput | ErrorReason::InternalError => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Turn a lookup outcome into the HTTP response sent to the client
pub fn assemble(result: Result<LookupResponse, LookupError>) -> Response {
    match result {
        Ok(response) => match serde_json::to_vec(&response) {
            Ok(body) => (
                StatusCode::OK,
                [(header::CONTENT_TYPE, "application/json")],
                body,
            )
                .into_response(),
            Err(e) => error_response(&LookupError::Internal(format!(
                "failed to serialize response for {}: {}",
                response.asn, e
            ))),
        },
        Err(err) => error_response(&err),
    }
}

/// Build the JSON error response for a failed lookup
pub fn error_response(err: &LookupError) -> Response {
    let status = status_for(err);
    if err.is_client_error() {
        debug!("Lookup rejected ({}): {}", status, err);
    } else if status == StatusCode::INTERNAL_SERVER_ERROR {
        error!("Lookup failed ({}): {}", status, err);
    } else {
        warn!("Lookup failed ({}): {}", status, err);
    }

    (status, Json(ErrorBody::from(err))).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{ExecutionError, ParseError, ValidationError};
    use crate::lens::lookup::{AsNumber, PrefixRecord};
    use axum::body::to_bytes;
    use serde_json::{json, Value};
    use std::time::Duration;

    async fn body_json(response: Response) -> Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_status_mapping() {
        let cases: Vec<(LookupError, StatusCode)> = vec![
            (
                ValidationError::InvalidAsnFormat("x".to_string()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ValidationError::AsnOutOfRange("0".to_string()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ValidationError::UnknownIrrSource("FAKE".to_string()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ValidationError::InvalidQuery("duplicate field `irr`".to_string()).into(),
                StatusCode::BAD_REQUEST,
            ),
            (
                ExecutionError::SpawnFailure("enoent".to_string()).into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ExecutionError::NonZeroExit {
                    code: Some(1),
                    stderr: String::new(),
                }
                .into(),
                StatusCode::BAD_GATEWAY,
            ),
            (
                ExecutionError::TimedOut(Duration::from_secs(60)).into(),
                StatusCode::GATEWAY_TIMEOUT,
            ),
            (
                ParseError::MalformedOutput("eof".to_string()).into(),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (
                LookupError::Internal("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (err, status) in cases {
            assert_eq!(status_for(&err), status, "error {:?}", err);
        }
    }

    #[tokio::test]
    async fn test_assemble_success() {
        let response = LookupResponse::new(
            AsNumber::new(15169),
            vec![PrefixRecord {
                prefix: "8.8.8.0/24".to_string(),
                exact: true,
                source: "RADB".to_string(),
            }],
        );

        let http = assemble(Ok(response));
        assert_eq!(http.status(), StatusCode::OK);
        assert_eq!(
            http.headers()[header::CONTENT_TYPE],
            "application/json"
        );
        assert_eq!(
            body_json(http).await,
            json!({"AS15169": [{"prefix": "8.8.8.0/24", "exact": true, "source": "RADB"}]})
        );
    }

    #[tokio::test]
    async fn test_assemble_empty_success() {
        let http = assemble(Ok(LookupResponse::new(AsNumber::new(400427), vec![])));
        assert_eq!(http.status(), StatusCode::OK);
        assert_eq!(body_json(http).await, json!({"AS400427": []}));
    }

    #[tokio::test]
    async fn test_assemble_error_body() {
        let err: LookupError = ExecutionError::NonZeroExit {
            code: Some(2),
            stderr: "ERROR: whois.radb.net: connection refused".to_string(),
        }
        .into();

        let http = assemble(Err(err));
        assert_eq!(http.status(), StatusCode::BAD_GATEWAY);

        let body = body_json(http).await;
        assert_eq!(body["reason"], "NonZeroExit");
        let detail = body["detail"].as_str().unwrap();
        assert!(detail.contains("code: 2"));
        assert!(!detail.contains("whois.radb.net"));
    }
}
