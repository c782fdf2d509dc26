//! Lookup handler
//!
//! `GET /lookup?asn=<asn>&irr=<sources>` runs one prefix lookup. Both query
//! parameters are optional and passed to [`LookupLens`] untouched; all
//! validation happens there. A query string that does not deserialize at
//! all (e.g. a repeated parameter) is answered with the same JSON error body
//! as any other invalid input.
//!
//! [`LookupLens`]: crate::lens::lookup::LookupLens

use crate::error::{LookupError, ValidationError};
use crate::lens::lookup::LookupArgs;
use crate::server::response::{assemble, error_response};
use crate::server::ServerState;
use axum::extract::rejection::QueryRejection;
use axum::extract::{Query, State};
use axum::response::Response;

/// Handler for `GET /lookup`
pub async fn lookup_handler(
    State(state): State<ServerState>,
    query: Result<Query<LookupArgs>, QueryRejection>,
) -> Response {
    let Query(args) = match query {
        Ok(query) => query,
        Err(rejection) => {
            let err = LookupError::from(ValidationError::InvalidQuery(rejection.body_text()));
            return error_response(&err);
        }
    };

    tracing::debug!("Lookup request: {:?}", args);
    assemble(state.lens.lookup(&args).await)
}
