//! Parsing of bgpq4 JSON output
//!
//! Accepted shapes:
//!
//! - `{"AS15169": [{"prefix": "8.8.8.0/24", "exact": true}, ...]}`, which is
//!   what `bgpq4 -j -l AS15169` prints; arrays under every key are concatenated
//! - `[{"prefix": "8.8.8.0/24", "exact": true}, ...]`
//! - empty output or `null`, meaning no route objects were found
//!
//! Each run queries exactly one registry, so every record is tagged with that
//! registry. Any other fields in a route object are ignored.

use super::types::{IrrSource, PrefixRecord};
use crate::error::ParseError;
use ipnet::Ipv4Net;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

/// Records extracted from one run of the tool
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedRoutes {
    /// Accepted records, in the order the tool printed them
    pub records: Vec<PrefixRecord>,
    /// Records skipped for missing fields or an invalid prefix
    pub dropped: usize,
}

#[derive(Deserialize)]
struct RouteObject {
    prefix: String,
    exact: bool,
}

/// Parse the stdout of a run restricted to `source` into prefix records.
///
/// Fails with `MalformedOutput` when the text is not JSON, has an unexpected
/// shape, or when not a single record carries both `prefix` and `exact`.
pub fn parse(stdout: &[u8], source: IrrSource) -> Result<ParsedRoutes, ParseError> {
    let text = std::str::from_utf8(stdout)
        .map_err(|e| ParseError::MalformedOutput(format!("output is not UTF-8: {}", e)))?;
    if text.trim().is_empty() {
        return Ok(ParsedRoutes::default());
    }

    let value: Value =
        serde_json::from_str(text).map_err(|e| ParseError::MalformedOutput(e.to_string()))?;
    let entries = route_entries(value)?;
    let total = entries.len();

    let mut parsed = ParsedRoutes::default();
    let mut incomplete = 0;
    for entry in entries {
        let route = match serde_json::from_value::<RouteObject>(entry) {
            Ok(route) => route,
            Err(e) => {
                debug!("Skipping incomplete route object: {}", e);
                incomplete += 1;
                continue;
            }
        };

        if route.prefix.parse::<Ipv4Net>().is_err() {
            debug!("Skipping route object with invalid prefix '{}'", route.prefix);
            parsed.dropped += 1;
            continue;
        }

        parsed.records.push(PrefixRecord {
            prefix: route.prefix,
            exact: route.exact,
            source: source.as_str().to_string(),
        });
    }

    if total > 0 && incomplete == total {
        return Err(ParseError::MalformedOutput(
            "no route object has both 'prefix' and 'exact' fields".to_string(),
        ));
    }
    parsed.dropped += incomplete;

    Ok(parsed)
}

/// Flatten the accepted top-level shapes into a list of route entries
fn route_entries(value: Value) -> Result<Vec<Value>, ParseError> {
    match value {
        Value::Null => Ok(Vec::new()),
        Value::Array(items) => Ok(items),
        Value::Object(map) => {
            let mut items = Vec::new();
            for (key, routes) in map {
                match routes {
                    Value::Array(routes) => items.extend(routes),
                    Value::Null => {}
                    _ => {
                        return Err(ParseError::MalformedOutput(format!(
                            "expected a list of route objects under '{}'",
                            key
                        )))
                    }
                }
            }
            Ok(items)
        }
        _ => Err(ParseError::MalformedOutput(
            "expected a JSON array or object".to_string(),
        )),
    }
}
