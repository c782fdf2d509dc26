pub mod check;
pub mod config;
pub mod query;
pub mod serve;

use serde::Serialize;

/// Print a serializable value as JSON in the requested flavor
pub(crate) fn print_json<T: Serialize>(value: &T, pretty: bool) {
    let result = if pretty {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match result {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing output: {}", e),
    }
}
