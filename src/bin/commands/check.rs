use clap::Args;
use pfxlookup::{check_dependencies, LookupConfig, OutputFormat};
use serde::Serialize;

/// Arguments for the Check command
#[derive(Args)]
pub struct CheckArgs {}

#[derive(Debug, Serialize)]
struct CheckInfo {
    tool: String,
    found: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    path: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

pub fn run(config: &LookupConfig, _args: CheckArgs, output_format: OutputFormat) {
    let info = match check_dependencies(config) {
        Ok(path) => CheckInfo {
            tool: config.bgpq4_path.clone(),
            found: true,
            path: Some(path.to_string_lossy().to_string()),
            error: None,
        },
        Err(e) => CheckInfo {
            tool: config.bgpq4_path.clone(),
            found: false,
            path: None,
            error: Some(e.to_string()),
        },
    };

    if output_format.is_json() {
        super::print_json(&info, output_format == OutputFormat::JsonPretty);
    } else {
        match (&info.path, &info.error) {
            (Some(path), _) => println!("{}: found at {}", info.tool, path),
            (None, Some(error)) => eprintln!("ERROR: {}", error),
            (None, None) => {}
        }
    }

    if !info.found {
        std::process::exit(1);
    }
}
