//! Common utility functions for lens modules
//!
//! This module provides the shared output format selector and the renderer
//! that turns lookup results into text for the terminal.

use crate::lens::lookup::LookupResponse;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Unified output format for lens commands
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Pretty table with borders (default)
    #[default]
    Table,
    /// Markdown table format
    Markdown,
    /// Compact JSON (single line)
    Json,
    /// Pretty-printed JSON with indentation
    JsonPretty,
    /// JSON Lines format (one prefix record per line)
    JsonLine,
    /// Pipe-separated values with header
    Psv,
}

impl OutputFormat {
    /// Check if this is a JSON variant
    pub fn is_json(&self) -> bool {
        matches!(self, Self::Json | Self::JsonPretty | Self::JsonLine)
    }

    /// Check if this is a table variant
    pub fn is_table(&self) -> bool {
        matches!(self, Self::Table | Self::Markdown)
    }

    /// Get a list of all format names for help text
    pub fn all_names() -> &'static [&'static str] {
        &[
            "table",
            "markdown",
            "json",
            "json-pretty",
            "json-line",
            "psv",
        ]
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "table"),
            Self::Markdown => write!(f, "markdown"),
            Self::Json => write!(f, "json"),
            Self::JsonPretty => write!(f, "json-pretty"),
            Self::JsonLine => write!(f, "json-line"),
            Self::Psv => write!(f, "psv"),
        }
    }
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "table" | "pretty" => Ok(Self::Table),
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            "json-pretty" | "jsonpretty" => Ok(Self::JsonPretty),
            "json-line" | "jsonline" | "jsonl" | "ndjson" => Ok(Self::JsonLine),
            "psv" | "pipe" => Ok(Self::Psv),
            _ => Err(format!(
                "Unknown output format '{}'. Valid formats: {}",
                s,
                Self::all_names().join(", ")
            )),
        }
    }
}

/// Render a lookup response in the given format
pub fn format_response(response: &LookupResponse, format: OutputFormat) -> anyhow::Result<String> {
    let text = match format {
        OutputFormat::Json => serde_json::to_string(response)?,
        OutputFormat::JsonPretty => serde_json::to_string_pretty(response)?,
        OutputFormat::JsonLine => response
            .prefixes
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<Vec<_>, _>>()?
            .join("\n"),
        OutputFormat::Psv => {
            let mut lines = vec!["prefix|exact|source".to_string()];
            lines.extend(
                response
                    .prefixes
                    .iter()
                    .map(|r| format!("{}|{}|{}", r.prefix, r.exact, r.source)),
            );
            lines.join("\n")
        }
        OutputFormat::Table | OutputFormat::Markdown => format_table(response, format)?,
    };
    Ok(text)
}

#[cfg(feature = "display")]
fn format_table(response: &LookupResponse, format: OutputFormat) -> anyhow::Result<String> {
    use tabled::settings::Style;
    use tabled::Table;

    let mut table = Table::new(&response.prefixes);
    match format {
        OutputFormat::Markdown => table.with(Style::markdown()),
        _ => table.with(Style::rounded()),
    };
    Ok(format!("{}\n{}", response.key(), table))
}

#[cfg(not(feature = "display"))]
fn format_table(_response: &LookupResponse, format: OutputFormat) -> anyhow::Result<String> {
    anyhow::bail!("output format '{}' requires the 'display' feature", format)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lens::lookup::{AsNumber, PrefixRecord};

    fn response() -> LookupResponse {
        LookupResponse::new(
            AsNumber::new(15169),
            vec![
                PrefixRecord {
                    prefix: "8.8.8.0/24".to_string(),
                    exact: true,
                    source: "RADB".to_string(),
                },
                PrefixRecord {
                    prefix: "8.8.4.0/24".to_string(),
                    exact: false,
                    source: "RIPE".to_string(),
                },
            ],
        )
    }

    #[test]
    fn test_output_format_from_str() {
        assert_eq!(
            OutputFormat::from_str("table").unwrap(),
            OutputFormat::Table
        );
        assert_eq!(
            OutputFormat::from_str("pretty").unwrap(),
            OutputFormat::Table
        );
        assert_eq!(
            OutputFormat::from_str("md").unwrap(),
            OutputFormat::Markdown
        );
        assert_eq!(OutputFormat::from_str("JSON").unwrap(), OutputFormat::Json);
        assert_eq!(
            OutputFormat::from_str("json-pretty").unwrap(),
            OutputFormat::JsonPretty
        );
        assert_eq!(
            OutputFormat::from_str("jsonl").unwrap(),
            OutputFormat::JsonLine
        );
        assert_eq!(OutputFormat::from_str("psv").unwrap(), OutputFormat::Psv);
        assert!(OutputFormat::from_str("invalid").is_err());
    }

    #[test]
    fn test_output_format_display() {
        for name in OutputFormat::all_names() {
            assert_eq!(OutputFormat::from_str(name).unwrap().to_string(), *name);
        }
    }

    #[test]
    fn test_output_format_kinds() {
        assert!(OutputFormat::JsonLine.is_json());
        assert!(!OutputFormat::Psv.is_json());
        assert!(OutputFormat::Markdown.is_table());
        assert!(!OutputFormat::Json.is_table());
    }

    #[test]
    fn test_format_response_json() {
        let text = format_response(&response(), OutputFormat::Json).unwrap();
        assert!(text.starts_with(r#"{"AS15169":[{"prefix":"8.8.8.0/24""#));

        let lines = format_response(&response(), OutputFormat::JsonLine).unwrap();
        assert_eq!(lines.lines().count(), 2);
    }

    #[test]
    fn test_format_response_psv() {
        let text = format_response(&response(), OutputFormat::Psv).unwrap();
        assert_eq!(
            text,
            "prefix|exact|source\n8.8.8.0/24|true|RADB\n8.8.4.0/24|false|RIPE"
        );
    }

    #[cfg(feature = "display")]
    #[test]
    fn test_format_response_table() {
        let text = format_response(&response(), OutputFormat::Markdown).unwrap();
        assert!(text.starts_with("AS15169\n"));
        assert!(text.contains("8.8.4.0/24"));
        assert!(text.contains("| prefix"));
    }
}
