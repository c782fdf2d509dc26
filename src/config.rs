use crate::lens::lookup::validate::parse_asn;
use crate::lens::lookup::{AsnRange, IrrSource, IrrSourceSet, DEFAULT_RESERVED_ASN_RANGES};
use anyhow::{anyhow, Result};
use config::Config;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// Service configuration, built once at startup and shared read-only
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LookupConfig {
    /// ASN looked up when a request does not name one
    pub default_asn: String,

    /// IRR sources a request may select, in the order queried by default
    pub irr_sources: IrrSourceSet,

    /// AS numbers that are never looked up
    pub reserved_asn_ranges: Vec<AsnRange>,

    /// Wall-clock limit for one bgpq4 run, in seconds (default: 60)
    pub timeout_secs: u64,

    /// bgpq4 executable, either a bare name resolved through PATH or a path
    pub bgpq4_path: String,

    /// Address the HTTP server binds to
    pub address: String,

    /// Port the HTTP server listens on
    pub port: u16,
}

const EMPTY_CONFIG: &str = r#"### pfxlookup configuration file

### ASN looked up when a request omits `asn`
# default_asn = "AS400427"

### IRR sources a request may select (comma-separated)
# irr_sources = "AFRINIC,ALTDB,APNIC,ARIN,BELL,LEVEL3,NTTCOM,RADB,REACH,RIPE,RPKI,SAVVIS,TC"

### AS numbers that are never looked up (single ASNs or inclusive ranges)
# reserved_asn_ranges = "23456,64496-64511,64512-65534,65535,65536-65551,4200000000-4294967294,4294967295"

### bgpq4 settings
# bgpq4_path = "bgpq4"
# timeout_secs = 60                 # 1 minute

### HTTP server
# address = "127.0.0.1"
# port = 8000
"#;

const DEFAULT_ASN: &str = "AS400427";
const DEFAULT_TIMEOUT_SECS: u64 = 60;
const DEFAULT_BGPQ4_PATH: &str = "bgpq4";
const DEFAULT_ADDRESS: &str = "127.0.0.1";
const DEFAULT_PORT: u16 = 8000;

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            default_asn: DEFAULT_ASN.to_string(),
            irr_sources: IrrSourceSet::all(),
            reserved_asn_ranges: DEFAULT_RESERVED_ASN_RANGES.to_vec(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            bgpq4_path: DEFAULT_BGPQ4_PATH.to_string(),
            address: DEFAULT_ADDRESS.to_string(),
            port: DEFAULT_PORT,
        }
    }
}

impl LookupConfig {
    /// Function to create and initialize a new configuration
    pub fn new(path: &Option<String>) -> Result<LookupConfig> {
        let mut builder = Config::builder();

        // Add in toml configuration file
        match path {
            Some(p) => {
                let path = Path::new(p.as_str());
                if path.exists() {
                    let path_str = path
                        .to_str()
                        .ok_or_else(|| anyhow!("Could not convert path to string"))?;
                    builder = builder.add_source(config::File::with_name(path_str));
                } else {
                    std::fs::write(p.as_str(), EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file: {}", e))?;
                }
            }
            None => {
                // By default use $HOME/.pfxlookup/pfxlookup.toml as the configuration file path
                let home_dir =
                    dirs::home_dir().ok_or_else(|| anyhow!("Could not find home directory"))?;
                let config_dir = home_dir.join(".pfxlookup");
                std::fs::create_dir_all(&config_dir)
                    .map_err(|e| anyhow!("Unable to create pfxlookup directory: {}", e))?;

                let p = config_dir.join("pfxlookup.toml");
                let p_str = p
                    .to_str()
                    .ok_or_else(|| anyhow!("Could not convert config path to string"))?;
                if p.exists() {
                    builder = builder.add_source(config::File::with_name(p_str));
                } else {
                    std::fs::write(&p, EMPTY_CONFIG)
                        .map_err(|e| anyhow!("Unable to create config file {}: {}", p_str, e))?;
                }
            }
        }

        // Add in settings from the environment (with a prefix of PFXLOOKUP)
        // E.g., `PFXLOOKUP_TIMEOUT_SECS=30 ./pfxlookup serve` would shorten the bgpq4 timeout
        builder = builder.add_source(config::Environment::with_prefix("PFXLOOKUP"));

        let settings = builder
            .build()
            .map_err(|e| anyhow!("Failed to build configuration: {}", e))?;

        let config = settings
            .try_deserialize::<HashMap<String, String>>()
            .map_err(|e| anyhow!("Failed to deserialize configuration: {}", e))?;

        Self::from_settings(&config)
    }

    /// Build a configuration from flat string settings.
    ///
    /// Absent keys take their defaults; present keys must be valid.
    pub fn from_settings(settings: &HashMap<String, String>) -> Result<LookupConfig> {
        let defaults = LookupConfig::default();
        let get = |key: &str| {
            settings
                .get(key)
                .map(|v| v.trim())
                .filter(|v| !v.is_empty())
        };

        let reserved_asn_ranges = match get("reserved_asn_ranges") {
            Some(raw) => parse_asn_ranges(raw)?,
            None => defaults.reserved_asn_ranges,
        };

        let default_asn = match get("default_asn") {
            Some(raw) => raw.to_string(),
            None => defaults.default_asn,
        };
        parse_asn(&default_asn, &reserved_asn_ranges)
            .map_err(|e| anyhow!("Invalid default_asn: {}", e))?;

        let irr_sources = match get("irr_sources") {
            Some(raw) => parse_source_list(raw)?,
            None => defaults.irr_sources,
        };

        let timeout_secs = match get("timeout_secs") {
            Some(raw) => raw
                .parse::<u64>()
                .ok()
                .filter(|secs| *secs > 0)
                .ok_or_else(|| {
                    anyhow!("Invalid timeout_secs '{}': expected a positive integer", raw)
                })?,
            None => defaults.timeout_secs,
        };

        let port = match get("port") {
            Some(raw) => raw
                .parse::<u16>()
                .map_err(|e| anyhow!("Invalid port '{}': {}", raw, e))?,
            None => defaults.port,
        };

        Ok(LookupConfig {
            default_asn,
            irr_sources,
            reserved_asn_ranges,
            timeout_secs,
            bgpq4_path: get("bgpq4_path")
                .map(str::to_string)
                .unwrap_or(defaults.bgpq4_path),
            address: get("address")
                .map(str::to_string)
                .unwrap_or(defaults.address),
            port,
        })
    }

    /// Get bgpq4 timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Display configuration summary
    pub fn summary(&self) -> String {
        let reserved = self
            .reserved_asn_ranges
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join(",");

        [
            format!("Default ASN:        {}", self.default_asn),
            format!("IRR Sources:        {}", self.irr_sources),
            format!("Reserved ASNs:      {}", reserved),
            format!("bgpq4 Path:         {}", self.bgpq4_path),
            format!("bgpq4 Timeout:      {} seconds", self.timeout_secs),
            format!("Listen Address:     {}:{}", self.address, self.port),
        ]
        .join("\n")
    }

    /// Get the config file path
    pub fn config_file_path() -> String {
        let home_dir = dirs::home_dir()
            .map(|h| h.to_string_lossy().to_string())
            .unwrap_or_else(|| "~".to_string());
        format!("{}/.pfxlookup/pfxlookup.toml", home_dir)
    }
}

fn parse_asn_ranges(raw: &str) -> Result<Vec<AsnRange>> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<AsnRange>().map_err(|e| anyhow!(e)))
        .collect()
}

fn parse_source_list(raw: &str) -> Result<IrrSourceSet> {
    let sources = raw
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| s.parse::<IrrSource>().map_err(|e| anyhow!(e)))
        .collect::<Result<Vec<_>>>()?;

    IrrSourceSet::from_ordered(sources)
        .ok_or_else(|| anyhow!("irr_sources must name at least one IRR source"))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults() {
        let config = LookupConfig::from_settings(&HashMap::new()).unwrap();
        assert_eq!(config, LookupConfig::default());
        assert_eq!(config.default_asn, "AS400427");
        assert_eq!(config.irr_sources.len(), 13);
        assert_eq!(config.timeout(), Duration::from_secs(60));
        assert_eq!(config.port, 8000);
    }

    #[test]
    fn test_from_settings_overrides() {
        let config = LookupConfig::from_settings(&settings(&[
            ("default_asn", "AS3356"),
            ("irr_sources", "ripe, radb ,RIPE"),
            ("reserved_asn_ranges", "23456, 64512-65534"),
            ("timeout_secs", "15"),
            ("bgpq4_path", "/usr/local/bin/bgpq4"),
            ("address", "0.0.0.0"),
            ("port", "9000"),
        ]))
        .unwrap();

        assert_eq!(config.default_asn, "AS3356");
        assert_eq!(config.irr_sources.joined(), "RIPE,RADB");
        assert_eq!(
            config.reserved_asn_ranges,
            vec![AsnRange::single(23456), AsnRange::new(64512, 65534)]
        );
        assert_eq!(config.timeout(), Duration::from_secs(15));
        assert_eq!(config.bgpq4_path, "/usr/local/bin/bgpq4");
        assert_eq!(config.address, "0.0.0.0");
        assert_eq!(config.port, 9000);
    }

    #[test]
    fn test_invalid_values_are_rejected() {
        for pairs in [
            [("default_asn", "AS64512")],
            [("default_asn", "not-an-asn")],
            [("irr_sources", "RADB,FAKE")],
            [("irr_sources", " , ")],
            [("reserved_asn_ranges", "100-1")],
            [("timeout_secs", "0")],
            [("timeout_secs", "soon")],
            [("port", "70000")],
        ] {
            assert!(
                LookupConfig::from_settings(&settings(&pairs)).is_err(),
                "settings {:?}",
                pairs
            );
        }
    }

    #[test]
    fn test_blank_values_take_defaults() {
        let config = LookupConfig::from_settings(&settings(&[
            ("bgpq4_path", ""),
            ("reserved_asn_ranges", "  "),
        ]))
        .unwrap();
        assert_eq!(config.bgpq4_path, "bgpq4");
        assert_eq!(config.reserved_asn_ranges, DEFAULT_RESERVED_ASN_RANGES);
    }

    #[test]
    fn test_default_asn_checked_against_configured_ranges() {
        // AS64512 is only reserved by default
        let config = LookupConfig::from_settings(&settings(&[
            ("default_asn", "AS64512"),
            ("reserved_asn_ranges", "23456"),
        ]))
        .unwrap();
        assert_eq!(config.default_asn, "AS64512");
    }

    #[test]
    fn test_new_reads_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("pfxlookup.toml");
        std::fs::write(
            &path,
            "default_asn = \"AS15169\"\nirr_sources = \"RADB\"\ntimeout_secs = 5\n",
        )
        .unwrap();

        let config = LookupConfig::new(&Some(path.to_string_lossy().to_string())).unwrap();
        assert_eq!(config.default_asn, "AS15169");
        assert_eq!(config.irr_sources.joined(), "RADB");
        assert_eq!(config.timeout_secs, 5);
    }

    #[test]
    fn test_new_writes_template_when_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("fresh.toml");

        let config = LookupConfig::new(&Some(path.to_string_lossy().to_string())).unwrap();
        assert_eq!(config.bgpq4_path, "bgpq4");

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("### pfxlookup configuration file"));
    }

    #[test]
    fn test_summary() {
        let summary = LookupConfig::default().summary();
        assert!(summary.contains("AS400427"));
        assert!(summary.contains("AFRINIC,ALTDB,APNIC"));
        assert!(summary.contains("64512-65534"));
        assert!(summary.contains("127.0.0.1:8000"));
    }
}
