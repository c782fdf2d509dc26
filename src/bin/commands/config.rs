use clap::Args;
use pfxlookup::{LookupConfig, OutputFormat};
use serde::Serialize;

/// Arguments for the Config command
#[derive(Args)]
pub struct ConfigArgs {}

#[derive(Debug, Serialize)]
struct ConfigInfo {
    config_file: String,
    default_asn: String,
    irr_sources: Vec<String>,
    reserved_asn_ranges: Vec<String>,
    bgpq4_path: String,
    timeout_secs: u64,
    address: String,
    port: u16,
}

pub fn run(config: &LookupConfig, _args: ConfigArgs, output_format: OutputFormat) {
    if output_format.is_json() {
        let info = ConfigInfo {
            config_file: LookupConfig::config_file_path(),
            default_asn: config.default_asn.clone(),
            irr_sources: config.irr_sources.iter().map(|s| s.to_string()).collect(),
            reserved_asn_ranges: config
                .reserved_asn_ranges
                .iter()
                .map(|r| r.to_string())
                .collect(),
            bgpq4_path: config.bgpq4_path.clone(),
            timeout_secs: config.timeout_secs,
            address: config.address.clone(),
            port: config.port,
        };
        super::print_json(&info, output_format == OutputFormat::JsonPretty);
        return;
    }

    println!("pfxlookup Configuration");
    println!("=======================\n");
    println!("Config File:        {}", LookupConfig::config_file_path());
    println!("{}", config.summary());
}
