use std::sync::Arc;

use clap::{Parser, Subcommand};
use pfxlookup::*;
use tracing::Level;

mod commands;

use commands::check::CheckArgs;
use commands::config::ConfigArgs;
use commands::query::QueryArgs;
use commands::serve::ServeArgs;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
#[clap(propagate_version = true)]
struct Cli {
    /// configuration file path, by default $HOME/.pfxlookup/pfxlookup.toml is used
    #[clap(short, long)]
    config: Option<String>,

    /// Print debug information
    #[clap(long)]
    debug: bool,

    /// Output format: table, markdown, json, json-pretty, json-line, psv
    #[clap(short, long, global = true, default_value = "table")]
    format: OutputFormat,

    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP lookup server.
    Serve(ServeArgs),

    /// Look up the prefixes registered for an ASN in IRR databases.
    Query(QueryArgs),

    /// Check that bgpq4 can be found.
    Check(CheckArgs),

    /// Show the effective configuration.
    Config(ConfigArgs),
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::INFO } else { Level::WARN })
        .with_writer(std::io::stderr)
        .init();

    let config = match LookupConfig::new(&cli.config) {
        Ok(config) => Arc::new(config),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    };

    match cli.command {
        Commands::Serve(args) => commands::serve::run(config, args).await,
        Commands::Query(args) => commands::query::run(config, args, cli.format).await,
        Commands::Check(args) => commands::check::run(&config, args, cli.format),
        Commands::Config(args) => commands::config::run(&config, args, cli.format),
    }
}
