use clap::Args;
use pfxlookup::lens::utils::format_response;
use pfxlookup::{LookupArgs, LookupConfig, LookupLens, OutputFormat};
use std::sync::Arc;

/// Arguments for the Query command
#[derive(Args)]
pub struct QueryArgs {
    #[clap(flatten)]
    pub lookup: LookupArgs,
}

pub async fn run(config: Arc<LookupConfig>, args: QueryArgs, output_format: OutputFormat) {
    let lens = LookupLens::new(config);

    let response = match lens.lookup(&args.lookup).await {
        Ok(response) => response,
        Err(e) => {
            eprintln!("ERROR ({}): {}", e.reason(), e);
            std::process::exit(1);
        }
    };

    if response.prefixes.is_empty() && output_format.is_table() {
        println!("{}: no route objects found", response.key());
        return;
    }

    match format_response(&response, output_format) {
        Ok(text) => println!("{}", text),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }
}
