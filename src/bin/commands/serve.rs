use clap::Args;
use pfxlookup::{check_dependencies, start_server, LookupConfig, LookupLens, ServerConfig};
use std::sync::Arc;

/// Arguments for the Serve command
#[derive(Args)]
pub struct ServeArgs {
    /// Address to bind to (default: configured address)
    #[clap(short, long)]
    pub address: Option<String>,

    /// Port to listen on (default: configured port)
    #[clap(short, long)]
    pub port: Option<u16>,
}

pub async fn run(config: Arc<LookupConfig>, args: ServeArgs) {
    let ServeArgs { address, port } = args;

    // refuse to start without the route query tool
    match check_dependencies(&config) {
        Ok(path) => tracing::info!("Using bgpq4 at {}", path.display()),
        Err(e) => {
            eprintln!("ERROR: {}", e);
            std::process::exit(1);
        }
    }

    let mut server_config = ServerConfig::from_lookup_config(&config);
    if let Some(address) = address {
        server_config = server_config.with_address(address);
    }
    if let Some(port) = port {
        server_config = server_config.with_port(port);
    }

    eprintln!("Serving IRR lookups on http://{}", server_config.bind_address());

    if let Err(e) = start_server(LookupLens::new(config), server_config).await {
        eprintln!("ERROR: {}", e);
        std::process::exit(1);
    }
}
