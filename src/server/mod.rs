//! HTTP server module for pfxlookup
//!
//! This module exposes [`LookupLens`] over HTTP.
//!
//! # Architecture
//!
//! The server is organized into several submodules:
//!
//! - `handlers` - Individual endpoint handler implementations
//! - `response` - Mapping of lookup outcomes onto status codes and JSON bodies
//!
//! # Endpoints
//!
//! - `GET /lookup?asn=<asn>&irr=<sources>` - prefixes registered for an ASN
//! - `GET /health` - liveness check, always `OK`
//!
//! # Usage
//!
//! ```rust,ignore
//! use pfxlookup::server::{start_server, ServerConfig};
//! use pfxlookup::{LookupConfig, LookupLens};
//! use std::sync::Arc;
//!
//! let config = Arc::new(LookupConfig::default());
//! let server_config = ServerConfig::from_lookup_config(&config);
//! start_server(LookupLens::new(config), server_config).await?;
//! ```

pub mod handlers;
pub mod response;

pub use response::{assemble, status_for, ErrorBody};

use crate::config::LookupConfig;
use crate::lens::lookup::LookupLens;
use axum::{routing::get, Router as AxumRouter};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

// =============================================================================
// Server Configuration
// =============================================================================

/// Server configuration
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// Address to bind to
    pub address: String,

    /// Port to listen on
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            address: "127.0.0.1".to_string(),
            port: 8000,
        }
    }
}

impl ServerConfig {
    /// Create a new server configuration
    pub fn new() -> Self {
        Self::default()
    }

    /// Take the listen address from the service configuration
    pub fn from_lookup_config(config: &LookupConfig) -> Self {
        Self {
            address: config.address.clone(),
            port: config.port,
        }
    }

    /// Set the address
    pub fn with_address(mut self, address: impl Into<String>) -> Self {
        self.address = address.into();
        self
    }

    /// Set the port
    pub fn with_port(mut self, port: u16) -> Self {
        self.port = port;
        self
    }

    /// Get the full bind address
    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.address, self.port)
    }
}

// =============================================================================
// Server State
// =============================================================================

/// Shared server state
#[derive(Clone)]
pub struct ServerState {
    /// Lookup pipeline shared by all requests
    pub lens: Arc<LookupLens>,
}

impl ServerState {
    pub fn new(lens: LookupLens) -> Self {
        Self {
            lens: Arc::new(lens),
        }
    }
}

// =============================================================================
// Axum Router Creation
// =============================================================================

/// Create the Axum router for the HTTP server
pub fn create_axum_router(state: ServerState) -> AxumRouter {
    // Configure CORS
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    AxumRouter::new()
        .route("/lookup", get(handlers::lookup_handler))
        .route("/health", get(handlers::health_handler))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

// =============================================================================
// Server Startup
// =============================================================================

/// Start the HTTP server and serve until Ctrl-C
pub async fn start_server(lens: LookupLens, config: ServerConfig) -> anyhow::Result<()> {
    let app = create_axum_router(ServerState::new(lens));

    let bind_address = config.bind_address();
    tracing::info!("Starting HTTP server on {}", bind_address);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
}

// =============================================================================
// Tests
// =============================================================================
