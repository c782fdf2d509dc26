#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]

//! pfxlookup - IRR prefix lookups over HTTP
//!
//! pfxlookup answers one question: which IPv4 prefixes has an AS registered
//! in the Internet Routing Registry? It validates the request, runs `bgpq4`
//! under a hard timeout, and returns the route objects as JSON. It can be used
//! as both a command-line application and a library.
//!
//! # Feature Flags
//!
//! | Feature | Description | Key Dependencies |
//! |---------|-------------|------------------|
//! | `server` | HTTP server with the `/lookup` endpoint | `axum`, `tower-http` |
//! | `display` | Table formatting with `tabled` | `tabled` |
//! | `cli` | Full CLI binary with server support | All above + `clap` |
//!
//! ```toml
//! # Library only: validation, bgpq4 execution and parsing
//! pfxlookup = { version = "0.1", default-features = false }
//!
//! # Default (CLI binary)
//! pfxlookup = "0.1"
//! ```
//!
//! # Architecture
//!
//! - **[`lens`]**: the lookup pipeline
//!   - `lookup::validate`: ASN and IRR source validation
//!   - `lookup::command`: bgpq4 argument vector construction
//!   - `lookup::runner`: subprocess execution under a timeout
//!   - `lookup::parse`: bgpq4 JSON output parsing
//! - **[`error`]**: error types for every pipeline stage
//! - **[`config`]**: Configuration management
//! - **`server`**: axum router and HTTP response mapping (feature `server`)
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use pfxlookup::{LookupArgs, LookupConfig, LookupLens};
//! use std::sync::Arc;
//!
//! let lens = LookupLens::new(Arc::new(LookupConfig::default()));
//!
//! match lens.lookup(&LookupArgs::new("AS15169").with_irr("RADB")).await {
//!     Ok(response) => println!("{}", serde_json::to_string(&response)?),
//!     Err(e) => eprintln!("{}: {}", e.reason(), e.public_message()),
//! }
//! ```

pub mod config;
pub mod error;
pub mod lens;

// Server module - requires "server" feature
#[cfg(feature = "server")]
pub mod server;

// =============================================================================
// Configuration and errors (always available)
// =============================================================================

pub use config::LookupConfig;
pub use error::{ErrorReason, ExecutionError, LookupError, ParseError, ValidationError};

// =============================================================================
// Lens Module
// =============================================================================

pub use lens::lookup::{
    check_dependencies, AsNumber, IrrSource, IrrSourceSet, LookupArgs, LookupLens,
    LookupResponse, PrefixRecord, ProcessRunner, TokioProcessRunner,
};
pub use lens::utils::OutputFormat;

// =============================================================================
// Server Module (HTTP API) - requires "server" feature
// =============================================================================

#[cfg(feature = "server")]
pub use server::{create_axum_router, start_server, ServerConfig, ServerState};
