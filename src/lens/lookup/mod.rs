//! Prefix lookup lens
//!
//! This module provides the `LookupLens`, which resolves the IPv4 prefixes an
//! AS has registered in IRR databases by running `bgpq4`. One lookup is a
//! fixed pipeline:
//!
//! 1. [`validate`] the raw ASN and IRR source list
//! 2. plan one [`CommandSpec`] per IRR source
//! 3. execute them one after another with a [`ProcessRunner`]; the configured
//!    timeout is a single deadline shared by the whole lookup
//! 4. [`parse`] each run's JSON output into [`PrefixRecord`]s tagged with the
//!    source it queried, concatenated in source order
//!
//! The first failing run ends the lookup. The lens keeps no state between
//! lookups.
//!
//! # Example
//!
//! ```rust,ignore
//! use pfxlookup::lens::lookup::{LookupArgs, LookupLens};
//! use pfxlookup::LookupConfig;
//! use std::sync::Arc;
//!
//! let lens = LookupLens::new(Arc::new(LookupConfig::default()));
//! let args = LookupArgs::new("AS15169").with_irr("RADB,RIPE");
//! let response = lens.lookup(&args).await?;
//!
//! for record in &response.prefixes {
//!     println!("{} {}", record.prefix, record.source);
//! }
//! ```

pub mod command;
pub mod parse;
pub mod runner;
pub mod types;
pub mod validate;

pub use command::CommandSpec;
pub use parse::{parse, ParsedRoutes};
pub use runner::{ExecutionResult, ProcessRunner, TokioProcessRunner};
pub use types::{
    AsNumber, AsnRange, IrrSource, IrrSourceSet, LookupResponse, PrefixRecord,
    DEFAULT_RESERVED_ASN_RANGES,
};
pub use validate::validate;

use crate::config::LookupConfig;
use crate::error::{ExecutionError, LookupError, ValidationError};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info, warn};

// =============================================================================
// Args
// =============================================================================

/// Arguments for a prefix lookup, exactly as received from the client
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[cfg_attr(feature = "cli", derive(clap::Args))]
pub struct LookupArgs {
    /// Target ASN, e.g. "AS15169" or "3356" (default: configured default ASN)
    #[cfg_attr(feature = "cli", clap(value_name = "ASN"))]
    #[serde(default)]
    pub asn: Option<String>,

    /// Comma-separated IRR sources, e.g. "RIPE,LEVEL3" (default: all known sources)
    #[cfg_attr(feature = "cli", clap(short, long))]
    #[serde(default)]
    pub irr: Option<String>,
}

impl LookupArgs {
    pub fn new(asn: impl Into<String>) -> Self {
        Self {
            asn: Some(asn.into()),
            irr: None,
        }
    }

    pub fn with_irr(mut self, irr: impl Into<String>) -> Self {
        self.irr = Some(irr.into());
        self
    }
}

// =============================================================================
// Lens
// =============================================================================

/// Prefix lookup lens
#[derive(Clone)]
pub struct LookupLens {
    config: Arc<LookupConfig>,
    runner: Arc<dyn ProcessRunner>,
}

impl LookupLens {
    /// Create a lens that runs the real bgpq4 binary
    pub fn new(config: Arc<LookupConfig>) -> Self {
        Self::with_runner(config, Arc::new(TokioProcessRunner::new()))
    }

    /// Create a lens with a custom process runner
    pub fn with_runner(config: Arc<LookupConfig>, runner: Arc<dyn ProcessRunner>) -> Self {
        Self { config, runner }
    }

    pub fn config(&self) -> &LookupConfig {
        &self.config
    }

    /// Validate lookup arguments, applying the configured default ASN
    pub fn validate(&self, args: &LookupArgs) -> Result<(AsNumber, IrrSourceSet), ValidationError> {
        let raw_asn = args.asn.as_deref().unwrap_or(&self.config.default_asn);
        validate(&self.config, raw_asn, args.irr.as_deref())
    }

    /// Build the bgpq4 invocations for validated inputs, one per source
    pub fn commands(&self, asn: &AsNumber, sources: &IrrSourceSet) -> Vec<CommandSpec> {
        CommandSpec::plan(&self.config, asn, sources)
    }

    /// Run one complete lookup
    pub async fn lookup(&self, args: &LookupArgs) -> Result<LookupResponse, LookupError> {
        let (asn, sources) = self.validate(args).map_err(|e| {
            debug!("Rejected lookup request {:?}: {}", args, e);
            e
        })?;
        info!("Looking up {} in {}", asn, sources);

        let timeout = self.config.timeout();
        let deadline = Instant::now() + timeout;
        let mut records = Vec::new();

        for spec in self.commands(&asn, &sources) {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                warn!("Lookup of {} ran out of time before {}", asn, spec.source());
                return Err(ExecutionError::TimedOut(timeout).into());
            }
            let spec = spec.with_timeout(remaining);

            let stdout = self.runner.run(&spec).await.into_stdout(timeout)?;
            let parsed = parse(&stdout, spec.source())?;
            if parsed.dropped > 0 {
                warn!(
                    "Dropped {} unusable route objects from {} output for {}",
                    parsed.dropped,
                    spec.source(),
                    asn
                );
            }
            debug!("{} has {} prefixes in {}", asn, parsed.records.len(), spec.source());
            records.extend(parsed.records);
        }

        info!("Found {} prefixes for {}", records.len(), asn);
        Ok(LookupResponse::new(asn, records))
    }
}

/// Locate the configured route query tool on this host
pub fn check_dependencies(config: &LookupConfig) -> anyhow::Result<PathBuf> {
    which::which(&config.bgpq4_path).map_err(|e| {
        anyhow!(
            "Missing required system tool '{}': {}. Please install it.",
            config.bgpq4_path,
            e
        )
    })
}
