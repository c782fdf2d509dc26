//! bgpq4 command construction
//!
//! A [`CommandSpec`] is the complete description of one bgpq4 invocation.
//! Arguments are kept as separate tokens and handed straight to the process
//! API, and every token is derived from an [`AsNumber`] or [`IrrSource`]
//! name, so no request text can reach the command line.
//!
//! bgpq4 does not say which registry a route object came from, so a lookup
//! over several sources is planned as one invocation per source, each
//! restricted with `-S <SOURCE>`.

use super::types::{AsNumber, IrrSource, IrrSourceSet};
use crate::config::LookupConfig;
use std::fmt;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Fully resolved invocation of the route query tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    program: PathBuf,
    args: Vec<String>,
    timeout: Duration,
    source: IrrSource,
}

impl CommandSpec {
    /// Build the bgpq4 invocation querying a single registry.
    ///
    /// Produces `-4 -j -l AS<n> -S <SOURCE> AS<n>`.
    pub fn build(config: &LookupConfig, asn: &AsNumber, source: IrrSource) -> Self {
        let asn = asn.to_string();
        let args = vec![
            "-4".to_string(),
            "-j".to_string(),
            "-l".to_string(),
            asn.clone(),
            "-S".to_string(),
            source.as_str().to_string(),
            asn,
        ];

        Self {
            program: PathBuf::from(&config.bgpq4_path),
            args,
            timeout: config.timeout(),
            source,
        }
    }

    /// One invocation per source, in the validated source order
    pub fn plan(config: &LookupConfig, asn: &AsNumber, sources: &IrrSourceSet) -> Vec<Self> {
        sources
            .iter()
            .map(|source| Self::build(config, asn, *source))
            .collect()
    }

    /// Same invocation with a shorter wall-clock limit
    pub(crate) fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Assemble a spec from arbitrary parts, for exercising the runner
    #[cfg(test)]
    pub(crate) fn from_parts(
        program: impl Into<PathBuf>,
        args: &[&str],
        timeout: Duration,
    ) -> Self {
        Self {
            program: program.into(),
            args: args.iter().map(|s| s.to_string()).collect(),
            timeout,
            source: IrrSource::Radb,
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Wall-clock limit for the whole run
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Registry this invocation is restricted to
    pub fn source(&self) -> IrrSource {
        self.source
    }
}

impl fmt::Display for CommandSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program.display())?;
        for arg in &self.args {
            write!(f, " {}", arg)?;
        }
        Ok(())
    }
}
