//! Configuration handling for searches.

use crate::registry::RegistryKind;
use crate::types::{HttpConfig, Result};
use clap::Parser;
use std::path::PathBuf;

/// Check whether package names are valid and still available.
#[derive(Parser, Debug, Clone)]
#[command(name = "nomina")]
#[command(author, version, about, long_about = None)]
pub struct Config {
    /// Candidate package name(s)
    #[arg(required = true, num_args = 1..)]
    pub names: Vec<String>,

    /// Registry to search
    #[arg(short = 'e', long = "env", visible_alias = "registry", default_value = "pypi")]
    pub environment: String,

    /// Override the registry base URL (e.g. a mirror)
    #[arg(long, env = "NOMINA_REGISTRY_URL")]
    pub registry_url: Option<String>,

    /// Per-attempt request timeout in seconds (defaults to no timeout)
    #[arg(long)]
    pub timeout: Option<u64>,

    /// Attempts per name before the registry is considered unreachable
    #[arg(long, default_value = "5")]
    pub max_attempts: u32,

    /// Delay between attempts in milliseconds, scaled by attempt number
    #[arg(long, default_value = "0")]
    pub retry_delay_ms: u64,

    /// Report an unreachable registry in the affected row instead of aborting
    #[arg(long)]
    pub keep_going: bool,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,

    /// Also write JSON results to this file
    #[arg(short, long)]
    pub output: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long)]
    pub verbose: bool,

    /// Quiet mode: only print the results
    #[arg(short = 'q', long)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long)]
    pub no_color: bool,

    /// Custom User-Agent string
    #[arg(long)]
    pub user_agent: Option<String>,
}

/// Everything the searcher needs, resolved from the command line.
#[derive(Debug, Clone)]
pub struct SearchConfig {
    pub registry: RegistryKind,
    pub registry_url: Option<String>,
    pub http: HttpConfig,
    pub keep_going: bool,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            registry: RegistryKind::Pypi,
            registry_url: None,
            http: HttpConfig::default(),
            keep_going: false,
        }
    }
}

impl Config {
    /// Get HTTP configuration from the command line.
    pub fn http_config(&self) -> HttpConfig {
        let defaults = HttpConfig::default();
        HttpConfig {
            timeout_secs: self.timeout,
            max_attempts: self.max_attempts,
            retry_delay_ms: self.retry_delay_ms,
            user_agent: self.user_agent.clone().unwrap_or(defaults.user_agent),
        }
    }

    /// Resolve the search configuration.
    ///
    /// Fails with `UnsupportedRegistry` for an unknown registry selector.
    pub fn search_config(&self) -> Result<SearchConfig> {
        Ok(SearchConfig {
            registry: self.environment.parse()?,
            registry_url: self.registry_url.clone(),
            http: self.http_config(),
            keep_going: self.keep_going,
        })
    }
}
