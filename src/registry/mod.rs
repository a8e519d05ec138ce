//! Package registry access.
//!
//! Each supported registry implements [`PackageRegistry`], bundling its
//! naming rules with its lookup protocol. [`RegistryKind`] is the selector
//! the command line hands in.

pub mod pypi;

use crate::types::{HttpConfig, LookupOutcome, NominaError, NormalizationVerdict, Result};
use async_trait::async_trait;
use std::fmt;
use std::str::FromStr;

pub use pypi::PypiRegistry;

/// A package index with its own naming rules and metadata endpoint.
#[async_trait]
pub trait PackageRegistry: Send + Sync {
    /// Human-readable registry name, used in logs and errors.
    fn name(&self) -> &str;

    /// Check a raw candidate against this registry's naming rules.
    fn normalize(&self, raw: &str) -> NormalizationVerdict;

    /// Query the registry for an already-normalized name.
    ///
    /// Fails only when the registry cannot be reached at all.
    async fn lookup(&self, canonical_name: &str) -> Result<LookupOutcome>;
}

/// Registries this tool knows how to search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegistryKind {
    Pypi,
}

impl RegistryKind {
    /// Default base URL for the registry's API.
    pub fn default_base_url(&self) -> &'static str {
        match self {
            RegistryKind::Pypi => pypi::DEFAULT_BASE_URL,
        }
    }

    /// Build the registry client, optionally pointed at a mirror.
    pub fn build(
        &self,
        base_url: Option<&str>,
        http_config: HttpConfig,
    ) -> Result<Box<dyn PackageRegistry>> {
        let base_url = base_url.unwrap_or(self.default_base_url());
        match self {
            RegistryKind::Pypi => Ok(Box::new(PypiRegistry::with_base_url(base_url, http_config)?)),
        }
    }
}

impl FromStr for RegistryKind {
    type Err = NominaError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pypi" => Ok(RegistryKind::Pypi),
            _ => Err(NominaError::UnsupportedRegistry(s.to_string())),
        }
    }
}

impl fmt::Display for RegistryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryKind::Pypi => write!(f, "pypi"),
        }
    }
}
