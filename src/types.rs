//! Core types and errors for package name searches.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while searching.
///
/// Per-name problems (a rejected name, an odd status code) are not errors;
/// they travel inside [`SearchResult`]. Only whole-run failures live here.
#[derive(Error, Debug)]
pub enum NominaError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Unable to connect to {registry} after {attempts} attempts: {source}")]
    RegistryUnreachable {
        registry: String,
        attempts: u32,
        #[source]
        source: reqwest::Error,
    },

    #[error("Registry {0} not supported")]
    UnsupportedRegistry(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

pub type Result<T> = std::result::Result<T, NominaError>;

/// Outcome of checking a raw name against a registry's naming rules.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationVerdict {
    pub is_valid: bool,
    pub message: String,
    /// Present iff `is_valid`.
    pub canonical_name: Option<String>,
}

impl NormalizationVerdict {
    pub(crate) fn invalid(message: &str) -> Self {
        Self {
            is_valid: false,
            message: message.to_string(),
            canonical_name: None,
        }
    }

    pub(crate) fn valid(message: String, canonical_name: String) -> Self {
        Self {
            is_valid: true,
            message,
            canonical_name: Some(canonical_name),
        }
    }
}

/// Result of querying the registry for one canonical name.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LookupOutcome {
    /// `None` when the registry answered with neither "found" nor "not found".
    pub exists: Option<bool>,
    pub message: String,
    /// HTTP status code the registry answered with.
    pub status: u16,
    /// The registry's own spelling of the name, when it sent metadata.
    pub registry_name: Option<String>,
    /// Latest version reported by the registry, if any.
    pub latest_version: Option<String>,
    /// Raw response body metadata, kept opaque.
    #[serde(skip)]
    pub raw_response: Option<serde_json::Value>,
}

/// One row of the report, in the same order as the input names.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub input_name: String,
    pub canonical_name: Option<String>,
    /// Registry-reported name, when the lookup returned metadata.
    pub official_name: Option<String>,
    pub exists: Option<bool>,
    pub message: String,
    /// What the name checker said about the input before any lookup.
    pub normalization_message: String,
}

impl SearchResult {
    /// Name to show in the "Normalized Name" column.
    pub fn display_name(&self) -> &str {
        self.official_name
            .as_deref()
            .or(self.canonical_name.as_deref())
            .unwrap_or("")
    }
}

/// Configuration for registry HTTP requests.
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Per-attempt timeout. `None` keeps the client default.
    pub timeout_secs: Option<u64>,
    pub max_attempts: u32,
    /// Delay between attempts, multiplied by the attempt number. Zero disables backoff.
    pub retry_delay_ms: u64,
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            timeout_secs: None,
            max_attempts: 5,
            retry_delay_ms: 0,
            user_agent: format!("nomina/{}", env!("CARGO_PKG_VERSION")),
        }
    }
}
