//! Search driver: validates each candidate and looks it up in order.

use crate::config::SearchConfig;
use crate::output::ConsoleOutput;
use crate::registry::PackageRegistry;
use crate::types::{NominaError, Result, SearchResult};
use tracing::{debug, warn};

/// Runs candidate names through a registry one at a time.
pub struct Searcher {
    registry: Box<dyn PackageRegistry>,
    keep_going: bool,
    console: ConsoleOutput,
}

impl Searcher {
    /// Create a searcher for the registry selected in `config`.
    pub fn new(config: SearchConfig) -> Result<Self> {
        let registry = config
            .registry
            .build(config.registry_url.as_deref(), config.http)?;

        Ok(Self {
            registry,
            keep_going: config.keep_going,
            console: ConsoleOutput::default(),
        })
    }

    /// Create a searcher around an existing registry client.
    pub fn with_registry(registry: Box<dyn PackageRegistry>) -> Self {
        Self {
            registry,
            keep_going: false,
            console: ConsoleOutput::default(),
        }
    }

    /// Report unreachable-registry failures per row instead of aborting.
    pub fn keep_going(mut self, keep_going: bool) -> Self {
        self.keep_going = keep_going;
        self
    }

    /// Use `console` for progress reporting.
    pub fn with_console(mut self, console: ConsoleOutput) -> Self {
        self.console = console;
        self
    }

    /// Search every name, returning one result per name in input order.
    ///
    /// An unreachable registry aborts the whole run unless `keep_going` is set.
    pub async fn run<S: AsRef<str>>(&self, names: &[S]) -> Result<Vec<SearchResult>> {
        let mut results = Vec::with_capacity(names.len());

        self.console.print_progress(&format!(
            "Checking {} names against {}...",
            names.len(),
            self.registry.name()
        ));
        let pb = self
            .console
            .create_progress_bar(names.len() as u64, &format!("Checking {}", self.registry.name()));

        for name in names {
            let outcome = self.search_one(name.as_ref()).await;

            if let Some(ref pb) = pb {
                pb.inc(1);
            }

            match outcome {
                Ok(result) => results.push(result),
                Err(e) => {
                    if let Some(ref pb) = pb {
                        pb.finish_and_clear();
                    }
                    return Err(e);
                }
            }
        }

        if let Some(pb) = pb {
            pb.finish_and_clear();
        }

        Ok(results)
    }

    /// Validate one name and, if it passes, look it up.
    pub async fn search_one(&self, input_name: &str) -> Result<SearchResult> {
        let verdict = self.registry.normalize(input_name);

        let canonical_name = match verdict.canonical_name {
            Some(ref canonical) if verdict.is_valid => canonical.clone(),
            _ => {
                debug!("Rejected {:?}: {}", input_name, verdict.message);
                return Ok(SearchResult {
                    input_name: input_name.to_string(),
                    canonical_name: None,
                    official_name: None,
                    exists: Some(false),
                    message: verdict.message.clone(),
                    normalization_message: verdict.message,
                });
            }
        };

        match self.registry.lookup(&canonical_name).await {
            Ok(outcome) => Ok(SearchResult {
                input_name: input_name.to_string(),
                canonical_name: Some(canonical_name),
                official_name: outcome.registry_name,
                exists: outcome.exists,
                message: outcome.message,
                normalization_message: verdict.message,
            }),
            Err(e @ NominaError::RegistryUnreachable { .. }) if self.keep_going => {
                warn!("Skipping {}: {}", canonical_name, e);
                Ok(SearchResult {
                    input_name: input_name.to_string(),
                    canonical_name: Some(canonical_name),
                    official_name: None,
                    exists: None,
                    message: e.to_string(),
                    normalization_message: verdict.message,
                })
            }
            Err(e) => Err(e),
        }
    }
}
