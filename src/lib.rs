//! nomina - Package name validator and registry availability checker.
//!
//! This library checks candidate package names by:
//! - Validating them against the registry's naming rules
//! - Normalizing valid names to their canonical form
//! - Querying the registry to see whether the name is already taken
//!
//! # Example
//!
//! ```no_run
//! use nomina::{SearchConfig, Searcher};
//!
//! #[tokio::main]
//! async fn main() {
//!     let searcher = Searcher::new(SearchConfig::default()).unwrap();
//!     let results = searcher.run(&["requests", "My_New.Package"]).await.unwrap();
//!     for result in results {
//!         println!("{}: {}", result.input_name, result.message);
//!     }
//! }
//! ```

pub mod config;
pub mod normalize;
pub mod output;
pub mod registry;
pub mod search;
pub mod types;

pub use config::{Config, SearchConfig};
pub use normalize::normalize_pypi_name;
pub use registry::{PackageRegistry, PypiRegistry, RegistryKind};
pub use search::Searcher;
pub use types::{
    HttpConfig, LookupOutcome, NominaError, NormalizationVerdict, Result, SearchResult,
};
