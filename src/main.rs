//! nomina - Package name validator and registry availability checker.
//!
//! CLI entry point.

use clap::Parser;
use nomina::output::ConsoleOutput;
use nomina::{Config, Searcher};
use std::process::ExitCode;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let config = Config::parse();

    // Set up logging
    let default_filter = if config.verbose {
        "nomina=debug,info"
    } else {
        "nomina=info,warn"
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if config.no_color {
        colored::control::set_override(false);
    }

    match run_search(&config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(code) => code,
    }
}

async fn run_search(config: &Config) -> Result<(), ExitCode> {
    // Reject unknown registries before any lookup
    let search_config = match config.search_config() {
        Ok(c) => c,
        Err(e) => {
            error!("{}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let console = ConsoleOutput::new(config.verbose, config.json, config.quiet);

    let searcher = match Searcher::new(search_config) {
        Ok(s) => s.with_console(console.clone()),
        Err(e) => {
            error!("Failed to create searcher: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    let results = match searcher.run(config.names.as_slice()).await {
        Ok(r) => r,
        Err(e) => {
            error!("Search aborted: {}", e);
            return Err(ExitCode::FAILURE);
        }
    };

    if let Err(e) = console.print_results(&results) {
        error!("Failed to format results: {}", e);
        return Err(ExitCode::FAILURE);
    }

    if let Some(ref output_path) = config.output {
        if let Err(e) = console.write_json(output_path, &results) {
            error!("Failed to write output file: {}", e);
            return Err(ExitCode::FAILURE);
        }
        info!("Results written to: {:?}", output_path);
    }

    Ok(())
}
