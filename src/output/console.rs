//! Colored console output for search results.

use crate::output::table::render_grid;
use crate::types::{Result, SearchResult};
use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use std::fs;
use std::path::Path;

/// Console output handler with colors and formatting.
#[derive(Debug, Clone)]
pub struct ConsoleOutput {
    verbose: bool,
    json_mode: bool,
    quiet: bool,
}

impl ConsoleOutput {
    /// Create a new console output handler.
    pub fn new(verbose: bool, json_mode: bool, quiet: bool) -> Self {
        Self { verbose, json_mode, quiet }
    }

    /// Print progress (only in verbose mode).
    pub fn print_progress(&self, message: &str) {
        if self.json_mode || self.quiet || !self.verbose {
            return;
        }

        eprintln!("{} {}", "[.]".dimmed(), message.dimmed());
    }

    /// Print info message.
    pub fn print_info(&self, message: &str) {
        if self.json_mode || self.quiet {
            return;
        }

        eprintln!("{} {}", "[*]".bright_blue(), message);
    }

    /// Render the report in the selected format.
    pub fn format_results(&self, results: &[SearchResult]) -> Result<String> {
        if self.json_mode {
            Ok(serde_json::to_string_pretty(results)?)
        } else {
            Ok(render_grid(results, colored::control::SHOULD_COLORIZE.should_colorize()))
        }
    }

    /// Print the report to stdout.
    pub fn print_results(&self, results: &[SearchResult]) -> Result<()> {
        println!("{}", self.format_results(results)?);

        if !self.json_mode && !self.quiet {
            let taken = results.iter().filter(|r| r.exists == Some(true)).count();
            let unknown = results.iter().filter(|r| r.exists.is_none()).count();
            self.print_info(&format!(
                "{} checked, {} taken, {} unknown",
                results.len(),
                taken,
                unknown
            ));
        }

        Ok(())
    }

    /// Write the JSON report to `path`, whatever the console format.
    pub fn write_json(&self, path: &Path, results: &[SearchResult]) -> Result<()> {
        let json = serde_json::to_string_pretty(results)?;
        fs::write(path, json)?;
        Ok(())
    }

    /// Create a progress bar.
    pub fn create_progress_bar(&self, total: u64, message: &str) -> Option<ProgressBar> {
        if self.json_mode || self.quiet || total < 2 {
            return None;
        }

        let pb = ProgressBar::new(total);
        let style = ProgressStyle::default_bar()
            .template("{spinner:.cyan} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .ok()?
            .progress_chars("#>-");
        pb.set_style(style);
        pb.set_message(message.to_string());
        Some(pb)
    }
}

impl Default for ConsoleOutput {
    fn default() -> Self {
        Self::new(false, false, true)
    }
}
