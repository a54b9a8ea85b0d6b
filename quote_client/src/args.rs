//! Command-line arguments for the Quote Client.
//!
//! This module defines the CLI interface using `clap`. See `main` for end-to-end usage.
use std::path::PathBuf;
use std::time::Duration;

use clap::Parser;

/// Parsed command-line arguments.
#[derive(Debug, Parser)]
#[command(version, about, long_about = None)]
pub struct Args {
    /// Full URL of the quotation endpoint.
    #[clap(long, default_value = "http://localhost:8080/cotacao")]
    pub url: String,

    /// Deadline for the whole request, response body included, in milliseconds.
    #[clap(long, default_value_t = 300)]
    pub timeout_ms: u64,

    /// File receiving the `Dólar: <bid>` line; truncated on every run.
    #[clap(long, default_value = "logs/cotacao.txt")]
    pub output: PathBuf,
}

impl Args {
    /// Request deadline as a `Duration`.
    pub fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}
