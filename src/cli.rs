// src/cli.rs

//! CLI argument parsing using `clap`.

use clap::{Parser, ValueEnum};

/// Command-line arguments for `bsubq`.
#[derive(Debug, Clone, Parser)]
#[command(
    name = "bsubq",
    version,
    about = "Submit a case list of batch jobs with bounded parallelism and per-task timeouts.",
    long_about = None
)]
pub struct CliArgs {
    /// Path to the case list (JSON array of {command, log, tc} objects).
    #[arg(long, value_name = "PATH", default_value = "cases.json")]
    pub cases: String,

    /// Maximum number of outstanding jobs.
    ///
    /// Clamped to [1, 50]; zero or negative values collapse to 1.
    #[arg(long, value_name = "N", default_value_t = 3)]
    pub max_parallel: i64,

    /// Seconds to sleep between poll cycles.
    #[arg(long, value_name = "SECS", default_value_t = 60)]
    pub poll_interval: u64,

    /// Logging level (error, warn, info, debug, trace).
    ///
    /// If omitted, `BSUBQ_LOG` or a default level will be used.
    #[arg(long, value_enum, value_name = "LEVEL")]
    pub log_level: Option<LogLevel>,

    /// Parse + validate the case list, print it, but don't submit anything.
    #[arg(long)]
    pub dry_run: bool,
}

/// Log level as exposed on the CLI.
#[derive(Debug, Copy, Clone, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// Convenience wrapper around `CliArgs::parse()`.
pub fn parse() -> CliArgs {
    CliArgs::parse()
}
