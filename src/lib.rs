// src/lib.rs

pub mod backend;
pub mod cli;
pub mod config;
pub mod errors;
pub mod logging;
pub mod monitor;
pub mod registry;
pub mod types;

use std::time::Duration;

use anyhow::Result;
use tracing::info;

use crate::backend::LsfBackend;
use crate::cli::CliArgs;
use crate::config::{load_and_validate, CaseEntry};
use crate::monitor::{Monitor, MonitorOptions};
use crate::registry::TaskRegistry;

/// High-level entry point used by `main.rs`.
///
/// This wires together:
/// - case list loading
/// - task registry
/// - LSF backend
/// - the monitor loop
///
/// Only loading errors abort before the loop; everything the backend throws
/// during the loop is absorbed and logged.
pub async fn run(args: CliArgs) -> Result<()> {
    let entries = load_and_validate(&args.cases)?;

    if args.dry_run {
        print_dry_run(&args, &entries);
        return Ok(());
    }

    let registry = TaskRegistry::from_entries(entries);
    let backend = LsfBackend::new();
    let options = MonitorOptions {
        max_parallel: args.max_parallel,
        poll_interval: Duration::from_secs(args.poll_interval),
    };

    let monitor = Monitor::new(registry, backend, options);
    let statuses = monitor.run().await?;

    info!(tasks = statuses.len(), "all tasks settled");
    print_summary(&statuses);

    Ok(())
}

/// Final status summary, one line per task, on stdout.
fn print_summary(statuses: &std::collections::HashMap<String, types::TaskStatus>) {
    let mut lines: Vec<_> = statuses.iter().collect();
    lines.sort_by(|a, b| a.0.cmp(b.0));

    for (task, status) in lines {
        println!("{status}\t{task}");
    }
}

/// Simple dry-run output: print tasks, logs and timeouts.
fn print_dry_run(args: &CliArgs, entries: &[CaseEntry]) {
    println!("bsubq dry-run");
    println!(
        "  max_parallel = {} (effective {})",
        args.max_parallel,
        monitor::effective_max_parallel(args.max_parallel)
    );
    println!("  poll_interval = {}s", args.poll_interval);
    println!();

    println!("cases ({}):", entries.len());
    for entry in entries {
        println!("  - {}", entry.command);
        println!("      log: {}", entry.log);
        println!("      tc:  {} poll cycles", entry.tc);
    }
}
