//! Benefits Engine CLI
//!
//! Command-line interface for processing benefit record operations from
//! CSV files.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- operations.csv > records.csv
//! cargo run -- --locking pessimistic operations.csv > records.csv
//! cargo run -- --locking optimistic --max-retries 10 operations.csv > records.csv
//! cargo run -- --locking pessimistic --lock-timeout-ms 1000 operations.csv > records.csv
//! ```
//!
//! The program reads operation rows from the input CSV file, applies them
//! through the transfer engine using the selected locking strategy, and
//! writes the final record states to stdout. Diagnostics go to stderr via
//! `tracing` (set `RUST_LOG` to adjust verbosity).
//!
//! # Locking Strategies
//!
//! - **pessimistic**: per-record row locks with bounded wait (default)
//! - **optimistic**: version-check retries with a bounded budget
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (missing arguments, file not found, output failure, etc.)

use benefits_engine::cli;
use benefits_engine::core::TransferEngine;
use benefits_engine::io::process_operations;
use benefits_engine::strategy::create_strategy;
use std::process;
use tracing_subscriber::EnvFilter;

fn main() {
    // Logs go to stderr so stdout stays clean for the CSV output.
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse().unwrap()))
        .with_writer(std::io::stderr)
        .init();

    let args = cli::parse_args();

    let strategy = create_strategy(args.locking, args.to_locking_config());
    let engine = TransferEngine::new(strategy);

    let mut output = std::io::stdout();
    if let Err(e) = process_operations(&engine, &args.input_file, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
