use crate::strategy::LockingConfig;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;
use std::time::Duration;

/// Process benefit record operations with concurrency-safe transfers
#[derive(Parser, Debug)]
#[command(name = "benefits-engine")]
#[command(about = "Process benefit record operations with concurrency-safe transfers", long_about = None)]
pub struct CliArgs {
    /// Input CSV file path containing operation rows
    #[arg(value_name = "INPUT", help = "Path to the operations CSV file")]
    pub input_file: PathBuf,

    /// Concurrency-control strategy for transfers
    #[arg(
        long = "locking",
        value_name = "STRATEGY",
        default_value = "pessimistic",
        help = "Locking strategy: 'pessimistic' for row locks or 'optimistic' for version retries"
    )]
    pub locking: LockingType,

    /// Bounded wait per row lock (pessimistic mode only)
    #[arg(
        long = "lock-timeout-ms",
        value_name = "MILLIS",
        help = "Maximum wait per row lock in milliseconds (default: 5000)"
    )]
    pub lock_timeout_ms: Option<u64>,

    /// Conflict retry budget (optimistic mode only)
    #[arg(
        long = "max-retries",
        value_name = "COUNT",
        help = "Maximum retries after a version conflict (default: 5)"
    )]
    pub max_retries: Option<u32>,
}

/// Available concurrency-control strategies
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum LockingType {
    Pessimistic,
    Optimistic,
}

impl CliArgs {
    /// Create a LockingConfig from CLI arguments
    ///
    /// Uses provided values where present and falls back to defaults
    /// otherwise. A zero lock timeout is treated as absent, since an
    /// immediate timeout would fail every contended transfer.
    ///
    /// # Returns
    ///
    /// A `LockingConfig` with values from CLI arguments or defaults.
    pub fn to_locking_config(&self) -> LockingConfig {
        let default = LockingConfig::default();
        LockingConfig {
            lock_timeout: self
                .lock_timeout_ms
                .filter(|ms| *ms > 0)
                .map(Duration::from_millis)
                .unwrap_or(default.lock_timeout),
            max_retries: self.max_retries.unwrap_or(default.max_retries),
        }
    }
}
