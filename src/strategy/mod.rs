//! Locking strategy module for transfer execution
//!
//! This module defines the Strategy pattern over "exclusive access
//! acquisition": the engine builds a read-validate-commit attempt for a
//! transfer, and the selected strategy decides how that attempt gets
//! exclusive access to the two records: by holding both row locks for the
//! attempt's duration (pessimistic), or by retrying the whole attempt when
//! the store's version check reports a conflict (optimistic).
//!
//! Both strategies expose identical external error semantics for
//! validation and business-rule failures; they differ only in how
//! contention surfaces (`LockTimeout` vs `ConflictExhausted`).

use crate::cli::LockingType;
use crate::types::{BenefitError, RecordId, TransferReceipt};
use std::time::Duration;

pub mod optimistic;
pub mod pessimistic;

pub use optimistic::OptimisticLocking;
pub use pessimistic::PessimisticLocking;

/// A transfer's read-validate-commit attempt
///
/// Re-reads both records from the store, runs the business validations
/// against that fresh state, and commits through the store's atomic pair
/// write. Strategies may invoke it more than once.
pub type TransferAttempt<'a> = dyn FnMut() -> Result<TransferReceipt, BenefitError> + 'a;

/// Concurrency-control strategy for transfer execution
///
/// Implementations guarantee that by the time the attempt's commit lands,
/// no other transfer touching either record has interleaved a conflicting
/// write, and that a failed or abandoned execution leaves no lock held and
/// no partial state behind.
pub trait LockStrategy: Send + Sync {
    /// Run a transfer attempt under this strategy's exclusivity protocol
    ///
    /// # Arguments
    ///
    /// * `from` - Source record id
    /// * `to` - Destination record id
    /// * `attempt` - The read-validate-commit sequence to protect
    ///
    /// # Errors
    ///
    /// Attempt errors pass through unchanged, except that an optimistic
    /// strategy converts a final `Conflict` into `ConflictExhausted`. A
    /// pessimistic strategy may fail with `LockTimeout` before the attempt
    /// runs at all.
    fn execute(
        &self,
        from: RecordId,
        to: RecordId,
        attempt: &mut TransferAttempt<'_>,
    ) -> Result<TransferReceipt, BenefitError>;

    /// Short name for logging
    fn name(&self) -> &'static str;
}

/// Tuning knobs for the locking strategies
///
/// `lock_timeout` bounds the pessimistic strategy's wait per row lock;
/// `max_retries` bounds the optimistic strategy's conflict retries (the
/// first attempt is not counted as a retry).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LockingConfig {
    pub lock_timeout: Duration,
    pub max_retries: u32,
}

impl Default for LockingConfig {
    fn default() -> Self {
        LockingConfig {
            lock_timeout: Duration::from_millis(5000),
            max_retries: 5,
        }
    }
}

/// Create a locking strategy based on the specified strategy type
///
/// Factory mapping the CLI's strategy switch to a boxed implementation,
/// so the engine can be assembled at runtime.
pub fn create_strategy(locking: LockingType, config: LockingConfig) -> Box<dyn LockStrategy> {
    match locking {
        LockingType::Pessimistic => Box::new(PessimisticLocking::new(config.lock_timeout)),
        LockingType::Optimistic => Box::new(OptimisticLocking::new(config.max_retries)),
    }
}
