//! Optimistic locking strategy
//!
//! Takes no locks at all. The attempt reads both records with their
//! current versions, validates, and commits through the store's
//! compare-and-swap pair write; when that write reports a version
//! conflict, the whole attempt is retried against fresh state. Retries are
//! bounded: once the budget is spent the transfer fails with
//! `ConflictExhausted` instead of spinning.
//!
//! Only `Conflict` triggers a retry. Business failures (insufficient
//! balance, inactive record) are final on first observation, and storage
//! errors abort immediately.

use crate::strategy::{LockStrategy, TransferAttempt};
use crate::types::{BenefitError, RecordId, TransferReceipt};

/// Version-check based transfer strategy
#[derive(Debug, Clone, Copy)]
pub struct OptimisticLocking {
    max_retries: u32,
}

impl OptimisticLocking {
    /// Create a strategy retrying at most `max_retries` times after the
    /// first conflicting attempt
    pub fn new(max_retries: u32) -> Self {
        OptimisticLocking { max_retries }
    }
}

impl LockStrategy for OptimisticLocking {
    fn execute(
        &self,
        _from: RecordId,
        _to: RecordId,
        attempt: &mut TransferAttempt<'_>,
    ) -> Result<TransferReceipt, BenefitError> {
        let mut attempts: u32 = 0;
        loop {
            attempts += 1;
            match attempt() {
                Err(BenefitError::Conflict { .. }) if attempts <= self.max_retries => {
                    // Another transfer committed first; re-read and retry.
                    std::thread::yield_now();
                }
                Err(BenefitError::Conflict { .. }) => {
                    return Err(BenefitError::conflict_exhausted(attempts));
                }
                other => return other,
            }
        }
    }

    fn name(&self) -> &'static str {
        "optimistic"
    }
}
