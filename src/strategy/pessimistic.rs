//! Pessimistic locking strategy
//!
//! Takes both records' row locks for the duration of the transfer attempt.
//! Locks are acquired in ascending-id order, so two concurrent transfers
//! over the same pair in opposite directions contend on the same first
//! lock instead of deadlocking on each other's second. Each acquisition is
//! deadline-bounded; a timeout surfaces as `LockTimeout` and releases
//! whatever was already held.
//!
//! The attempt runs exactly once. The store's version check can still
//! reject the commit if a writer outside the row-lock protocol (a CRUD
//! update) raced the transfer; that `Conflict` passes through to the
//! caller rather than being retried here.

use crate::core::lock::LockTable;
use crate::strategy::{LockStrategy, TransferAttempt};
use crate::types::{BenefitError, RecordId, TransferReceipt};
use std::time::Duration;

/// Row-lock based transfer strategy
///
/// Owns the lock table, so every transfer routed through the same engine
/// contends on the same per-record locks.
#[derive(Debug)]
pub struct PessimisticLocking {
    locks: LockTable,
    lock_timeout: Duration,
}

impl PessimisticLocking {
    /// Create a strategy with the given per-lock acquisition bound
    pub fn new(lock_timeout: Duration) -> Self {
        PessimisticLocking {
            locks: LockTable::new(),
            lock_timeout,
        }
    }
}

impl LockStrategy for PessimisticLocking {
    fn execute(
        &self,
        from: RecordId,
        to: RecordId,
        attempt: &mut TransferAttempt<'_>,
    ) -> Result<TransferReceipt, BenefitError> {
        // Fixed global acquisition order: ascending id.
        let mut ids = [from, to];
        ids.sort_unstable();

        let _first = self.locks.acquire(ids[0], self.lock_timeout)?;
        let _second = self.locks.acquire(ids[1], self.lock_timeout)?;

        attempt()
        // Guards drop here, releasing both locks on success, error, or panic.
    }

    fn name(&self) -> &'static str {
        "pessimistic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::BenefitRecord;
    use rust_decimal::Decimal;
    use std::panic::{catch_unwind, AssertUnwindSafe};
    use std::sync::Arc;
    use std::thread;

    fn receipt() -> TransferReceipt {
        let record = BenefitRecord {
            id: 1,
            name: "stub".to_string(),
            description: None,
            balance: Decimal::ZERO,
            active: true,
            version: 1,
        };
        TransferReceipt {
            from: record.clone(),
            to: BenefitRecord { id: 2, ..record },
        }
    }

    #[test]
    fn test_runs_attempt_exactly_once() {
        let strategy = PessimisticLocking::new(Duration::from_millis(100));
        let mut calls = 0;

        let result = strategy.execute(1, 2, &mut || {
            calls += 1;
            Ok(receipt())
        });

        assert!(result.is_ok());
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_conflict_passes_through_without_retry() {
        let strategy = PessimisticLocking::new(Duration::from_millis(100));
        let mut calls = 0;

        let result = strategy.execute(1, 2, &mut || {
            calls += 1;
            Err(BenefitError::conflict(1))
        });

        assert_eq!(result.unwrap_err(), BenefitError::conflict(1));
        assert_eq!(calls, 1);
    }

    #[test]
    fn test_locks_released_after_failed_attempt() {
        let strategy = PessimisticLocking::new(Duration::from_millis(100));

        let _ = strategy.execute(1, 2, &mut || Err(BenefitError::conflict(1)));

        // Both locks must be free again.
        assert!(strategy.execute(1, 2, &mut || Ok(receipt())).is_ok());
    }

    #[test]
    fn test_locks_released_after_panicking_attempt() {
        let strategy = PessimisticLocking::new(Duration::from_millis(100));

        let unwound = catch_unwind(AssertUnwindSafe(|| {
            let _ = strategy.execute(1, 2, &mut || panic!("attempt blew up"));
        }));
        assert!(unwound.is_err());

        assert!(strategy.execute(1, 2, &mut || Ok(receipt())).is_ok());
    }

    #[test]
    fn test_opposite_direction_pairs_do_not_deadlock() {
        let strategy = Arc::new(PessimisticLocking::new(Duration::from_millis(2000)));

        let mut handles = vec![];
        for (from, to) in [(1, 2), (2, 1)] {
            let strategy = Arc::clone(&strategy);
            handles.push(thread::spawn(move || {
                strategy.execute(from, to, &mut || {
                    thread::sleep(Duration::from_millis(20));
                    Ok(receipt())
                })
            }));
        }

        for handle in handles {
            assert!(handle.join().unwrap().is_ok());
        }
    }

    #[test]
    fn test_times_out_when_shared_record_stays_locked() {
        let strategy = Arc::new(PessimisticLocking::new(Duration::from_millis(30)));

        let holder = {
            let strategy = Arc::clone(&strategy);
            thread::spawn(move || {
                strategy.execute(1, 2, &mut || {
                    thread::sleep(Duration::from_millis(300));
                    Ok(receipt())
                })
            })
        };

        // Let the holder take both locks, then contend on record 1.
        thread::sleep(Duration::from_millis(60));
        let result = strategy.execute(1, 3, &mut || Ok(receipt()));

        assert_eq!(result.unwrap_err(), BenefitError::lock_timeout(1));
        assert!(holder.join().unwrap().is_ok());
    }
}
