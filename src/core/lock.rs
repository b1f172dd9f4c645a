//! Per-record row locks
//!
//! This module provides the locking primitive behind the pessimistic
//! transfer strategy: one `RecordLock` per record id, registered lazily in
//! a concurrent `LockTable`, acquired with a bounded wait and released
//! through an RAII guard so a lock can never leak on an error or panic
//! path.

use crate::types::{BenefitError, RecordId};
use dashmap::DashMap;
use std::sync::{Arc, Condvar, Mutex, PoisonError};
use std::time::{Duration, Instant};

/// A single record's row lock
///
/// Backed by `Mutex<bool>` + `Condvar`. The boolean is the held flag; the
/// condvar wakes waiters on release. Acquisition is deadline-bounded so a
/// contended transfer surfaces `LockTimeout` instead of hanging.
#[derive(Debug, Default)]
pub struct RecordLock {
    state: Mutex<bool>,
    wake: Condvar,
}

impl RecordLock {
    pub fn new() -> Self {
        RecordLock {
            state: Mutex::new(false),
            wake: Condvar::new(),
        }
    }

    /// Acquire the lock, waiting at most `timeout`
    ///
    /// Returns `Ok(true)` when acquired, `Ok(false)` when the deadline
    /// passed while the lock was still held elsewhere.
    ///
    /// # Errors
    ///
    /// Returns `Storage` if the underlying mutex is poisoned.
    pub fn lock_timeout(&self, timeout: Duration) -> Result<bool, BenefitError> {
        let deadline = Instant::now() + timeout;
        let mut held = self
            .state
            .lock()
            .map_err(|_| BenefitError::storage("record lock poisoned"))?;
        while *held {
            let now = Instant::now();
            if now >= deadline {
                return Ok(false);
            }
            let (guard, _) = self
                .wake
                .wait_timeout(held, deadline - now)
                .map_err(|_| BenefitError::storage("record lock poisoned"))?;
            held = guard;
        }
        *held = true;
        Ok(true)
    }

    /// Release the lock and wake one waiter
    pub fn unlock(&self) {
        let mut held = self.state.lock().unwrap_or_else(PoisonError::into_inner);
        if *held {
            *held = false;
            self.wake.notify_one();
        }
    }
}

/// RAII guard for an acquired row lock
///
/// Releases on drop, which covers every exit path of the critical section,
/// including panics.
#[derive(Debug)]
pub struct LockGuard {
    lock: Arc<RecordLock>,
}

impl Drop for LockGuard {
    fn drop(&mut self) {
        self.lock.unlock();
    }
}

/// Registry of row locks, one per record id
///
/// Locks are created lazily on first acquisition and live for the table's
/// lifetime; repeated lookups for the same id hand out the same lock.
#[derive(Debug, Default)]
pub struct LockTable {
    locks: DashMap<RecordId, Arc<RecordLock>>,
}

impl LockTable {
    pub fn new() -> Self {
        LockTable {
            locks: DashMap::new(),
        }
    }

    /// Acquire the row lock for `id`, waiting at most `timeout`
    ///
    /// # Errors
    ///
    /// * `LockTimeout` if the lock stayed held past the deadline
    /// * `Storage` if the lock's mutex is poisoned
    pub fn acquire(&self, id: RecordId, timeout: Duration) -> Result<LockGuard, BenefitError> {
        let lock = self
            .locks
            .entry(id)
            .or_insert_with(|| Arc::new(RecordLock::new()))
            .clone();

        if lock.lock_timeout(timeout)? {
            Ok(LockGuard { lock })
        } else {
            Err(BenefitError::lock_timeout(id))
        }
    }
}
