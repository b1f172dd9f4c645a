//! In-memory record store
//!
//! This module provides `MemoryStore`, the default `RecordStore` backend.
//! Records live in a `HashMap` behind a single `RwLock`; the write lock
//! scope is the transaction, so a two-record commit is atomic and no reader
//! ever observes a half-applied transfer.
//!
//! # Versioning
//!
//! Every committed mutation bumps the record's version by exactly 1. A
//! write presenting a stale version fails with `Conflict` and changes
//! nothing. This check runs on every write path, which makes it the safety
//! net under the engine's explicit locking: even a writer that bypasses the
//! row locks (a CRUD update racing a transfer) cannot cause a lost update.

use crate::core::traits::RecordStore;
use crate::types::{BenefitDraft, BenefitError, BenefitRecord, RecordId};
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

/// In-memory, transactional benefit record store
///
/// Thread-safe: readers run concurrently, writers serialize through the
/// write lock. Ids come from a monotonic sequence starting at 1 and are
/// never reused; delete is a soft operation handled above the store, so
/// records are never physically removed.
#[derive(Debug)]
pub struct MemoryStore {
    /// Map of record ids to record state
    records: RwLock<HashMap<RecordId, BenefitRecord>>,

    /// Next id to assign on create
    next_id: AtomicU64,
}

impl MemoryStore {
    /// Create an empty store
    pub fn new() -> Self {
        MemoryStore {
            records: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
        }
    }

    fn write_guard(
        &self,
    ) -> Result<std::sync::RwLockWriteGuard<'_, HashMap<RecordId, BenefitRecord>>, BenefitError>
    {
        self.records
            .write()
            .map_err(|_| BenefitError::storage("record store lock poisoned"))
    }

    fn sorted(mut records: Vec<BenefitRecord>) -> Vec<BenefitRecord> {
        records.sort_by_key(|record| record.id);
        records
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordStore for MemoryStore {
    fn get(&self, id: RecordId) -> Result<BenefitRecord, BenefitError> {
        let records = self
            .records
            .read()
            .map_err(|_| BenefitError::storage("record store lock poisoned"))?;
        records
            .get(&id)
            .cloned()
            .ok_or_else(|| BenefitError::not_found(id))
    }

    fn create(&self, draft: BenefitDraft) -> Result<BenefitRecord, BenefitError> {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let record = BenefitRecord {
            id,
            name: draft.name,
            description: draft.description,
            balance: draft.balance,
            active: draft.active.unwrap_or(true),
            version: 0,
        };

        let mut records = self.write_guard()?;
        records.insert(id, record.clone());
        Ok(record)
    }

    fn save(&self, record: BenefitRecord) -> Result<BenefitRecord, BenefitError> {
        let mut records = self.write_guard()?;

        let current = records
            .get(&record.id)
            .ok_or_else(|| BenefitError::not_found(record.id))?;
        if current.version != record.version {
            return Err(BenefitError::conflict(record.id));
        }

        let committed = BenefitRecord {
            version: record.version + 1,
            ..record
        };
        records.insert(committed.id, committed.clone());
        Ok(committed)
    }

    fn save_pair(
        &self,
        first: BenefitRecord,
        second: BenefitRecord,
    ) -> Result<(BenefitRecord, BenefitRecord), BenefitError> {
        debug_assert_ne!(first.id, second.id);

        let mut records = self.write_guard()?;

        // Both version checks run before either write lands.
        let current_first = records
            .get(&first.id)
            .ok_or_else(|| BenefitError::not_found(first.id))?;
        if current_first.version != first.version {
            return Err(BenefitError::conflict(first.id));
        }
        let current_second = records
            .get(&second.id)
            .ok_or_else(|| BenefitError::not_found(second.id))?;
        if current_second.version != second.version {
            return Err(BenefitError::conflict(second.id));
        }

        let committed_first = BenefitRecord {
            version: first.version + 1,
            ..first
        };
        let committed_second = BenefitRecord {
            version: second.version + 1,
            ..second
        };
        records.insert(committed_first.id, committed_first.clone());
        records.insert(committed_second.id, committed_second.clone());
        Ok((committed_first, committed_second))
    }

    fn list(&self) -> Vec<BenefitRecord> {
        // A poisoned lock still lets queries read the last committed state.
        let records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Self::sorted(records.values().cloned().collect())
    }

    fn list_active(&self) -> Vec<BenefitRecord> {
        let records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Self::sorted(
            records
                .values()
                .filter(|record| record.active)
                .cloned()
                .collect(),
        )
    }

    fn find_by_name(&self, fragment: &str) -> Vec<BenefitRecord> {
        let needle = fragment.to_lowercase();
        let records = self
            .records
            .read()
            .unwrap_or_else(PoisonError::into_inner);
        Self::sorted(
            records
                .values()
                .filter(|record| record.name.to_lowercase().contains(&needle))
                .cloned()
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    fn draft(name: &str, balance: Decimal) -> BenefitDraft {
        BenefitDraft {
            name: name.to_string(),
            description: None,
            balance,
            active: None,
        }
    }

    #[test]
    fn test_create_assigns_sequential_ids_and_version_zero() {
        let store = MemoryStore::new();

        let first = store.create(draft("Meal Allowance", Decimal::new(10000, 2))).unwrap();
        let second = store.create(draft("Transport", Decimal::new(5000, 2))).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
        assert_eq!(first.version, 0);
        assert!(first.active);
    }

    #[test]
    fn test_create_honors_explicit_active_flag() {
        let store = MemoryStore::new();

        let record = store
            .create(BenefitDraft {
                name: "Dormant".to_string(),
                description: None,
                balance: Decimal::ONE,
                active: Some(false),
            })
            .unwrap();

        assert!(!record.active);
    }

    #[test]
    fn test_get_returns_not_found_for_unknown_id() {
        let store = MemoryStore::new();

        let result = store.get(42);

        assert_eq!(result.unwrap_err(), BenefitError::not_found(42));
    }

    #[test]
    fn test_save_bumps_version_by_one() {
        let store = MemoryStore::new();
        let mut record = store.create(draft("Meal Allowance", Decimal::new(10000, 2))).unwrap();

        record.balance = Decimal::new(7500, 2);
        let committed = store.save(record).unwrap();

        assert_eq!(committed.version, 1);
        assert_eq!(store.get(committed.id).unwrap().balance, Decimal::new(7500, 2));
    }

    #[test]
    fn test_save_rejects_stale_version() {
        let store = MemoryStore::new();
        let record = store.create(draft("Meal Allowance", Decimal::new(10000, 2))).unwrap();

        // First writer commits on top of version 0.
        let mut fresh = record.clone();
        fresh.balance = Decimal::new(9000, 2);
        store.save(fresh).unwrap();

        // Second writer still holds version 0.
        let mut stale = record;
        stale.balance = Decimal::new(100, 2);
        let result = store.save(stale.clone());

        assert_eq!(result.unwrap_err(), BenefitError::conflict(stale.id));
        assert_eq!(store.get(stale.id).unwrap().balance, Decimal::new(9000, 2));
    }

    #[test]
    fn test_save_returns_not_found_for_unknown_id() {
        let store = MemoryStore::new();
        let phantom = BenefitRecord {
            id: 99,
            name: "Ghost".to_string(),
            description: None,
            balance: Decimal::ZERO,
            active: true,
            version: 0,
        };

        assert_eq!(store.save(phantom).unwrap_err(), BenefitError::not_found(99));
    }

    #[test]
    fn test_save_pair_commits_both_records() {
        let store = MemoryStore::new();
        let mut from = store.create(draft("From", Decimal::new(100000, 2))).unwrap();
        let mut to = store.create(draft("To", Decimal::new(50000, 2))).unwrap();

        from.balance = Decimal::new(70000, 2);
        to.balance = Decimal::new(80000, 2);
        let (from, to) = store.save_pair(from, to).unwrap();

        assert_eq!(from.version, 1);
        assert_eq!(to.version, 1);
        assert_eq!(store.get(from.id).unwrap().balance, Decimal::new(70000, 2));
        assert_eq!(store.get(to.id).unwrap().balance, Decimal::new(80000, 2));
    }

    #[test]
    fn test_save_pair_conflict_on_second_record_commits_neither() {
        let store = MemoryStore::new();
        let mut from = store.create(draft("From", Decimal::new(100000, 2))).unwrap();
        let to = store.create(draft("To", Decimal::new(50000, 2))).unwrap();

        // A concurrent writer bumps `to` behind this transfer's back.
        let mut racing = to.clone();
        racing.description = Some("touched".to_string());
        store.save(racing).unwrap();

        from.balance = Decimal::new(70000, 2);
        let mut stale_to = to.clone();
        stale_to.balance = Decimal::new(80000, 2);
        let result = store.save_pair(from.clone(), stale_to);

        assert_eq!(result.unwrap_err(), BenefitError::conflict(to.id));
        // Neither write landed: `from` is untouched at version 0.
        assert_eq!(store.get(from.id).unwrap().balance, Decimal::new(100000, 2));
        assert_eq!(store.get(from.id).unwrap().version, 0);
    }

    #[test]
    fn test_save_pair_conflict_on_first_record_commits_neither() {
        let store = MemoryStore::new();
        let from = store.create(draft("From", Decimal::new(100000, 2))).unwrap();
        let mut to = store.create(draft("To", Decimal::new(50000, 2))).unwrap();

        let mut racing = from.clone();
        racing.balance = Decimal::new(99900, 2);
        store.save(racing).unwrap();

        let mut stale_from = from.clone();
        stale_from.balance = Decimal::new(70000, 2);
        to.balance = Decimal::new(80000, 2);
        let result = store.save_pair(stale_from, to.clone());

        assert_eq!(result.unwrap_err(), BenefitError::conflict(from.id));
        assert_eq!(store.get(to.id).unwrap().balance, Decimal::new(50000, 2));
        assert_eq!(store.get(to.id).unwrap().version, 0);
    }

    #[test]
    fn test_list_sorted_by_id() {
        let store = MemoryStore::new();
        store.create(draft("B", Decimal::ONE)).unwrap();
        store.create(draft("A", Decimal::ONE)).unwrap();
        store.create(draft("C", Decimal::ONE)).unwrap();

        let ids: Vec<_> = store.list().iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![1, 2, 3]);
    }

    #[test]
    fn test_list_active_filters_inactive_records() {
        let store = MemoryStore::new();
        store.create(draft("Active", Decimal::ONE)).unwrap();
        let mut dormant = store.create(draft("Dormant", Decimal::ONE)).unwrap();
        dormant.active = false;
        store.save(dormant).unwrap();

        let active = store.list_active();
        assert_eq!(active.len(), 1);
        assert_eq!(active[0].name, "Active");

        // Soft-deleted record is still retrievable and listable.
        assert_eq!(store.list().len(), 2);
        assert!(store.get(2).is_ok());
    }

    #[test]
    fn test_find_by_name_is_case_insensitive() {
        let store = MemoryStore::new();
        store.create(draft("Meal Allowance", Decimal::ONE)).unwrap();
        store.create(draft("Transport Allowance", Decimal::ONE)).unwrap();
        store.create(draft("Housing", Decimal::ONE)).unwrap();

        let matches = store.find_by_name("ALLOW");
        assert_eq!(matches.len(), 2);
        assert_eq!(matches[0].name, "Meal Allowance");
        assert_eq!(matches[1].name, "Transport Allowance");

        assert!(store.find_by_name("pension").is_empty());
    }

    #[test]
    fn test_concurrent_stale_saves_exactly_one_wins() {
        use std::sync::Arc;
        use std::thread;

        let store = Arc::new(MemoryStore::new());
        let record = store.create(draft("Contested", Decimal::new(10000, 2))).unwrap();

        let mut handles = vec![];
        for i in 0..8 {
            let store = Arc::clone(&store);
            let mut copy = record.clone();
            handles.push(thread::spawn(move || {
                copy.balance = Decimal::new(1000 + i, 2);
                store.save(copy).is_ok()
            }));
        }

        let wins: usize = handles
            .into_iter()
            .map(|h| h.join().unwrap() as usize)
            .sum();

        // All writers held version 0; the version check admits exactly one.
        assert_eq!(wins, 1);
        assert_eq!(store.get(record.id).unwrap().version, 1);
    }
}
