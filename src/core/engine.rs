//! Transfer engine
//!
//! This module provides the TransferEngine that orchestrates benefit
//! operations against the record store. CRUD operations are thin,
//! validated passthroughs; the transfer operation is the interesting part:
//! it moves a balance between two records atomically under concurrent
//! access, with exclusivity supplied by the configured locking strategy.
//!
//! The engine enforces the business rules:
//! - No self-transfers, no zero or negative amounts
//! - Both records must exist and be active
//! - The source balance must cover the amount; balances never go negative
//! - A failure at any step leaves both records untouched

use crate::core::store::MemoryStore;
use crate::core::traits::RecordStore;
use crate::strategy::LockStrategy;
use crate::types::{
    BenefitDraft, BenefitError, BenefitRecord, BenefitUpdate, OperationRecord, OperationType,
    RecordId, TransferReceipt, TransferSide,
};
use rust_decimal::Decimal;
use tracing::{debug, info, warn};

/// Benefit operation engine
///
/// Owns the record store and a locking strategy. Validation and mutation
/// logic is strategy-independent: the engine hands the strategy a
/// read-validate-commit attempt and the strategy decides how it gets
/// exclusive access to the two records.
///
/// The engine is `Sync`; share it behind an `Arc` to serve concurrent
/// callers.
pub struct TransferEngine<S: RecordStore = MemoryStore> {
    store: S,
    strategy: Box<dyn LockStrategy>,
}

impl TransferEngine<MemoryStore> {
    /// Create an engine over a fresh in-memory store
    pub fn new(strategy: Box<dyn LockStrategy>) -> Self {
        Self::with_store(MemoryStore::new(), strategy)
    }
}

impl<S: RecordStore> TransferEngine<S> {
    /// Create an engine over an existing store
    pub fn with_store(store: S, strategy: Box<dyn LockStrategy>) -> Self {
        TransferEngine { store, strategy }
    }

    /// Create a new benefit record
    ///
    /// The store assigns the id and version 0; `active` defaults to true.
    ///
    /// # Errors
    ///
    /// * `BlankName` if the name is empty or whitespace-only
    /// * `InvalidAmount` if the initial balance is not strictly positive
    pub fn create(&self, draft: BenefitDraft) -> Result<BenefitRecord, BenefitError> {
        if draft.name.trim().is_empty() {
            return Err(BenefitError::BlankName);
        }
        if draft.balance <= Decimal::ZERO {
            return Err(BenefitError::invalid_amount(draft.balance));
        }

        let record = self.store.create(draft)?;
        info!(id = record.id, name = %record.name, balance = %record.balance, "benefit created");
        Ok(record)
    }

    /// Fetch a record by id
    pub fn get(&self, id: RecordId) -> Result<BenefitRecord, BenefitError> {
        self.store.get(id)
    }

    /// Apply a patch to an existing record
    ///
    /// Only the provided fields change; an empty patch returns the current
    /// record without committing anything. The commit is version-checked,
    /// so a concurrent writer surfaces as `Conflict`.
    ///
    /// # Errors
    ///
    /// * `NotFound` if the id does not resolve
    /// * `BlankName` / `InvalidAmount` if a provided field fails validation
    /// * `Conflict` if another writer committed since the read
    pub fn update(&self, id: RecordId, patch: BenefitUpdate) -> Result<BenefitRecord, BenefitError> {
        if let Some(name) = &patch.name {
            if name.trim().is_empty() {
                return Err(BenefitError::BlankName);
            }
        }
        if let Some(balance) = patch.balance {
            if balance <= Decimal::ZERO {
                return Err(BenefitError::invalid_amount(balance));
            }
        }

        let mut record = self.store.get(id)?;
        if patch.is_empty() {
            return Ok(record);
        }

        if let Some(name) = patch.name {
            record.name = name;
        }
        if let Some(description) = patch.description {
            record.description = Some(description);
        }
        if let Some(balance) = patch.balance {
            record.balance = balance;
        }
        if let Some(active) = patch.active {
            record.active = active;
        }

        let committed = self.store.save(record)?;
        info!(id, version = committed.version, "benefit updated");
        Ok(committed)
    }

    /// Soft-delete a record
    ///
    /// Sets `active` to false and commits; the record stays in the store
    /// and remains retrievable. Deleting an already-inactive record is
    /// permitted and still commits.
    pub fn delete(&self, id: RecordId) -> Result<BenefitRecord, BenefitError> {
        let mut record = self.store.get(id)?;
        record.active = false;
        let committed = self.store.save(record)?;
        info!(id, "benefit deactivated");
        Ok(committed)
    }

    /// All records, sorted by id
    pub fn list(&self) -> Vec<BenefitRecord> {
        debug!("listing benefits");
        self.store.list()
    }

    /// Active records only, sorted by id
    pub fn list_active(&self) -> Vec<BenefitRecord> {
        debug!("listing active benefits");
        self.store.list_active()
    }

    /// Records whose name contains the fragment, case-insensitively
    pub fn find_by_name(&self, fragment: &str) -> Vec<BenefitRecord> {
        debug!(fragment, "searching benefits by name");
        self.store.find_by_name(fragment)
    }

    /// Move `amount` from one record's balance to another's
    ///
    /// Validation order, first violation wins: self-transfer, non-positive
    /// amount, unresolvable id (from before to), inactive record (from
    /// before to), insufficient balance. The id and business checks run
    /// against freshly-read state inside the strategy's exclusive section;
    /// the debit and credit commit as one atomic store write.
    ///
    /// # Errors
    ///
    /// Any variant from the validation chain above, plus `LockTimeout`
    /// (pessimistic contention), `Conflict` / `ConflictExhausted`
    /// (optimistic contention or a racing CRUD write), `Overflow`, and
    /// `Storage`. On any error, neither record is mutated.
    pub fn transfer(
        &self,
        from_id: RecordId,
        to_id: RecordId,
        amount: Decimal,
    ) -> Result<TransferReceipt, BenefitError> {
        let result = self.transfer_inner(from_id, to_id, amount);
        match &result {
            Ok(receipt) => info!(
                strategy = self.strategy.name(),
                from = from_id,
                to = to_id,
                %amount,
                from_balance = %receipt.from.balance,
                to_balance = %receipt.to.balance,
                "transfer applied"
            ),
            Err(e) => warn!(
                strategy = self.strategy.name(),
                from = from_id,
                to = to_id,
                %amount,
                kind = e.kind(),
                error = %e,
                "transfer rejected"
            ),
        }
        result
    }

    fn transfer_inner(
        &self,
        from_id: RecordId,
        to_id: RecordId,
        amount: Decimal,
    ) -> Result<TransferReceipt, BenefitError> {
        // Pure input checks run before any locking or store access.
        if from_id == to_id {
            return Err(BenefitError::self_transfer(from_id));
        }
        if amount <= Decimal::ZERO {
            return Err(BenefitError::invalid_amount(amount));
        }

        self.strategy.execute(from_id, to_id, &mut || {
            self.attempt_transfer(from_id, to_id, amount)
        })
    }

    /// One read-validate-commit attempt against current store state
    fn attempt_transfer(
        &self,
        from_id: RecordId,
        to_id: RecordId,
        amount: Decimal,
    ) -> Result<TransferReceipt, BenefitError> {
        let mut from = self.get_side(from_id, TransferSide::From)?;
        let mut to = self.get_side(to_id, TransferSide::To)?;

        if !from.active {
            return Err(BenefitError::inactive(from_id, TransferSide::From));
        }
        if !to.active {
            return Err(BenefitError::inactive(to_id, TransferSide::To));
        }
        if from.balance < amount {
            return Err(BenefitError::insufficient_balance(from.balance, amount));
        }

        from.balance = from
            .balance
            .checked_sub(amount)
            .ok_or_else(|| BenefitError::overflow(from_id))?;
        to.balance = to
            .balance
            .checked_add(amount)
            .ok_or_else(|| BenefitError::overflow(to_id))?;

        let (from, to) = self.store.save_pair(from, to)?;
        Ok(TransferReceipt { from, to })
    }

    fn get_side(&self, id: RecordId, side: TransferSide) -> Result<BenefitRecord, BenefitError> {
        match self.store.get(id) {
            Err(BenefitError::NotFound { id, .. }) => Err(BenefitError::not_found_side(id, side)),
            other => other,
        }
    }

    /// Apply a parsed batch operation
    ///
    /// Dispatches to the matching typed method. Columns the converter could
    /// not enforce (it only sees strings) are re-checked here and surface
    /// as `MissingField`.
    pub fn apply(&self, operation: OperationRecord) -> Result<(), BenefitError> {
        match operation.op {
            OperationType::Create => {
                let name = operation
                    .name
                    .ok_or_else(|| BenefitError::missing_field("create", "name"))?;
                let balance = operation
                    .amount
                    .ok_or_else(|| BenefitError::missing_field("create", "amount"))?;
                self.create(BenefitDraft {
                    name,
                    description: operation.description,
                    balance,
                    active: operation.active,
                })?;
            }
            OperationType::Update => {
                let id = operation
                    .id
                    .ok_or_else(|| BenefitError::missing_field("update", "id"))?;
                self.update(
                    id,
                    BenefitUpdate {
                        name: operation.name,
                        description: operation.description,
                        balance: operation.amount,
                        active: operation.active,
                    },
                )?;
            }
            OperationType::Transfer => {
                let from = operation
                    .id
                    .ok_or_else(|| BenefitError::missing_field("transfer", "id"))?;
                let to = operation
                    .to
                    .ok_or_else(|| BenefitError::missing_field("transfer", "to"))?;
                let amount = operation
                    .amount
                    .ok_or_else(|| BenefitError::missing_field("transfer", "amount"))?;
                self.transfer(from, to, amount)?;
            }
            OperationType::Delete => {
                let id = operation
                    .id
                    .ok_or_else(|| BenefitError::missing_field("delete", "id"))?;
                self.delete(id)?;
            }
        }
        Ok(())
    }
}
