//! Benefits Engine Library
//! # Overview
//!
//! This library manages balance-bearing benefit records and moves money
//! between them safely under concurrent access.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (BenefitRecord, OperationRecord, errors)
//! - [`cli`] - CLI argument parsing
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Benefit operations and transfer orchestration
//!   - [`core::store`] - The in-memory transactional record store
//!   - [`core::lock`] - Per-record row locks with bounded acquisition
//! - [`strategy`] - Concurrency-control strategies for transfers
//! - [`io`] - Batch CSV input/output
//!
//! # Transfers
//!
//! A transfer debits one record and credits another as a single atomic
//! commit. Exclusive access during the read-validate-commit sequence comes
//! from the configured strategy:
//!
//! - **Pessimistic**: both row locks held for the attempt, acquired in
//!   ascending-id order with a bounded wait
//! - **Optimistic**: no locks; the store's version check rejects stale
//!   commits and the whole attempt retries, up to a bounded budget
//!
//! Either way a failed transfer leaves both records untouched: no partial
//! debit, no transiently negative balance, no lost update.
//!
//! # Records
//!
//! Each benefit record maintains:
//! - `name` / `description`: descriptive fields
//! - `balance`: a non-negative fixed-point decimal
//! - `active`: inactive records reject transfers but stay readable;
//!   deletion is a soft deactivate
//! - `version`: bumped by 1 per committed mutation, the conflict-detection
//!   token for every write

// Module declarations
pub mod cli;
pub mod core;
pub mod io;
pub mod strategy;
pub mod types;

pub use crate::core::{MemoryStore, RecordStore, TransferEngine};
pub use crate::io::{process_operations, write_records_csv, OpsReader};
pub use crate::strategy::{
    create_strategy, LockStrategy, LockingConfig, OptimisticLocking, PessimisticLocking,
};
pub use crate::types::{
    BenefitDraft, BenefitError, BenefitRecord, BenefitUpdate, OperationRecord, OperationType,
    RecordId, TransferReceipt, TransferSide,
};
