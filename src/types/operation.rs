//! Batch operation types
//!
//! This module defines the parsed operations consumed by the batch runner.
//! Each CSV row becomes one OperationRecord; columns that don't apply to a
//! given operation type stay `None`.

use super::record::RecordId;
use rust_decimal::Decimal;

/// Operations supported by the batch runner
///
/// Creates and updates mutate a single record, transfers move a balance
/// between two records, and deletes mark a record inactive (the record is
/// never physically removed).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperationType {
    /// Create a new benefit record
    ///
    /// Requires a name and a positive initial balance. The store assigns
    /// the id; `active` defaults to true.
    Create,

    /// Patch an existing record
    ///
    /// Only the provided fields are applied.
    Update,

    /// Move an amount from one record's balance to another's
    ///
    /// Requires both ids and a positive amount; both records must be
    /// active and the source must have sufficient balance.
    Transfer,

    /// Soft-delete a record
    ///
    /// Sets `active` to false; the record remains readable and listable.
    Delete,
}

/// A single parsed operation from the input CSV
///
/// Fields are optional because the set of meaningful columns depends on the
/// operation type; the converter in `io::csv_format` enforces per-type
/// presence before a record reaches the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct OperationRecord {
    /// The operation to perform
    pub op: OperationType,

    /// Target record id (source side for transfers)
    ///
    /// Absent for creates, where the store assigns the id.
    pub id: Option<RecordId>,

    /// Destination record id, transfers only
    pub to: Option<RecordId>,

    /// Record name (required for creates)
    pub name: Option<String>,

    /// Record description
    pub description: Option<String>,

    /// Initial balance for creates, new balance for updates, transferred
    /// amount for transfers
    pub amount: Option<Decimal>,

    /// Active flag for creates and updates
    pub active: Option<bool>,
}
