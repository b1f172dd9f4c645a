//! Benefit record types
//!
//! This module defines the BenefitRecord structure persisted by the record
//! store, along with the draft and patch inputs used to create and update it.

use rust_decimal::Decimal;

/// Record identifier
///
/// Assigned by the store on creation from a monotonic sequence and never
/// reused, even after a soft delete.
pub type RecordId = u64;

/// A balance-bearing benefit record
///
/// Represents the persisted state of a benefit: its name, optional
/// description, current balance, active flag, and the version counter used
/// to detect concurrent conflicting writes.
#[derive(Debug, Clone, PartialEq)]
pub struct BenefitRecord {
    /// Store-assigned identifier, immutable after creation
    pub id: RecordId,

    /// Display name, non-blank
    pub name: String,

    /// Optional free-form description
    pub description: Option<String>,

    /// Current balance
    ///
    /// Never negative. Held as a fixed-point decimal so repeated transfers
    /// accumulate no rounding error.
    pub balance: Decimal,

    /// Whether the record participates in transfers
    ///
    /// Inactive records reject transfers in or out but remain readable.
    /// Soft delete sets this to false.
    pub active: bool,

    /// Version counter (lock token)
    ///
    /// Starts at 0 on creation and increases by exactly 1 per committed
    /// mutation. A write presenting a stale version is rejected by the
    /// store, never merged.
    pub version: u64,
}

/// Input fields for creating a benefit record
///
/// The store assigns `id` and `version`; `active` defaults to true when not
/// provided.
#[derive(Debug, Clone, PartialEq)]
pub struct BenefitDraft {
    pub name: String,
    pub description: Option<String>,
    pub balance: Decimal,
    pub active: Option<bool>,
}

/// Patch applied by an update operation
///
/// Only provided fields are applied; everything else is left untouched.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BenefitUpdate {
    pub name: Option<String>,
    pub description: Option<String>,
    pub balance: Option<Decimal>,
    pub active: Option<bool>,
}

impl BenefitUpdate {
    /// True when the patch carries no fields at all
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.description.is_none()
            && self.balance.is_none()
            && self.active.is_none()
    }
}

/// Both records as committed by a successful transfer
///
/// Balances and versions reflect the post-commit state.
#[derive(Debug, Clone, PartialEq)]
pub struct TransferReceipt {
    pub from: BenefitRecord,
    pub to: BenefitRecord,
}
