//! Error types for the benefits engine
//!
//! This module defines all errors produced by the record store and the
//! transfer engine. Every variant carries enough context for a caller to
//! act (which side failed, available vs requested amount), and exposes a
//! stable machine-readable code through [`BenefitError::kind`] so an outer
//! transport can build structured `{kind, message}` responses.
//!
//! # Error Categories
//!
//! - **Lookup errors**: id does not resolve (`NotFound`)
//! - **Validation errors**: self-transfer, non-positive amount, inactive
//!   record, blank name, missing batch field
//! - **Business-rule errors**: insufficient balance
//! - **Concurrency errors**: stale-version conflict, retry exhaustion,
//!   lock acquisition timeout
//! - **Storage errors**: unexpected datastore failure; never retried by
//!   the engine

use crate::types::RecordId;
use rust_decimal::Decimal;
use std::fmt;
use thiserror::Error;

/// Which side of a transfer an error refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransferSide {
    From,
    To,
}

impl fmt::Display for TransferSide {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransferSide::From => write!(f, "from"),
            TransferSide::To => write!(f, "to"),
        }
    }
}

/// Main error type for the benefits engine
///
/// All expected failure modes of store and engine operations. Every variant
/// except `Storage` is a recoverable business outcome reported to the
/// caller; `Storage` indicates the datastore itself failed and aborts the
/// operation without retry.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BenefitError {
    /// No record exists with the given id
    ///
    /// `side` is set when the lookup happened inside a transfer, naming
    /// which end of the transfer failed to resolve.
    #[error("benefit {id} not found{}", side.map(|s| format!(" ({s} side)")).unwrap_or_default())]
    NotFound {
        /// The id that did not resolve
        id: RecordId,
        /// Transfer side, when raised inside a transfer
        side: Option<TransferSide>,
    },

    /// Source and destination of a transfer are the same record
    #[error("cannot transfer benefit {id} to itself")]
    SelfTransfer {
        /// The id used on both sides
        id: RecordId,
    },

    /// Amount is zero or negative
    ///
    /// Raised for transfer amounts as well as initial and updated balances.
    #[error("amount must be positive, got {amount}")]
    InvalidAmount {
        /// The rejected amount
        amount: Decimal,
    },

    /// Record is inactive and cannot take part in a transfer
    #[error("benefit {id} is inactive ({side} side)")]
    Inactive {
        /// The inactive record's id
        id: RecordId,
        /// Which side of the transfer it sits on
        side: TransferSide,
    },

    /// Name is empty or whitespace-only
    #[error("benefit name must not be blank")]
    BlankName,

    /// A batch operation is missing a required column
    #[error("{operation} operation requires a {field}")]
    MissingField {
        /// Operation name (create, update, transfer, delete)
        operation: String,
        /// The missing column
        field: String,
    },

    /// Source balance cannot cover the requested amount
    #[error("insufficient balance: available {available}, requested {requested}")]
    InsufficientBalance {
        /// Balance of the source record at validation time
        available: Decimal,
        /// Amount the transfer asked for
        requested: Decimal,
    },

    /// A write presented a stale version
    ///
    /// Another writer committed since this record was read. The write is
    /// rejected wholesale, never merged.
    #[error("version conflict on benefit {id}")]
    Conflict {
        /// The record whose version check failed
        id: RecordId,
    },

    /// Optimistic retry budget spent without a clean commit
    #[error("transfer abandoned after {attempts} conflicting attempts")]
    ConflictExhausted {
        /// Total attempts made, including the first
        attempts: u32,
    },

    /// Row lock could not be acquired within the bounded wait
    #[error("timed out waiting for lock on benefit {id}")]
    LockTimeout {
        /// The record whose lock was contended
        id: RecordId,
    },

    /// Balance arithmetic overflowed
    #[error("balance overflow on benefit {id}")]
    Overflow {
        /// The record whose balance could not be represented
        id: RecordId,
    },

    /// Unexpected datastore failure
    ///
    /// Propagates to the caller without retry at the engine layer.
    #[error("storage error: {message}")]
    Storage {
        /// Description of the failure
        message: String,
    },
}

impl BenefitError {
    /// Stable machine-readable code for this error
    ///
    /// Suitable for a structured error body alongside the display message.
    pub fn kind(&self) -> &'static str {
        match self {
            BenefitError::NotFound { .. } => "NOT_FOUND",
            BenefitError::SelfTransfer { .. } => "SELF_TRANSFER",
            BenefitError::InvalidAmount { .. } => "INVALID_AMOUNT",
            BenefitError::Inactive { .. } => "INACTIVE",
            BenefitError::BlankName => "INVALID_NAME",
            BenefitError::MissingField { .. } => "MISSING_FIELD",
            BenefitError::InsufficientBalance { .. } => "INSUFFICIENT_BALANCE",
            BenefitError::Conflict { .. } => "CONFLICT",
            BenefitError::ConflictExhausted { .. } => "CONFLICT_EXHAUSTED",
            BenefitError::LockTimeout { .. } => "LOCK_TIMEOUT",
            BenefitError::Overflow { .. } => "OVERFLOW",
            BenefitError::Storage { .. } => "STORAGE_ERROR",
        }
    }
}

// Helper functions for creating common errors

impl BenefitError {
    /// Create a NotFound error outside a transfer context
    pub fn not_found(id: RecordId) -> Self {
        BenefitError::NotFound { id, side: None }
    }

    /// Create a NotFound error naming the transfer side
    pub fn not_found_side(id: RecordId, side: TransferSide) -> Self {
        BenefitError::NotFound {
            id,
            side: Some(side),
        }
    }

    /// Create a SelfTransfer error
    pub fn self_transfer(id: RecordId) -> Self {
        BenefitError::SelfTransfer { id }
    }

    /// Create an InvalidAmount error
    pub fn invalid_amount(amount: Decimal) -> Self {
        BenefitError::InvalidAmount { amount }
    }

    /// Create an Inactive error
    pub fn inactive(id: RecordId, side: TransferSide) -> Self {
        BenefitError::Inactive { id, side }
    }

    /// Create a MissingField error
    pub fn missing_field(operation: &str, field: &str) -> Self {
        BenefitError::MissingField {
            operation: operation.to_string(),
            field: field.to_string(),
        }
    }

    /// Create an InsufficientBalance error
    pub fn insufficient_balance(available: Decimal, requested: Decimal) -> Self {
        BenefitError::InsufficientBalance {
            available,
            requested,
        }
    }

    /// Create a Conflict error
    pub fn conflict(id: RecordId) -> Self {
        BenefitError::Conflict { id }
    }

    /// Create a ConflictExhausted error
    pub fn conflict_exhausted(attempts: u32) -> Self {
        BenefitError::ConflictExhausted { attempts }
    }

    /// Create a LockTimeout error
    pub fn lock_timeout(id: RecordId) -> Self {
        BenefitError::LockTimeout { id }
    }

    /// Create an Overflow error
    pub fn overflow(id: RecordId) -> Self {
        BenefitError::Overflow { id }
    }

    /// Create a Storage error
    pub fn storage(message: impl Into<String>) -> Self {
        BenefitError::Storage {
            message: message.into(),
        }
    }
}
