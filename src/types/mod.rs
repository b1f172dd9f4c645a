//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `record`: Benefit record, draft, and patch types
//! - `operation`: Batch operation types for the CLI runner
//! - `error`: Error types for the benefits engine

pub mod error;
pub mod operation;
pub mod record;

pub use error::{BenefitError, TransferSide};
pub use operation::{OperationRecord, OperationType};
pub use record::{BenefitDraft, BenefitRecord, BenefitUpdate, RecordId, TransferReceipt};
