//! CSV format handling for operation input and record output
//!
//! This module centralizes all CSV format concerns, providing:
//! - CsvOperation structure for deserialization
//! - Conversion from CSV rows to domain operations
//! - Record state output serialization
//!
//! All functions are pure (no I/O) for easy testing.

use crate::types::{BenefitRecord, OperationRecord, OperationType, RecordId};
use rust_decimal::Decimal;
use serde::Deserialize;
use std::io::Write;
use std::str::FromStr;

/// CSV row structure for deserialization
///
/// Matches the input format with columns: op, id, to, name, description,
/// amount, active. Every column except `op` is optional because the
/// meaningful set depends on the operation type.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct CsvOperation {
    pub op: String,
    pub id: Option<String>,
    pub to: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub amount: Option<String>,
    pub active: Option<String>,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty()).map(|s| s.trim().to_string())
}

fn parse_id(value: Option<String>, column: &str) -> Result<Option<RecordId>, String> {
    match non_empty(value) {
        Some(raw) => raw
            .parse::<RecordId>()
            .map(Some)
            .map_err(|_| format!("Invalid {column} '{raw}'")),
        None => Ok(None),
    }
}

/// Convert a CsvOperation to an OperationRecord
///
/// This function:
/// - Parses the operation type string into an OperationType enum
/// - Parses id columns into record ids and the amount into a Decimal
/// - Parses the active flag into a bool
/// - Validates that the columns required by the operation type are present
///
/// # Returns
///
/// Result containing either:
/// - Ok(OperationRecord) - Successfully converted row
/// - Err(String) - Error message describing the conversion failure
pub fn convert_operation(row: CsvOperation) -> Result<OperationRecord, String> {
    let op = match row.op.to_lowercase().as_str() {
        "create" => OperationType::Create,
        "update" => OperationType::Update,
        "transfer" => OperationType::Transfer,
        "delete" => OperationType::Delete,
        other => return Err(format!("Invalid operation type '{other}'")),
    };

    let id = parse_id(row.id, "id")?;
    let to = parse_id(row.to, "to")?;
    let name = non_empty(row.name);
    let description = non_empty(row.description);

    let amount = match non_empty(row.amount) {
        Some(raw) => Some(
            Decimal::from_str(&raw).map_err(|_| format!("Invalid amount '{raw}'"))?,
        ),
        None => None,
    };

    let active = match non_empty(row.active) {
        Some(raw) => match raw.to_lowercase().as_str() {
            "true" => Some(true),
            "false" => Some(false),
            other => return Err(format!("Invalid active flag '{other}'")),
        },
        None => None,
    };

    // Per-type required columns, checked here so the engine only ever sees
    // well-formed operations from the batch path.
    match op {
        OperationType::Create => {
            if name.is_none() {
                return Err("create operation requires a name".to_string());
            }
            if amount.is_none() {
                return Err("create operation requires an amount".to_string());
            }
        }
        OperationType::Update => {
            if id.is_none() {
                return Err("update operation requires an id".to_string());
            }
        }
        OperationType::Transfer => {
            if id.is_none() || to.is_none() {
                return Err("transfer operation requires both ids".to_string());
            }
            if amount.is_none() {
                return Err("transfer operation requires an amount".to_string());
            }
        }
        OperationType::Delete => {
            if id.is_none() {
                return Err("delete operation requires an id".to_string());
            }
        }
    }

    Ok(OperationRecord {
        op,
        id,
        to,
        name,
        description,
        amount,
        active,
    })
}

/// Write record states to CSV format
///
/// Writes records with columns: id, name, description, balance, active,
/// version. Records are sorted by id and balances carry two decimal places
/// for deterministic output.
///
/// # Arguments
///
/// * `records` - Slice of record states to write
/// * `output` - Mutable reference to a writer for outputting CSV
///
/// # Returns
///
/// * `Ok(())` if writing succeeded
/// * `Err(String)` if a write error occurred
pub fn write_records_csv(records: &[BenefitRecord], output: &mut dyn Write) -> Result<(), String> {
    use csv::Writer;

    let mut writer = Writer::from_writer(output);

    writer
        .write_record(["id", "name", "description", "balance", "active", "version"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    let mut sorted_records = records.to_vec();
    sorted_records.sort_by_key(|record| record.id);

    for record in sorted_records {
        writer
            .write_record(&[
                record.id.to_string(),
                record.name.clone(),
                record.description.clone().unwrap_or_default(),
                format!("{:.2}", record.balance),
                record.active.to_string(),
                record.version.to_string(),
            ])
            .map_err(|e| format!("Failed to write record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))?;

    Ok(())
}
