//! Batch processing pipeline
//!
//! Streams an operations CSV through the engine and writes the final
//! record states as CSV. Fatal errors (unreadable input, broken output)
//! abort the run; individual rejected or malformed operations are logged
//! and skipped so one bad row cannot poison a batch.

use crate::core::engine::TransferEngine;
use crate::core::traits::RecordStore;
use crate::io::csv_format::write_records_csv;
use crate::io::ops_reader::OpsReader;
use std::io::Write;
use std::path::Path;
use tracing::warn;

/// Process an operations file and write final record states to output
///
/// # Arguments
///
/// * `engine` - The engine to apply operations through
/// * `input_path` - Path to the operations CSV
/// * `output` - Writer receiving the final record-state CSV
///
/// # Errors
///
/// Returns a message for fatal failures only: the input file cannot be
/// opened or the output cannot be written. Per-operation failures are
/// logged at warn level and do not stop the run.
pub fn process_operations<S: RecordStore>(
    engine: &TransferEngine<S>,
    input_path: &Path,
    output: &mut dyn Write,
) -> Result<(), String> {
    let reader = OpsReader::new(input_path)?;

    for result in reader {
        match result {
            Ok(operation) => {
                if let Err(e) = engine.apply(operation) {
                    warn!(kind = e.kind(), error = %e, "operation rejected");
                }
            }
            Err(e) => {
                warn!(error = %e, "skipping malformed row");
            }
        }
    }

    write_records_csv(&engine.list(), output)
}
