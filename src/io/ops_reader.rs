//! Streaming CSV reader for operation files
//!
//! Provides an iterator over operations from a CSV file, one row at a
//! time, delegating format concerns to the csv_format module. Fatal errors
//! (file not found) surface from `new()`; per-row parse and conversion
//! errors are yielded as `Err` items carrying the line number, so the
//! caller can log and keep going.

use crate::io::csv_format::{convert_operation, CsvOperation};
use crate::types::OperationRecord;
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::path::Path;

/// Streaming operations reader
///
/// Implements `Iterator`, yielding `Result<OperationRecord, String>` per
/// CSV row. Rows are processed one at a time; memory use does not grow
/// with file size.
#[derive(Debug)]
pub struct OpsReader {
    reader: csv::Reader<File>,
    line_num: usize,
}

impl OpsReader {
    /// Open an operations CSV for streaming iteration
    ///
    /// The reader trims whitespace from all fields and tolerates rows with
    /// trailing columns omitted.
    ///
    /// # Errors
    ///
    /// Returns a message when the file cannot be opened.
    pub fn new(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;

        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(file);

        Ok(Self {
            reader,
            line_num: 0,
        })
    }
}

impl Iterator for OpsReader {
    type Item = Result<OperationRecord, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let mut deserializer = self.reader.deserialize::<CsvOperation>();

        match deserializer.next()? {
            Ok(row) => {
                self.line_num += 1;
                // Line numbers are 1-based and account for the header row.
                Some(
                    convert_operation(row)
                        .map_err(|e| format!("Line {}: {}", self.line_num + 1, e)),
                )
            }
            Err(e) => {
                self.line_num += 1;
                Some(Err(format!(
                    "Line {}: CSV parse error: {}",
                    self.line_num + 1,
                    e
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::OperationType;
    use rust_decimal::Decimal;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("Failed to create temp file");
        file.write_all(content.as_bytes())
            .expect("Failed to write to temp file");
        file.flush().expect("Failed to flush temp file");
        file
    }

    #[test]
    fn test_reader_fails_on_missing_file() {
        let result = OpsReader::new(Path::new("nonexistent.csv"));
        assert!(result.is_err());
        assert!(result.unwrap_err().contains("Failed to open file"));
    }

    #[test]
    fn test_reader_iterates_all_operation_types() {
        let csv_content = "op,id,to,name,description,amount,active\n\
            create,,,Meal Allowance,monthly,1000.00,\n\
            update,1,,Food Allowance,,,\n\
            transfer,1,2,,,300.00,\n\
            delete,2,,,,,\n";
        let file = create_temp_csv(csv_content);

        let reader = OpsReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.filter_map(Result::ok).collect();

        assert_eq!(records.len(), 4);
        assert_eq!(records[0].op, OperationType::Create);
        assert_eq!(records[0].amount, Some(Decimal::new(100000, 2)));
        assert_eq!(records[1].op, OperationType::Update);
        assert_eq!(records[1].name.as_deref(), Some("Food Allowance"));
        assert_eq!(records[2].op, OperationType::Transfer);
        assert_eq!(records[2].to, Some(2));
        assert_eq!(records[3].op, OperationType::Delete);
    }

    #[test]
    fn test_reader_includes_line_numbers_in_errors() {
        let csv_content = "op,id,to,name,description,amount,active\n\
            create,,,Meal Allowance,,100.00,\n\
            create,,,Broken,,lots,\n\
            delete,1,,,,,\n";
        let file = create_temp_csv(csv_content);

        let reader = OpsReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.collect();

        assert_eq!(records.len(), 3);
        assert!(records[0].is_ok());
        assert!(records[1].is_err());
        assert!(records[2].is_ok());

        let error = records[1].as_ref().unwrap_err();
        assert!(error.contains("Line 3"));
        assert!(error.contains("Invalid amount"));
    }

    #[test]
    fn test_reader_continues_after_invalid_operation() {
        let csv_content = "op,id,to,name,description,amount,active\n\
            freeze,1,,,,,\n\
            delete,1,,,,,\n";
        let file = create_temp_csv(csv_content);

        let reader = OpsReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.collect();

        assert!(records[0].is_err());
        assert!(records[1].is_ok());
    }

    #[test]
    fn test_reader_handles_empty_file_after_header() {
        let file = create_temp_csv("op,id,to,name,description,amount,active\n");

        let reader = OpsReader::new(file.path()).unwrap();
        assert_eq!(reader.count(), 0);
    }

    #[test]
    fn test_reader_trims_whitespace() {
        let csv_content = "op,id,to,name,description,amount,active\n\
            transfer , 1 , 2 ,,, 300.00 ,\n";
        let file = create_temp_csv(csv_content);

        let reader = OpsReader::new(file.path()).unwrap();
        let records: Vec<_> = reader.filter_map(Result::ok).collect();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(1));
        assert_eq!(records[0].amount, Some(Decimal::new(30000, 2)));
    }
}
