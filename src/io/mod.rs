//! I/O module
//!
//! Handles CSV parsing and output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (row conversion, output serialization)
//! - `ops_reader` - Streaming operations reader with iterator interface
//! - `batch` - The read-apply-write batch pipeline

pub mod batch;
pub mod csv_format;
pub mod ops_reader;

pub use batch::process_operations;
pub use csv_format::{convert_operation, write_records_csv, CsvOperation};
pub use ops_reader::OpsReader;
