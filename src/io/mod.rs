//! I/O module
//!
//! Handles CSV import and report output.
//!
//! # Components
//!
//! - `csv_format` - CSV format handling (record conversion, report serialization)
//! - `movement_reader` - Streaming reader over movement import files
//! - `import` - Applies import rows through the engine

pub mod csv_format;
pub mod import;
pub mod movement_reader;

pub use csv_format::{
    convert_csv_record, write_movements_csv, write_stock_report_csv, ImportRow, MovementCsvRecord,
};
pub use import::{import_movements, ImportSummary};
pub use movement_reader::MovementReader;
