//! Streaming reader for movement import files
//!
//! Yields one `Result<ImportRow, String>` per CSV row so a bad row can be
//! reported and skipped without stopping the import. Errors carry the file
//! line number (the header is line 1).
//!
//! ```no_run
//! use inventory_ledger::io::MovementReader;
//! use std::path::Path;
//!
//! let reader = MovementReader::from_path(Path::new("movements.csv")).unwrap();
//! for row in reader {
//!     match row {
//!         Ok(row) => println!("{} {} x{}", row.movement_type, row.code, row.quantity),
//!         Err(e) => eprintln!("Skipped: {}", e),
//!     }
//! }
//! ```

use crate::io::csv_format::{convert_csv_record, ImportRow, MovementCsvRecord};
use csv::{ReaderBuilder, Trim};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Iterator over import rows
#[derive(Debug)]
pub struct MovementReader<R: Read> {
    reader: csv::Reader<R>,
    rows_read: usize,
}

impl MovementReader<File> {
    /// Open a CSV file for import
    ///
    /// # Errors
    ///
    /// Returns a message if the file cannot be opened.
    pub fn from_path(path: &Path) -> Result<Self, String> {
        let file = File::open(path)
            .map_err(|e| format!("Failed to open file '{}': {}", path.display(), e))?;
        Ok(Self::from_reader(file))
    }
}

impl<R: Read> MovementReader<R> {
    /// Wrap any reader producing CSV text
    ///
    /// Fields are trimmed and rows may have a missing trailing quantity.
    pub fn from_reader(input: R) -> Self {
        let reader = ReaderBuilder::new()
            .trim(Trim::All)
            .flexible(true)
            .from_reader(input);

        MovementReader {
            reader,
            rows_read: 0,
        }
    }
}

impl<R: Read> Iterator for MovementReader<R> {
    type Item = Result<ImportRow, String>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.reader.deserialize::<MovementCsvRecord>().next()?;
        self.rows_read += 1;
        let line = self.rows_read + 1;

        Some(match result {
            Ok(record) => convert_csv_record(record).map_err(|e| format!("Line {}: {}", line, e)),
            Err(e) => Err(format!("Line {}: CSV parse error: {}", line, e)),
        })
    }
}
