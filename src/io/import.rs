//! Batch movement import
//!
//! Each row is resolved through the code resolver and applied through the
//! engine exactly as an interactive movement would be. Rows that fail to
//! parse, resolve or validate are logged and skipped.

use crate::core::clock::Clock;
use crate::core::engine::InventoryEngine;
use crate::io::csv_format::ImportRow;
use crate::storage::Storage;
use crate::types::{InventoryError, MovementRequest};
use tracing::{info, warn};

/// Counts produced by an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportSummary {
    pub applied: usize,
    pub rejected: usize,
}

/// Apply every row in order
pub fn import_movements<S, C, I>(engine: &mut InventoryEngine<S, C>, rows: I) -> ImportSummary
where
    S: Storage,
    C: Clock,
    I: IntoIterator<Item = Result<ImportRow, String>>,
{
    let mut summary = ImportSummary::default();

    for row in rows {
        let outcome = row.map_err(ImportFailure::Parse).and_then(|row| {
            apply_row(engine, &row).map_err(|e| ImportFailure::Rejected(row.code, e))
        });

        match outcome {
            Ok(()) => summary.applied += 1,
            Err(ImportFailure::Parse(message)) => {
                warn!(error = %message, "skipping unreadable import row");
                summary.rejected += 1;
            }
            Err(ImportFailure::Rejected(code, e)) => {
                warn!(code = %code, error = %e, "skipping rejected import row");
                summary.rejected += 1;
            }
        }
    }

    info!(applied = summary.applied, rejected = summary.rejected, "import finished");
    summary
}

enum ImportFailure {
    Parse(String),
    Rejected(String, InventoryError),
}

fn apply_row<S: Storage, C: Clock>(
    engine: &mut InventoryEngine<S, C>,
    row: &ImportRow,
) -> Result<(), InventoryError> {
    let product_id = engine.resolve_code(&row.code)?.id.clone();
    let request = MovementRequest {
        product_id,
        movement_type: Some(row.movement_type),
        quantity: row.quantity.clone(),
    };
    engine.apply_movement(&request).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::clock::FixedClock;
    use crate::io::MovementReader;
    use crate::storage::MemoryStorage;
    use crate::types::ProductDraft;
    use chrono::{Local, TimeZone};

    fn engine() -> (InventoryEngine<MemoryStorage, FixedClock>, String, String) {
        let clock = FixedClock::new(Local.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap());
        let mut engine = InventoryEngine::new(MemoryStorage::new(), clock);
        let mouse = engine
            .create_product(&ProductDraft::new("Mouse", "Perifericos", "MS-01").with_stock(10, 2))
            .unwrap();
        (engine, mouse.id, mouse.qr_code)
    }

    #[test]
    fn test_import_applies_rows_in_order() {
        let (mut engine, id, qr_code) = engine();
        let csv = format!(
            "type,code,quantity\nsaida,{qr},10\nentrada,{id},4\nsaida,{id},1\n",
            qr = qr_code,
            id = id
        );

        let summary = import_movements(&mut engine, MovementReader::from_reader(csv.as_bytes()));

        assert_eq!(summary, ImportSummary { applied: 3, rejected: 0 });
        assert_eq!(engine.catalog().get(&id).unwrap().stock, 3);
        assert_eq!(engine.ledger().len(), 3);
    }

    #[test]
    fn test_import_skips_bad_rows_and_continues() {
        let (mut engine, id, _) = engine();
        let csv = format!(
            "type,code,quantity\n\
             transfer,{id},1\n\
             entrada,UNKNOWN,1\n\
             saida,{id},50\n\
             entrada,{id},zero\n\
             entrada,{id},2\n",
            id = id
        );

        let summary = import_movements(&mut engine, MovementReader::from_reader(csv.as_bytes()));

        assert_eq!(summary, ImportSummary { applied: 1, rejected: 4 });
        assert_eq!(engine.catalog().get(&id).unwrap().stock, 12);
        assert_eq!(engine.ledger().len(), 1);
    }
}
