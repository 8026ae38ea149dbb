//! CSV format handling for movement imports and reports
//!
//! This module centralizes all CSV format concerns, providing:
//! - MovementCsvRecord structure for deserialization of import rows
//! - Conversion from CSV records to import rows
//! - Stock report and ledger serialization
//!
//! All functions are pure (no file I/O) for easy testing.

use crate::types::{Movement, MovementType, Product};
use serde::Deserialize;
use std::io::Write;

/// Timestamp layout used in the ledger export
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// CSV record structure for deserialization
///
/// Matches the import format with columns: type, code, quantity.
/// Quantity stays raw text; the engine decides whether it is acceptable.
#[derive(Debug, Deserialize, Clone, PartialEq)]
pub struct MovementCsvRecord {
    #[serde(rename = "type")]
    pub movement_type: String,
    pub code: String,
    #[serde(default)]
    pub quantity: String,
}

/// An import row ready to be resolved and applied
#[derive(Debug, Clone, PartialEq)]
pub struct ImportRow {
    pub movement_type: MovementType,
    pub code: String,
    pub quantity: String,
}

/// Convert a MovementCsvRecord to an ImportRow
///
/// # Errors
///
/// Returns a message when the type is neither `entrada` nor `saida`, or when
/// the code column is empty.
pub fn convert_csv_record(record: MovementCsvRecord) -> Result<ImportRow, String> {
    let movement_type = MovementType::parse_input(&record.movement_type)
        .ok_or_else(|| format!("Invalid movement type: '{}'", record.movement_type))?;

    if record.code.trim().is_empty() {
        return Err("Missing product code".to_string());
    }

    Ok(ImportRow {
        movement_type,
        code: record.code,
        quantity: record.quantity,
    })
}

/// Write the stock report
///
/// Columns: id, name, brand, category, code, stock, min_stock, low_stock.
/// Rows keep the order of `products`.
///
/// # Errors
///
/// Returns a message if writing to `output` fails.
pub fn write_stock_report_csv<'a, I>(products: I, output: &mut dyn Write) -> Result<(), String>
where
    I: IntoIterator<Item = &'a Product>,
{
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record([
            "id", "name", "brand", "category", "code", "stock", "min_stock", "low_stock",
        ])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for product in products {
        writer
            .write_record(&[
                product.id.clone(),
                product.name.clone(),
                product.brand.clone(),
                product.category.clone(),
                product.code.clone(),
                product.stock.to_string(),
                product.min_stock.to_string(),
                product.is_low_stock().to_string(),
            ])
            .map_err(|e| format!("Failed to write product record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}

/// Write the movement ledger, newest first
///
/// Columns: id, product_id, product, type, quantity, user, timestamp.
///
/// # Errors
///
/// Returns a message if writing to `output` fails.
pub fn write_movements_csv<'a, I>(movements: I, output: &mut dyn Write) -> Result<(), String>
where
    I: IntoIterator<Item = &'a Movement>,
{
    let mut writer = csv::Writer::from_writer(output);

    writer
        .write_record(["id", "product_id", "product", "type", "quantity", "user", "timestamp"])
        .map_err(|e| format!("Failed to write CSV header: {}", e))?;

    for movement in movements {
        writer
            .write_record(&[
                movement.id.clone(),
                movement.product_id.clone(),
                movement.product.clone(),
                movement.movement_type.to_string(),
                movement.quantity.to_string(),
                movement.user.clone(),
                movement.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            ])
            .map_err(|e| format!("Failed to write movement record: {}", e))?;
    }

    writer
        .flush()
        .map_err(|e| format!("Failed to flush output: {}", e))
}
