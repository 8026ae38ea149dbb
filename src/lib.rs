//! Inventory Ledger Library
//! # Overview
//!
//! This library keeps a product catalog and an append-only log of stock
//! movements consistent with each other, persisting both as JSON collections.
//!
//! # Architecture
//!
//! The system is organized into several key components:
//!
//! - [`types`] - Core data types (Product, Movement, Settings, errors)
//! - [`core`] - Business logic components:
//!   - [`core::engine`] - Movement validation, commit and persistence coupling
//!   - [`core::catalog`] - Product records, validation and id generation
//!   - [`core::ledger`] - Newest-first movement history
//!   - [`core::search`] / [`core::resolver`] - Catalog lookup
//! - [`storage`] - Persistence adapters for the `products`, `movements` and `settings` collections
//! - [`scanner`] - Bounded code capture with a simulated fallback
//! - [`io`] - CSV import and reports
//! - [`cli`] - CLI arguments parsing and command execution
//!
//! # Movement Types
//!
//! - **Entrada**: Add units to a product's stock
//! - **Saida**: Remove units (requires the product to hold at least the quantity)
//!
//! # Invariants
//!
//! - Stock is never negative
//! - A committed movement changes the product's stock and prepends one ledger entry together
//! - A rejected movement changes nothing and saves nothing

pub mod cli;
pub mod core;
pub mod io;
pub mod logging;
pub mod scanner;
pub mod storage;
pub mod types;

pub use core::{InventoryEngine, MovementLedger, ProductCatalog};
pub use io::{write_movements_csv, write_stock_report_csv};
pub use storage::{JsonFileStorage, MemoryStorage, Storage};
pub use types::{
    FieldErrors, InventoryError, Movement, MovementRequest, MovementType, Product, ProductDraft,
    ScanError, Settings, StorageError,
};
