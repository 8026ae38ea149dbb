//! Core business logic module
//!
//! This module contains the inventory components:
//! - `engine` - Movement processing orchestration and persistence coupling
//! - `catalog` - Product catalog state and validation
//! - `ledger` - Append-only, newest-first movement history
//! - `search` - Multi-field catalog filtering
//! - `resolver` - Scan payload to product resolution
//! - `ids` - Product ids, movement ids and scan codes
//! - `clock` - Injectable time source

pub mod catalog;
pub mod clock;
pub mod engine;
pub mod ids;
pub mod ledger;
pub mod resolver;
pub mod search;

pub use catalog::ProductCatalog;
pub use clock::{Clock, FixedClock, SystemClock};
pub use engine::InventoryEngine;
pub use ledger::MovementLedger;
