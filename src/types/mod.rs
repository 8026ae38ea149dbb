//! Types module
//!
//! Contains core data structures used throughout the application.
//! This module organizes types into logical submodules:
//! - `product`: Product records and drafts
//! - `movement`: Movement records, requests and the scan draft
//! - `settings`: Persisted settings and dashboard figures
//! - `error`: Error types for the inventory ledger

pub mod error;
pub mod movement;
pub mod product;
pub mod settings;

pub use error::{FieldErrors, InventoryError, ScanError, StorageError};
pub use movement::{Movement, MovementDraft, MovementRequest, MovementType};
pub use product::{Product, ProductDraft};
pub use settings::{InventoryStats, Settings};
