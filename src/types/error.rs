//! Error types for the inventory ledger
//!
//! This module defines every error the engine can surface. No error crosses an
//! operation boundary as a panic: each public operation returns a `Result`.
//!
//! # Error Categories
//!
//! - **Field validation errors**: reported together as a [`FieldErrors`] map
//! - **Operational errors**: insufficient stock, stock overflow, capture failures
//! - **Resolution errors**: a product id or scanned code that matches nothing
//! - **Storage errors**: unreadable or malformed persisted collections

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;
use thiserror::Error;

/// Field name to message map produced by validation
///
/// Multiple fields may fail at once; all of them are reported together.
/// The first message recorded for a field wins.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors {
    errors: BTreeMap<String, String>,
}

impl FieldErrors {
    /// Create an empty error map
    pub fn new() -> Self {
        FieldErrors {
            errors: BTreeMap::new(),
        }
    }

    /// Record a message for a field, keeping any earlier message for it
    pub fn insert(&mut self, field: &str, message: impl Into<String>) {
        self.errors
            .entry(field.to_string())
            .or_insert_with(|| message.into());
    }

    /// Message recorded for `field`, if any
    pub fn get(&self, field: &str) -> Option<&str> {
        self.errors.get(field).map(String::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.errors.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    /// Iterate `(field, message)` pairs in field-name order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.errors.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                write!(f, "; ")?;
            }
            write!(f, "{}: {}", field, message)?;
            first = false;
        }
        Ok(())
    }
}

/// Main error type for the inventory ledger
#[derive(Debug, Clone, PartialEq, Error)]
pub enum InventoryError {
    /// One or more input fields failed validation
    ///
    /// Recovered locally by the caller; nothing was mutated.
    #[error("Validation failed: {0}")]
    Validation(FieldErrors),

    /// No product has the given id
    #[error("Product {id} not found")]
    ProductNotFound {
        /// The id that was looked up
        id: String,
    },

    /// A scanned or typed code matched no product's qrCode or id
    #[error("No product matches code '{code}'")]
    CodeNotFound {
        /// The payload that failed to resolve
        code: String,
    },

    /// A saida asked for more units than the product holds
    ///
    /// The movement is rejected and the product keeps its stock.
    #[error("Insufficient stock for {product} ({product_id}): available {available}, requested {requested}")]
    InsufficientStock {
        product_id: String,
        /// Product name at validation time
        product: String,
        available: u32,
        requested: u32,
    },

    /// An entrada would push stock past the representable maximum
    #[error("Stock overflow for product {product_id}: {stock} + {quantity}")]
    StockOverflow {
        product_id: String,
        stock: u32,
        quantity: u32,
    },

    #[error(transparent)]
    Storage(#[from] StorageError),

    #[error(transparent)]
    Scan(#[from] ScanError),
}

/// Errors raised by a persistence adapter
#[derive(Debug, Clone, PartialEq, Error)]
pub enum StorageError {
    /// The backing medium could not be read or written
    #[error("Storage I/O error for '{key}': {message}")]
    Io { key: String, message: String },

    /// A stored collection exists but does not decode
    ///
    /// Never replaced by the default value: that would discard the ledger.
    #[error("Stored collection '{key}' is malformed: {message}")]
    Corrupt { key: String, message: String },

    /// A collection could not be encoded for saving
    #[error("Failed to encode collection '{key}': {message}")]
    Encode { key: String, message: String },
}

/// Errors raised while capturing a code from a scan device
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ScanError {
    /// The device could not be acquired (missing, denied, closed input)
    #[error("Capture device unavailable: {reason}")]
    Unavailable { reason: String },

    /// The device produced nothing within the capture window
    #[error("No code captured within {waited_ms} ms")]
    TimedOut { waited_ms: u64 },

    /// The device finished without reading a code
    #[error("Capture finished without detecting a code")]
    NothingDetected,
}

// Helper functions for creating common errors

impl FieldErrors {
    /// Convert into `Ok(())` when empty, or a validation error otherwise
    pub fn into_result(self) -> Result<(), InventoryError> {
        if self.is_empty() {
            Ok(())
        } else {
            Err(InventoryError::Validation(self))
        }
    }
}

impl InventoryError {
    /// Create a Validation error carrying a single field message
    pub fn field(field: &str, message: impl Into<String>) -> Self {
        let mut errors = FieldErrors::new();
        errors.insert(field, message);
        InventoryError::Validation(errors)
    }

    /// Create a ProductNotFound error
    pub fn product_not_found(id: &str) -> Self {
        InventoryError::ProductNotFound { id: id.to_string() }
    }

    /// Create a CodeNotFound error
    pub fn code_not_found(code: &str) -> Self {
        InventoryError::CodeNotFound {
            code: code.to_string(),
        }
    }

    /// Create an InsufficientStock error
    pub fn insufficient_stock(product_id: &str, product: &str, available: u32, requested: u32) -> Self {
        InventoryError::InsufficientStock {
            product_id: product_id.to_string(),
            product: product.to_string(),
            available,
            requested,
        }
    }

    /// Create a StockOverflow error
    pub fn stock_overflow(product_id: &str, stock: u32, quantity: u32) -> Self {
        InventoryError::StockOverflow {
            product_id: product_id.to_string(),
            stock,
            quantity,
        }
    }

    /// Field errors carried by a Validation error
    pub fn field_errors(&self) -> Option<&FieldErrors> {
        match self {
            InventoryError::Validation(errors) => Some(errors),
            _ => None,
        }
    }
}

impl StorageError {
    /// Create an Io error
    pub fn io(key: &str, message: impl Into<String>) -> Self {
        StorageError::Io {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Create a Corrupt error
    pub fn corrupt(key: &str, message: impl Into<String>) -> Self {
        StorageError::Corrupt {
            key: key.to_string(),
            message: message.into(),
        }
    }

    /// Create an Encode error
    pub fn encode(key: &str, message: impl Into<String>) -> Self {
        StorageError::Encode {
            key: key.to_string(),
            message: message.into(),
        }
    }
}

impl ScanError {
    /// Create an Unavailable error
    pub fn unavailable(reason: impl Into<String>) -> Self {
        ScanError::Unavailable {
            reason: reason.into(),
        }
    }

    /// Create a TimedOut error for the given capture window
    pub fn timed_out(window: Duration) -> Self {
        ScanError::TimedOut {
            waited_ms: u64::try_from(window.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Whether a simulated capture may stand in for the failed device
    pub fn allows_fallback(&self) -> bool {
        matches!(self, ScanError::Unavailable { .. } | ScanError::TimedOut { .. })
    }
}
