//! Product-related types for the inventory ledger
//!
//! This module defines the Product record owned by the catalog and the
//! draft used to create or edit one.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Catalog product
///
/// Persisted as camelCase JSON under the `products` collection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    /// Unique id (`P` followed by six digits), immutable after creation
    pub id: String,

    /// Display name, trimmed, at least 2 characters
    pub name: String,

    /// Optional brand, empty when not set
    #[serde(default)]
    pub brand: String,

    pub category: String,

    /// User-facing SKU (not required to be unique)
    pub code: String,

    /// Units on hand
    ///
    /// Only changed wholesale by edit-product or by a committed movement.
    pub stock: u32,

    /// Low-stock threshold, always at least 1
    pub min_stock: u32,

    /// Scan fingerprint generated at creation (`PROD_<id>_<NAME_SLUG>`)
    pub qr_code: String,

    /// Creation day
    pub created_at: NaiveDate,
}

impl Product {
    /// Whether the product is at or below its threshold
    pub fn is_low_stock(&self) -> bool {
        self.stock <= self.min_stock
    }
}

/// Input for creating or editing a product
///
/// Text fields are trimmed during validation. Numeric fields are signed so
/// that negative input is reported as a field error instead of failing to
/// parse upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductDraft {
    pub name: String,
    pub brand: String,
    pub category: String,
    pub code: String,
    pub stock: i64,
    pub min_stock: i64,
}

impl Default for ProductDraft {
    fn default() -> Self {
        ProductDraft {
            name: String::new(),
            brand: String::new(),
            category: String::new(),
            code: String::new(),
            stock: 0,
            min_stock: 1,
        }
    }
}

impl ProductDraft {
    /// Create a draft with the required text fields and default numbers
    pub fn new(name: &str, category: &str, code: &str) -> Self {
        ProductDraft {
            name: name.to_string(),
            category: category.to_string(),
            code: code.to_string(),
            ..Default::default()
        }
    }

    pub fn with_brand(mut self, brand: &str) -> Self {
        self.brand = brand.to_string();
        self
    }

    pub fn with_stock(mut self, stock: i64, min_stock: i64) -> Self {
        self.stock = stock;
        self.min_stock = min_stock;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn product(stock: u32, min_stock: u32) -> Product {
        Product {
            id: "P000001".to_string(),
            name: "Mouse".to_string(),
            brand: String::new(),
            category: "Perifericos".to_string(),
            code: "MS-01".to_string(),
            stock,
            min_stock,
            qr_code: "PROD_P000001_MOUSE".to_string(),
            created_at: NaiveDate::from_ymd_opt(2026, 3, 10).unwrap(),
        }
    }

    #[rstest]
    #[case::below(2, 5, true)]
    #[case::at_threshold(5, 5, true)]
    #[case::above(6, 5, false)]
    fn test_is_low_stock(#[case] stock: u32, #[case] min_stock: u32, #[case] expected: bool) {
        assert_eq!(product(stock, min_stock).is_low_stock(), expected);
    }

    #[test]
    fn test_product_serializes_camel_case() {
        let json = serde_json::to_value(product(3, 1)).unwrap();

        assert_eq!(json["minStock"], 1);
        assert_eq!(json["qrCode"], "PROD_P000001_MOUSE");
        assert_eq!(json["createdAt"], "2026-03-10");
    }

    #[test]
    fn test_missing_brand_defaults_to_empty() {
        let json = r#"{"id":"P1","name":"Mouse","category":"Perifericos","code":"MS",
            "stock":1,"minStock":1,"qrCode":"PROD_P1_MOUSE","createdAt":"2026-03-10"}"#;
        let product: Product = serde_json::from_str(json).unwrap();

        assert_eq!(product.brand, "");
    }

    #[test]
    fn test_negative_stock_does_not_deserialize() {
        let json = r#"{"id":"P1","name":"Mouse","category":"Perifericos","code":"MS",
            "stock":-1,"minStock":1,"qrCode":"PROD_P1_MOUSE","createdAt":"2026-03-10"}"#;

        assert!(serde_json::from_str::<Product>(json).is_err());
    }
}
