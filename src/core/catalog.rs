//! Product catalog module
//!
//! This module provides the `ProductCatalog` struct which owns every product
//! record and enforces per-record validation and uniqueness.
//!
//! The ProductCatalog is responsible for:
//! - Validating drafts (all failing fields reported together)
//! - Rejecting case-insensitive name collisions on create
//! - Generating unique ids and scan codes
//! - Replacing and removing records wholesale
//! - Looking products up by id or scan code

use crate::core::ids::{self, IdSequence};
use crate::storage::PRODUCTS_KEY;
use crate::types::{FieldErrors, InventoryError, Product, ProductDraft, StorageError};
use chrono::{DateTime, Local};
use std::collections::HashSet;

/// Minimum length of name, category and code after trimming
const MIN_TEXT_LEN: usize = 2;

/// Draft fields that passed validation
#[derive(Debug)]
struct ValidDraft {
    name: String,
    brand: String,
    category: String,
    code: String,
    stock: u32,
    min_stock: u32,
}

/// Owns all products in catalog (insertion) order
#[derive(Debug, Clone, Default)]
pub struct ProductCatalog {
    products: Vec<Product>,
    ids: IdSequence,
}

impl ProductCatalog {
    /// Create an empty catalog
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a catalog from previously stored products, keeping their order
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` when a stored product has `minStock`
    /// below 1 or shares its id or scan code with another product.
    pub fn from_products(products: Vec<Product>) -> Result<Self, StorageError> {
        let mut ids_seen = HashSet::new();
        let mut codes_seen = HashSet::new();
        for product in &products {
            if product.min_stock < 1 {
                return Err(StorageError::corrupt(
                    PRODUCTS_KEY,
                    format!("product {} has minStock {}", product.id, product.min_stock),
                ));
            }
            if !ids_seen.insert(product.id.as_str()) {
                return Err(StorageError::corrupt(
                    PRODUCTS_KEY,
                    format!("duplicate product id {}", product.id),
                ));
            }
            if !codes_seen.insert(product.qr_code.as_str()) {
                return Err(StorageError::corrupt(
                    PRODUCTS_KEY,
                    format!("duplicate qrCode {}", product.qr_code),
                ));
            }
        }

        Ok(ProductCatalog {
            products,
            ids: IdSequence::new(),
        })
    }

    /// All products in catalog order
    pub fn products(&self) -> &[Product] {
        &self.products
    }

    pub fn len(&self) -> usize {
        self.products.len()
    }

    pub fn is_empty(&self) -> bool {
        self.products.is_empty()
    }

    /// Look a product up by id
    pub fn get(&self, id: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.id == id)
    }

    /// Look a product up by scan code or id (exact match on either)
    pub fn find_by_code(&self, code: &str) -> Option<&Product> {
        self.products
            .iter()
            .find(|p| p.qr_code == code || p.id == code)
    }

    /// Products at or below their low-stock threshold, in catalog order
    pub fn low_stock(&self) -> Vec<&Product> {
        self.products.iter().filter(|p| p.is_low_stock()).collect()
    }

    /// Create a product from a draft
    ///
    /// Validates the draft, rejects a name that matches an existing product
    /// ignoring case and surrounding whitespace, then generates the id, scan
    /// code and creation date and appends the record.
    ///
    /// # Arguments
    ///
    /// * `draft` - The user-supplied fields
    /// * `now` - Current time, used for the id counter and `createdAt`
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Validation` listing every failing field.
    pub fn create(&mut self, draft: &ProductDraft, now: DateTime<Local>) -> Result<Product, InventoryError> {
        let valid = self.validate(draft, true)?;

        let id = self.next_product_id(now.timestamp_millis());
        let product = Product {
            qr_code: ids::qr_code(&id, &valid.name),
            id,
            name: valid.name,
            brand: valid.brand,
            category: valid.category,
            code: valid.code,
            stock: valid.stock,
            min_stock: valid.min_stock,
            created_at: now.date_naive(),
        };

        self.products.push(product.clone());
        Ok(product)
    }

    /// Replace the editable fields of an existing product
    ///
    /// Applies the same field validation as `create` but skips the name
    /// uniqueness check. `id`, `qrCode` and `createdAt` are preserved.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - No product has the given id
    /// - Any field fails validation
    pub fn update(&mut self, id: &str, draft: &ProductDraft) -> Result<Product, InventoryError> {
        let current = self
            .get(id)
            .ok_or_else(|| InventoryError::product_not_found(id))?;
        let valid = self.validate(draft, false)?;

        let product = Product {
            id: current.id.clone(),
            qr_code: current.qr_code.clone(),
            created_at: current.created_at,
            name: valid.name,
            brand: valid.brand,
            category: valid.category,
            code: valid.code,
            stock: valid.stock,
            min_stock: valid.min_stock,
        };

        self.replace(product.clone())?;
        Ok(product)
    }

    /// Remove a product
    ///
    /// The caller is responsible for obtaining explicit confirmation first.
    /// Movements referencing the product are not touched.
    ///
    /// # Returns
    ///
    /// The removed record
    pub fn delete(&mut self, id: &str) -> Result<Product, InventoryError> {
        let index = self
            .position(id)
            .ok_or_else(|| InventoryError::product_not_found(id))?;
        Ok(self.products.remove(index))
    }

    /// Write a whole record back over the one with the same id
    pub(crate) fn replace(&mut self, product: Product) -> Result<(), InventoryError> {
        let index = self
            .position(&product.id)
            .ok_or_else(|| InventoryError::product_not_found(&product.id))?;
        self.products[index] = product;
        Ok(())
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.products.iter().position(|p| p.id == id)
    }

    fn name_taken(&self, name: &str) -> bool {
        let wanted = name.trim().to_lowercase();
        self.products
            .iter()
            .any(|p| p.name.trim().to_lowercase() == wanted)
    }

    fn next_product_id(&mut self, now_millis: i64) -> String {
        loop {
            let id = ids::product_id(self.ids.next(now_millis));
            let code_prefix = format!("{}_{}_", ids::QR_CODE_PREFIX, id);
            let taken = self
                .products
                .iter()
                .any(|p| p.id == id || p.qr_code.starts_with(&code_prefix));
            if !taken {
                return id;
            }
        }
    }

    fn validate(&self, draft: &ProductDraft, check_unique_name: bool) -> Result<ValidDraft, InventoryError> {
        let mut errors = FieldErrors::new();

        let name = draft.name.trim();
        check_min_len(&mut errors, "name", "Name", name);
        if check_unique_name && !errors.contains("name") && self.name_taken(name) {
            errors.insert("name", "A product with this name already exists");
        }
        let category = draft.category.trim();
        check_min_len(&mut errors, "category", "Category", category);
        let code = draft.code.trim();
        check_min_len(&mut errors, "code", "Code", code);

        let stock = match u32::try_from(draft.stock) {
            Ok(stock) => stock,
            Err(_) if draft.stock < 0 => {
                errors.insert("stock", "Stock cannot be negative");
                0
            }
            Err(_) => {
                errors.insert("stock", "Stock is too large");
                0
            }
        };
        let min_stock = match u32::try_from(draft.min_stock) {
            Ok(min_stock) if min_stock >= 1 => min_stock,
            Err(_) if draft.min_stock > 0 => {
                errors.insert("minStock", "Minimum stock is too large");
                0
            }
            _ => {
                errors.insert("minStock", "Minimum stock must be at least 1");
                0
            }
        };

        errors.into_result()?;
        Ok(ValidDraft {
            name: name.to_string(),
            brand: draft.brand.trim().to_string(),
            category: category.to_string(),
            code: code.to_string(),
            stock,
            min_stock,
        })
    }
}

fn check_min_len(errors: &mut FieldErrors, field: &str, label: &str, value: &str) {
    if value.chars().count() < MIN_TEXT_LEN {
        errors.insert(
            field,
            format!("{} must be at least {} characters", label, MIN_TEXT_LEN),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};
    use rstest::rstest;

    fn now() -> DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap()
    }

    fn mouse() -> ProductDraft {
        ProductDraft::new("Mouse", "Perifericos", "MS-01").with_stock(10, 2)
    }

    #[test]
    fn test_create_generates_identity_fields() {
        let mut catalog = ProductCatalog::new();

        let product = catalog.create(&mouse().with_brand("  Logi "), now()).unwrap();

        assert_eq!(product.id, ids::product_id(now().timestamp_millis()));
        assert_eq!(product.qr_code, format!("PROD_{}_MOUSE", product.id));
        assert_eq!(product.brand, "Logi");
        assert_eq!(product.stock, 10);
        assert_eq!(product.min_stock, 2);
        assert_eq!(product.created_at, now().date_naive());
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_create_trims_text_fields() {
        let mut catalog = ProductCatalog::new();

        let product = catalog
            .create(&ProductDraft::new("  Mouse Gamer ", " Perifericos ", " MS-01 "), now())
            .unwrap();

        assert_eq!(product.name, "Mouse Gamer");
        assert_eq!(product.category, "Perifericos");
        assert_eq!(product.code, "MS-01");
        assert!(product.qr_code.ends_with("_MOUSE_GAMER"));
    }

    #[test]
    fn test_create_rejects_case_insensitive_name_collision() {
        let mut catalog = ProductCatalog::new();
        catalog.create(&mouse(), now()).unwrap();

        let result = catalog.create(&ProductDraft::new("mouse ", "Perifericos", "MS-02"), now());

        let err = result.unwrap_err();
        assert!(err.field_errors().unwrap().contains("name"));
        assert_eq!(catalog.len(), 1);
    }

    #[test]
    fn test_create_reports_every_failing_field() {
        let mut catalog = ProductCatalog::new();
        let draft = ProductDraft::new("M", " ", "X").with_stock(-1, 0);

        let err = catalog.create(&draft, now()).unwrap_err();
        let errors = err.field_errors().unwrap();

        for field in ["name", "category", "code", "stock", "minStock"] {
            assert!(errors.contains(field), "missing error for {}", field);
        }
        assert!(catalog.is_empty());
    }

    #[rstest]
    #[case::zero(0, false)]
    #[case::negative(-3, false)]
    #[case::one(1, true)]
    #[case::too_large(i64::from(u32::MAX) + 1, false)]
    fn test_min_stock_bounds(#[case] min_stock: i64, #[case] accepted: bool) {
        let mut catalog = ProductCatalog::new();
        let result = catalog.create(&mouse().with_stock(5, min_stock), now());

        assert_eq!(result.is_ok(), accepted);
        if !accepted {
            assert!(result.unwrap_err().field_errors().unwrap().contains("minStock"));
        }
    }

    #[test]
    fn test_ids_and_codes_stay_unique_within_one_millisecond() {
        let mut catalog = ProductCatalog::new();

        for i in 0..50 {
            let draft = ProductDraft::new(&format!("Item {}", i), "Geral", "IT");
            catalog.create(&draft, now()).unwrap();
        }

        let ids: HashSet<_> = catalog.products().iter().map(|p| p.id.clone()).collect();
        let codes: HashSet<_> = catalog.products().iter().map(|p| p.qr_code.clone()).collect();
        assert_eq!(ids.len(), 50);
        assert_eq!(codes.len(), 50);
    }

    #[test]
    fn test_id_generation_skips_ids_loaded_from_storage() {
        let mut catalog = ProductCatalog::new();
        let first = catalog.create(&mouse(), now()).unwrap();

        // A fresh catalog over the same data restarts its counter
        let mut reloaded = ProductCatalog::from_products(catalog.products().to_vec()).unwrap();
        let second = reloaded
            .create(&ProductDraft::new("Teclado", "Perifericos", "TC-01"), now())
            .unwrap();

        assert_ne!(first.id, second.id);
    }

    fn stored(id: &str, qr_code: &str, min_stock: u32) -> Product {
        Product {
            id: id.to_string(),
            name: format!("Item {}", id),
            brand: String::new(),
            category: "Geral".to_string(),
            code: "IT".to_string(),
            stock: 3,
            min_stock,
            qr_code: qr_code.to_string(),
            created_at: now().date_naive(),
        }
    }

    #[rstest]
    #[case::zero_min_stock(vec![stored("P1", "Q1", 0)], "minStock 0")]
    #[case::duplicate_id(vec![stored("P1", "Q1", 1), stored("P1", "Q2", 1)], "duplicate product id P1")]
    #[case::duplicate_qr_code(vec![stored("P1", "Q1", 1), stored("P2", "Q1", 1)], "duplicate qrCode Q1")]
    fn test_stored_products_breaking_invariants_are_corrupt(
        #[case] products: Vec<Product>,
        #[case] expected: &str,
    ) {
        let err = ProductCatalog::from_products(products).unwrap_err();

        match err {
            StorageError::Corrupt { key, message } => {
                assert_eq!(key, PRODUCTS_KEY);
                assert!(message.contains(expected), "unexpected message: {}", message);
            }
            other => panic!("Expected Corrupt, got {:?}", other),
        }
    }

    #[test]
    fn test_valid_stored_products_load_in_order() {
        let catalog =
            ProductCatalog::from_products(vec![stored("P2", "Q2", 1), stored("P1", "Q1", 5)]).unwrap();

        let ids: Vec<_> = catalog.products().iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["P2", "P1"]);
    }

    #[test]
    fn test_update_preserves_identity_and_skips_uniqueness() {
        let mut catalog = ProductCatalog::new();
        let created = catalog.create(&mouse(), now()).unwrap();

        let edited = ProductDraft::new("MOUSE", "Acessorios", "MS-99").with_stock(3, 4);
        let updated = catalog.update(&created.id, &edited).unwrap();

        assert_eq!(updated.id, created.id);
        assert_eq!(updated.qr_code, created.qr_code);
        assert_eq!(updated.created_at, created.created_at);
        assert_eq!(updated.name, "MOUSE");
        assert_eq!(updated.stock, 3);
        assert_eq!(catalog.get(&created.id), Some(&updated));
    }

    #[test]
    fn test_update_validates_fields() {
        let mut catalog = ProductCatalog::new();
        let created = catalog.create(&mouse(), now()).unwrap();

        let err = catalog
            .update(&created.id, &ProductDraft::new("Mouse", "C", "MS-01"))
            .unwrap_err();

        assert!(err.field_errors().unwrap().contains("category"));
        assert_eq!(catalog.get(&created.id), Some(&created));
    }

    #[test]
    fn test_update_unknown_product() {
        let mut catalog = ProductCatalog::new();

        let err = catalog.update("P404", &mouse()).unwrap_err();
        assert!(matches!(err, InventoryError::ProductNotFound { .. }));
    }

    #[test]
    fn test_delete_removes_record() {
        let mut catalog = ProductCatalog::new();
        let created = catalog.create(&mouse(), now()).unwrap();

        let removed = catalog.delete(&created.id).unwrap();

        assert_eq!(removed, created);
        assert!(catalog.get(&created.id).is_none());
        assert!(matches!(
            catalog.delete(&created.id),
            Err(InventoryError::ProductNotFound { .. })
        ));
    }

    #[test]
    fn test_find_by_code_matches_qr_code_or_id() {
        let mut catalog = ProductCatalog::new();
        let created = catalog.create(&mouse(), now()).unwrap();

        assert_eq!(catalog.find_by_code(&created.qr_code), Some(&created));
        assert_eq!(catalog.find_by_code(&created.id), Some(&created));
        assert_eq!(catalog.find_by_code("MS-01"), None);
        assert_eq!(catalog.find_by_code("prod_unknown"), None);
    }

    #[test]
    fn test_low_stock_keeps_catalog_order() {
        let mut catalog = ProductCatalog::new();
        let later = now() + Duration::milliseconds(1);
        catalog
            .create(&ProductDraft::new("Cabo", "Geral", "CB").with_stock(1, 5), now())
            .unwrap();
        catalog
            .create(&ProductDraft::new("Hub", "Geral", "HB").with_stock(50, 5), later)
            .unwrap();
        catalog
            .create(&ProductDraft::new("Pilha", "Geral", "PL").with_stock(5, 5), later)
            .unwrap();

        let names: Vec<_> = catalog.low_stock().iter().map(|p| p.name.as_str()).collect();
        assert_eq!(names, vec!["Cabo", "Pilha"]);
    }
}
