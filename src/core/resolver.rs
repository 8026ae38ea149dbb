//! Scan payload to product resolution
//!
//! Exact matching only: a payload resolves when it equals a product's scan
//! code or id. Surrounding whitespace (the trailing newline of a
//! keyboard-wedge scanner) is ignored.

use crate::core::catalog::ProductCatalog;
use crate::types::{InventoryError, Product};

/// Resolve a scan payload against the catalog
///
/// # Errors
///
/// Returns `InventoryError::CodeNotFound` when no product matches.
pub fn resolve<'a>(catalog: &'a ProductCatalog, payload: &str) -> Result<&'a Product, InventoryError> {
    let code = payload.trim();
    if code.is_empty() {
        return Err(InventoryError::code_not_found(payload));
    }
    catalog
        .find_by_code(code)
        .ok_or_else(|| InventoryError::code_not_found(code))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ProductDraft;
    use chrono::{Local, TimeZone};

    fn catalog_with_mouse() -> (ProductCatalog, Product) {
        let mut catalog = ProductCatalog::new();
        let now = Local.with_ymd_and_hms(2026, 3, 10, 9, 30, 0).unwrap();
        let product = catalog
            .create(&ProductDraft::new("Mouse", "Perifericos", "MS-01"), now)
            .unwrap();
        (catalog, product)
    }

    #[test]
    fn test_resolves_scan_code_and_bare_id() {
        let (catalog, product) = catalog_with_mouse();

        assert_eq!(resolve(&catalog, &product.qr_code).unwrap(), &product);
        assert_eq!(resolve(&catalog, &product.id).unwrap(), &product);
        assert_eq!(resolve(&catalog, &format!("{}\n", product.qr_code)).unwrap(), &product);
    }

    #[test]
    fn test_unknown_payload_is_not_found() {
        let (catalog, _) = catalog_with_mouse();

        let err = resolve(&catalog, "PROD_P999999_NOPE").unwrap_err();
        assert_eq!(err, InventoryError::code_not_found("PROD_P999999_NOPE"));
    }

    #[test]
    fn test_no_fuzzy_matching() {
        let (catalog, product) = catalog_with_mouse();

        assert!(resolve(&catalog, &product.qr_code.to_lowercase()).is_err());
        assert!(resolve(&catalog, "MS-01").is_err());
        assert!(resolve(&catalog, "   ").is_err());
    }
}
