//! Application settings persisted under the `settings` collection

use serde::{Deserialize, Serialize};

/// Company-level settings
///
/// Missing fields fall back to their defaults when loading older data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub company_name: String,

    /// Display name recorded as `user` on every committed movement
    pub responsible_user: String,

    /// Log a warning when a product is saved or moved at or below its threshold
    pub low_stock_alert: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            company_name: "Minha Empresa".to_string(),
            responsible_user: "Administrador".to_string(),
            low_stock_alert: true,
        }
    }
}

/// Summary figures for the dashboard
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InventoryStats {
    pub total_products: usize,
    pub low_stock_products: usize,
    pub movements_today: usize,
    /// Sum of stock across all products
    pub total_units: u64,
}
