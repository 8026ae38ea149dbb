//! Inventory engine
//!
//! This module provides the InventoryEngine that owns the product catalog, the
//! movement ledger and the settings, and couples them with the persistence
//! adapter.
//!
//! The engine enforces business rules such as:
//! - Validation before any state change (rejected attempts mutate nothing)
//! - Stock never going negative (saida requires `stock >= quantity`)
//! - Catalog and ledger changing together on every committed movement
//! - Saving each affected collection exactly once after a committed change
//!
//! # Movement lifecycle
//!
//! ```text
//! Idle -> Validating -> Rejected
//!                    -> Committing -> Committed (draft cleared, back to Idle)
//! ```
//!
//! Exclusive `&mut self` access is the busy gate: a second submission cannot
//! start while one is being processed.

use crate::core::catalog::ProductCatalog;
use crate::core::clock::{Clock, SystemClock};
use crate::core::ledger::MovementLedger;
use crate::core::{resolver, search};
use crate::storage::{self, Storage, MOVEMENTS_KEY, PRODUCTS_KEY, SETTINGS_KEY};
use crate::types::{
    FieldErrors, InventoryError, InventoryStats, Movement, MovementDraft, MovementRequest,
    MovementType, Product, ProductDraft, Settings,
};
use serde::Serialize;
use tracing::{debug, error, info, warn};

/// A movement that passed validation and is ready to commit
///
/// Holds a snapshot of the product taken at validation time together with
/// the stock it will have once the movement applies.
#[derive(Debug)]
struct ValidatedMovement {
    product: Product,
    movement_type: MovementType,
    quantity: u32,
    new_stock: u32,
}

/// Inventory ledger engine
///
/// Orchestrates catalog mutations and stock movements, then persists the
/// affected collections through `S`.
pub struct InventoryEngine<S: Storage, C: Clock = SystemClock> {
    catalog: ProductCatalog,
    ledger: MovementLedger,
    settings: Settings,
    draft: MovementDraft,
    storage: S,
    clock: C,
}

impl<S: Storage, C: Clock> InventoryEngine<S, C> {
    /// Create an engine with an empty catalog, empty ledger and default settings
    ///
    /// Nothing is read from `storage`; use [`InventoryEngine::load`] to resume
    /// persisted state.
    pub fn new(storage: S, clock: C) -> Self {
        InventoryEngine {
            catalog: ProductCatalog::new(),
            ledger: MovementLedger::new(),
            settings: Settings::default(),
            draft: MovementDraft::default(),
            storage,
            clock,
        }
    }

    /// Load the three collections from storage, defaulting the missing ones
    ///
    /// # Errors
    ///
    /// Returns an error if a collection cannot be read, does not decode, or
    /// holds records that break the catalog or ledger invariants.
    pub fn load(storage: S, clock: C) -> Result<Self, InventoryError> {
        let products: Vec<Product> = storage::load_or_default(&storage, PRODUCTS_KEY, Vec::new())?;
        let movements: Vec<Movement> = storage::load_or_default(&storage, MOVEMENTS_KEY, Vec::new())?;
        let settings: Settings = storage::load_or_default(&storage, SETTINGS_KEY, Settings::default())?;

        info!(
            products = products.len(),
            movements = movements.len(),
            "inventory loaded"
        );

        Ok(InventoryEngine {
            catalog: ProductCatalog::from_products(products)?,
            ledger: MovementLedger::from_movements(movements)?,
            settings,
            draft: MovementDraft::default(),
            storage,
            clock,
        })
    }

    pub fn catalog(&self) -> &ProductCatalog {
        &self.catalog
    }

    pub fn ledger(&self) -> &MovementLedger {
        &self.ledger
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Current scan/selection draft
    pub fn draft(&self) -> &MovementDraft {
        &self.draft
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    // =========================================================================
    // Catalog operations
    // =========================================================================

    /// Create a product and save the catalog
    ///
    /// # Errors
    ///
    /// Returns `InventoryError::Validation` when any field is invalid or the
    /// name is already taken. Nothing is saved on error.
    pub fn create_product(&mut self, draft: &ProductDraft) -> Result<Product, InventoryError> {
        let product = self.catalog.create(draft, self.clock.now())?;
        info!(product_id = %product.id, name = %product.name, "product created");
        self.alert_if_low_stock(&product);
        self.save_products();
        Ok(product)
    }

    /// Edit a product and save the catalog
    ///
    /// # Errors
    ///
    /// Returns an error if the product does not exist or the draft is invalid.
    pub fn update_product(&mut self, id: &str, draft: &ProductDraft) -> Result<Product, InventoryError> {
        let product = self.catalog.update(id, draft)?;
        info!(product_id = %product.id, "product updated");
        self.alert_if_low_stock(&product);
        self.save_products();
        Ok(product)
    }

    /// Delete a product and save the catalog
    ///
    /// Callers must obtain explicit confirmation before invoking this. The
    /// product's movements stay in the ledger with their name snapshot.
    /// A selection draft pointing at the product is cleared.
    pub fn delete_product(&mut self, id: &str) -> Result<Product, InventoryError> {
        let product = self.catalog.delete(id)?;
        if self.draft.product_id.as_deref() == Some(id) {
            self.draft = MovementDraft::default();
        }
        info!(product_id = %product.id, "product deleted");
        self.save_products();
        Ok(product)
    }

    /// Replace the settings and save them
    pub fn update_settings(&mut self, settings: Settings) {
        self.settings = settings;
        info!("settings updated");
        Self::save_collection(&mut self.storage, SETTINGS_KEY, &self.settings);
    }

    // =========================================================================
    // Queries
    // =========================================================================

    /// Products matching `term` in catalog order (everything when blank)
    pub fn search(&self, term: &str) -> Vec<&Product> {
        search::search(self.catalog.products(), term)
    }

    /// Resolve a scan payload to a product by scan code or id
    pub fn resolve_code(&self, payload: &str) -> Result<&Product, InventoryError> {
        resolver::resolve(&self.catalog, payload)
    }

    /// Movements committed on the clock's current day
    pub fn count_today(&self) -> usize {
        self.ledger.count_on(self.clock.now().date_naive())
    }

    /// Dashboard figures computed from the current state
    pub fn stats(&self) -> InventoryStats {
        InventoryStats {
            total_products: self.catalog.len(),
            low_stock_products: self.catalog.low_stock().len(),
            movements_today: self.count_today(),
            total_units: self
                .catalog
                .products()
                .iter()
                .map(|p| u64::from(p.stock))
                .sum(),
        }
    }

    // =========================================================================
    // Stock mutation
    // =========================================================================

    /// Validate and commit a movement
    ///
    /// On success the ledger gains exactly one entry at its head, the product's
    /// stock changes by the quantity, both collections are saved once, and the
    /// selection draft is cleared.
    ///
    /// # Arguments
    ///
    /// * `request` - Product id, movement type and raw quantity text
    ///
    /// # Returns
    ///
    /// The committed movement
    ///
    /// # Errors
    ///
    /// Returns an error, without changing any state, if:
    /// - The product does not exist
    /// - The type is missing or the quantity is not a whole number above zero
    /// - A saida exceeds the product's stock
    /// - An entrada would overflow the stock counter
    pub fn apply_movement(&mut self, request: &MovementRequest) -> Result<Movement, InventoryError> {
        let validated = match self.validate_movement(request) {
            Ok(validated) => validated,
            Err(e) => {
                debug!(product_id = %request.product_id, error = %e, "movement rejected");
                return Err(e);
            }
        };
        self.commit_movement(validated)
    }

    /// Select the target product by id
    pub fn select_product(&mut self, id: &str) -> Result<&Product, InventoryError> {
        let product = self
            .catalog
            .get(id)
            .ok_or_else(|| InventoryError::product_not_found(id))?;
        self.draft.product_id = Some(product.id.clone());
        Ok(product)
    }

    /// Select the target product from a scan payload
    ///
    /// An unresolved payload leaves the current selection unchanged.
    pub fn select_by_code(&mut self, payload: &str) -> Result<&Product, InventoryError> {
        let product = resolver::resolve(&self.catalog, payload)?;
        self.draft.product_id = Some(product.id.clone());
        Ok(product)
    }

    pub fn set_movement_type(&mut self, movement_type: MovementType) {
        self.draft.movement_type = Some(movement_type);
    }

    /// Store the raw quantity text as typed
    pub fn set_quantity(&mut self, quantity: &str) {
        self.draft.quantity = quantity.to_string();
    }

    /// Discard the current selection
    pub fn clear_draft(&mut self) {
        self.draft = MovementDraft::default();
    }

    /// Submit the current draft as a movement
    ///
    /// A rejected draft is kept so the user can correct it; a committed one is
    /// cleared.
    ///
    /// # Errors
    ///
    /// Same as [`InventoryEngine::apply_movement`], plus a `product` field
    /// error when no product has been selected.
    pub fn submit_draft(&mut self) -> Result<Movement, InventoryError> {
        let product_id = self
            .draft
            .product_id
            .clone()
            .ok_or_else(|| InventoryError::field("product", "Select a product first"))?;

        let request = MovementRequest {
            product_id,
            movement_type: self.draft.movement_type,
            quantity: self.draft.quantity.clone(),
        };
        self.apply_movement(&request)
    }

    fn validate_movement(&self, request: &MovementRequest) -> Result<ValidatedMovement, InventoryError> {
        let product = self
            .catalog
            .get(&request.product_id)
            .ok_or_else(|| InventoryError::product_not_found(&request.product_id))?;

        let mut errors = FieldErrors::new();
        if request.movement_type.is_none() {
            errors.insert("type", "Choose entrada or saida");
        }
        let quantity = match parse_quantity(&request.quantity) {
            Ok(quantity) => Some(quantity),
            Err(message) => {
                errors.insert("quantity", message);
                None
            }
        };

        let (Some(movement_type), Some(quantity)) = (request.movement_type, quantity) else {
            return Err(InventoryError::Validation(errors));
        };

        let new_stock = match movement_type {
            MovementType::Entrada => product
                .stock
                .checked_add(quantity)
                .ok_or_else(|| InventoryError::stock_overflow(&product.id, product.stock, quantity))?,
            MovementType::Saida => {
                if product.stock < quantity {
                    return Err(InventoryError::insufficient_stock(
                        &product.id,
                        &product.name,
                        product.stock,
                        quantity,
                    ));
                }
                product.stock - quantity
            }
        };

        Ok(ValidatedMovement {
            product: product.clone(),
            movement_type,
            quantity,
            new_stock,
        })
    }

    fn commit_movement(&mut self, validated: ValidatedMovement) -> Result<Movement, InventoryError> {
        let ValidatedMovement {
            product,
            movement_type,
            quantity,
            new_stock,
        } = validated;

        // The catalog write is the only fallible step, so it goes first:
        // if it fails the ledger is untouched.
        let updated = Product {
            stock: new_stock,
            ..product
        };
        self.catalog.replace(updated.clone())?;

        let now = self.clock.now();
        let movement = Movement {
            id: self.ledger.next_id(now.timestamp_millis()),
            product_id: updated.id.clone(),
            product: updated.name.clone(),
            quantity,
            movement_type,
            user: self.settings.responsible_user.clone(),
            timestamp: now,
        };
        self.ledger.append(movement.clone());
        self.draft = MovementDraft::default();

        info!(
            movement_id = %movement.id,
            product_id = %movement.product_id,
            movement_type = %movement.movement_type,
            quantity,
            stock = updated.stock,
            "movement committed"
        );
        self.alert_if_low_stock(&updated);

        Self::save_collection(&mut self.storage, MOVEMENTS_KEY, &self.ledger.movements().collect::<Vec<_>>());
        self.save_products();
        Ok(movement)
    }

    /// Emit the low-stock alert when enabled and `product` is at or below its minimum
    fn alert_if_low_stock(&self, product: &Product) {
        if self.settings.low_stock_alert && product.is_low_stock() {
            warn!(
                product_id = %product.id,
                name = %product.name,
                stock = product.stock,
                min_stock = product.min_stock,
                "product is at or below minimum stock"
            );
        }
    }

    fn save_products(&mut self) {
        Self::save_collection(&mut self.storage, PRODUCTS_KEY, self.catalog.products());
    }

    /// Save one collection; failures are logged and do not undo the commit
    fn save_collection<T: Serialize + ?Sized>(storage: &mut S, key: &str, value: &T) {
        if let Err(e) = storage::save(storage, key, value) {
            error!(key, error = %e, "failed to save collection");
        }
    }
}

/// Parse free-text quantity input
///
/// Accepts only a whole number greater than zero (surrounding whitespace
/// ignored). Nothing is coerced to a default.
fn parse_quantity(input: &str) -> Result<u32, &'static str> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err("Enter a quantity");
    }
    let value: i64 = trimmed
        .parse()
        .map_err(|_| "Quantity must be a whole number")?;
    if value <= 0 {
        return Err("Quantity must be greater than zero");
    }
    u32::try_from(value).map_err(|_| "Quantity is too large")
}
