//! Movement-related types for the inventory ledger
//!
//! This module defines movement types, the committed Movement record, and the
//! request/draft inputs consumed by the stock mutation engine.

use chrono::{DateTime, Local, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MovementType {
    /// Stock-increasing movement
    Entrada,

    /// Stock-decreasing movement
    ///
    /// Only committed when the product holds at least the requested quantity.
    Saida,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::Entrada => "entrada",
            MovementType::Saida => "saida",
        }
    }

    /// Parse user input, ignoring case and surrounding whitespace
    ///
    /// Anything other than `entrada` or `saida` yields `None`.
    pub fn parse_input(input: &str) -> Option<Self> {
        match input.trim().to_lowercase().as_str() {
            "entrada" => Some(MovementType::Entrada),
            "saida" => Some(MovementType::Saida),
            _ => None,
        }
    }
}

impl fmt::Display for MovementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Committed ledger entry
///
/// Never mutated or deleted once appended. `product` is a name snapshot, so
/// the entry stays readable after its product is deleted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Movement {
    /// Unique id, increasing in creation order
    pub id: String,

    /// Weak reference to the product active at commit time
    pub product_id: String,

    /// Product name at commit time
    pub product: String,

    /// Units moved, always greater than zero
    pub quantity: u32,

    #[serde(rename = "type")]
    pub movement_type: MovementType,

    /// Responsible user's display name from settings
    pub user: String,

    pub timestamp: DateTime<Local>,
}

impl Movement {
    /// Calendar day the movement was committed on
    pub fn date(&self) -> NaiveDate {
        self.timestamp.date_naive()
    }
}

/// Fully specified movement request
///
/// `quantity` is raw user input; the engine parses it and rejects anything
/// that is not a whole number greater than zero.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MovementRequest {
    pub product_id: String,
    pub movement_type: Option<MovementType>,
    pub quantity: String,
}

impl MovementRequest {
    pub fn new(product_id: &str, movement_type: MovementType, quantity: &str) -> Self {
        MovementRequest {
            product_id: product_id.to_string(),
            movement_type: Some(movement_type),
            quantity: quantity.to_string(),
        }
    }
}

/// Transient selection state of the scanning front end
///
/// Filled in step by step (scan or pick a product, choose a type, type a
/// quantity) and cleared after a commit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MovementDraft {
    pub product_id: Option<String>,
    pub movement_type: Option<MovementType>,
    pub quantity: String,
}

impl MovementDraft {
    /// Whether nothing has been selected or entered
    pub fn is_empty(&self) -> bool {
        self.product_id.is_none() && self.movement_type.is_none() && self.quantity.is_empty()
    }
}
