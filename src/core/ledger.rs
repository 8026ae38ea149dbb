//! Movement ledger
//!
//! This module provides the MovementLedger component that holds the history of
//! committed stock movements.
//!
//! # Ordering
//!
//! The ledger is newest-first: `append` inserts at the head, so the first
//! element is always the most recent movement. This is a contract, not a
//! display sort.
//!
//! # Mutability
//!
//! Entries are never edited or removed. Only the stock mutation engine appends.

use crate::core::ids::{self, IdSequence};
use crate::storage::MOVEMENTS_KEY;
use crate::types::{Movement, StorageError};
use chrono::NaiveDate;
use std::collections::{HashSet, VecDeque};

/// Append-only, newest-first movement history
#[derive(Debug, Clone, Default)]
pub struct MovementLedger {
    movements: VecDeque<Movement>,
    ids: IdSequence,
}

impl MovementLedger {
    /// Create an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger from stored movements (newest first)
    ///
    /// The id counter resumes after the largest generated id found, so new
    /// ids keep increasing across restarts.
    ///
    /// # Errors
    ///
    /// Returns `StorageError::Corrupt` when a stored movement has a zero
    /// quantity or repeats another movement's id.
    pub fn from_movements(movements: Vec<Movement>) -> Result<Self, StorageError> {
        let mut ids_seen = HashSet::new();
        for movement in &movements {
            if movement.quantity == 0 {
                return Err(StorageError::corrupt(
                    MOVEMENTS_KEY,
                    format!("movement {} has quantity 0", movement.id),
                ));
            }
            if !ids_seen.insert(movement.id.as_str()) {
                return Err(StorageError::corrupt(
                    MOVEMENTS_KEY,
                    format!("duplicate movement id {}", movement.id),
                ));
            }
        }

        let last = movements
            .iter()
            .filter_map(|m| ids::movement_counter(&m.id))
            .max()
            .unwrap_or(0);

        Ok(MovementLedger {
            movements: movements.into(),
            ids: IdSequence::resume_from(last),
        })
    }

    /// Insert a movement at the head
    pub fn append(&mut self, movement: Movement) {
        self.movements.push_front(movement);
    }

    /// Allocate the id for the next movement
    pub(crate) fn next_id(&mut self, now_millis: i64) -> String {
        ids::movement_id(self.ids.next(now_millis))
    }

    /// Most recent movement
    pub fn latest(&self) -> Option<&Movement> {
        self.movements.front()
    }

    /// All movements, newest first
    pub fn movements(&self) -> impl Iterator<Item = &Movement> {
        self.movements.iter()
    }

    /// Movements recorded against one product id, newest first
    pub fn for_product<'a>(&'a self, product_id: &'a str) -> impl Iterator<Item = &'a Movement> {
        self.movements
            .iter()
            .filter(move |m| m.product_id == product_id)
    }

    /// Number of movements committed on `day`
    ///
    /// Callers pass the engine clock's current date at query time.
    pub fn count_on(&self, day: NaiveDate) -> usize {
        self.movements.iter().filter(|m| m.date() == day).count()
    }

    pub fn len(&self) -> usize {
        self.movements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.movements.is_empty()
    }
}
