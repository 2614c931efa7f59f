//! Generic entity table: identity assignment plus CRUD over one record kind.
//!
//! The table itself is not synchronized. Each concrete store wraps its table
//! together with its relation index behind a single lock, so a table
//! mutation and the matching index update always happen in one critical
//! section.

use std::collections::BTreeMap;

use crate::error::{Result, StoreError};

/// A record that can live in an [`EntityTable`].
pub trait Entity: Clone {
    /// Table name used in error messages ("user", "film")
    const KIND: &'static str;

    fn id(&self) -> u64;

    fn assign_id(&mut self, id: u64);
}

/// Owns the rows of one entity kind.
///
/// ## Identity
/// Ids come from a monotonic counter that starts at 1 and only moves
/// forward. Deleting the row with the highest id does not make that id
/// available again.
///
/// Rows live in a `BTreeMap`, so iteration and snapshots are in id order.
#[derive(Debug, Clone)]
pub struct EntityTable<T> {
    rows: BTreeMap<u64, T>,
    next_id: u64,
}

impl<T: Entity> EntityTable<T> {
    pub fn new() -> Self {
        Self {
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Assign a fresh id to `record`, store it, and return the stored copy.
    pub fn insert(&mut self, mut record: T) -> T {
        let id = self.next_id;
        self.next_id += 1;
        record.assign_id(id);
        self.rows.insert(id, record.clone());
        record
    }

    /// Replace the row with the same id wholesale.
    pub fn replace(&mut self, record: T) -> Result<T> {
        match self.rows.get_mut(&record.id()) {
            Some(slot) => {
                *slot = record.clone();
                Ok(record)
            }
            None => Err(StoreError::not_found(T::KIND, record.id())),
        }
    }

    /// Remove a row, returning it.
    pub fn remove(&mut self, id: u64) -> Result<T> {
        self.rows
            .remove(&id)
            .ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    pub fn get(&self, id: u64) -> Option<&T> {
        self.rows.get(&id)
    }

    /// Like [`get`](Self::get) but turns absence into `NotFound`
    pub fn require(&self, id: u64) -> Result<&T> {
        self.get(id).ok_or_else(|| StoreError::not_found(T::KIND, id))
    }

    pub fn contains(&self, id: u64) -> bool {
        self.rows.contains_key(&id)
    }

    /// Owned copy of every row, in id order.
    pub fn snapshot(&self) -> Vec<T> {
        self.rows.values().cloned().collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

impl<T: Entity> Default for EntityTable<T> {
    fn default() -> Self {
        Self::new()
    }
}
