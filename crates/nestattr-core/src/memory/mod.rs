//! In-memory association collaborator
//!
//! A reference implementation of the resolver traits over [`Record`]s. It
//! stands in for the persistence layer: rows live in a [`MemoryStore`] keyed by
//! association name and owner id, and `save()` on an association view applies
//! the reconciled state (inserts, updates, deferred destruction).
//!
//! Single-threaded by design, like the rest of the crate: views borrow the
//! store and the owner mutably for their whole lifetime.

mod has_many;
mod has_one;

pub use has_many::{HasMany, OnAddHook};
pub use has_one::HasOne;

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::model::Record;

/// Persisted child rows, grouped per association and owner
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    rows: BTreeMap<(String, String), Vec<Record>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh primary key
    pub fn allocate_id() -> String {
        Uuid::now_v7().to_string()
    }

    /// Give a transient owner an id; returns the owner's id either way
    pub fn persist_owner(&mut self, owner: &mut Record) -> String {
        owner.id.get_or_insert_with(Self::allocate_id).clone()
    }

    /// Insert existing rows for an owner, allocating ids for rows without one
    ///
    /// A row whose id is already stored replaces the stored row.
    pub fn seed(&mut self, association: &str, owner_id: &str, records: Vec<Record>) {
        let rows = self.rows_mut(association, owner_id);
        for mut record in records {
            record.id.get_or_insert_with(Self::allocate_id);
            record.marked_for_destruction = false;
            upsert(rows, record);
        }
    }

    /// Rows stored for an owner, in insertion order
    pub fn rows(&self, association: &str, owner_id: &str) -> &[Record] {
        self.rows
            .get(&(association.to_string(), owner_id.to_string()))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Total number of stored rows across every owner
    pub fn len(&self) -> usize {
        self.rows.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn rows_mut(&mut self, association: &str, owner_id: &str) -> &mut Vec<Record> {
        self.rows
            .entry((association.to_string(), owner_id.to_string()))
            .or_default()
    }
}

/// Replace the row with the same id, or append it
pub(crate) fn upsert(rows: &mut Vec<Record>, record: Record) {
    match rows.iter_mut().find(|row| row.id == record.id) {
        Some(row) => *row = record,
        None => rows.push(record),
    }
}

/// Counts reported by a save
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveSummary {
    pub inserted: usize,
    pub updated: usize,
    pub deleted: usize,
}
