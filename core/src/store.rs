//! The item store collaborator and its in-memory implementation.
//!
//! # Design
//! Writes are two-step: `add`, `update` and `remove` only stage a change,
//! and `save` commits every staged change at once. Reads always see the
//! committed state. `save` validates the whole batch before applying any
//! of it, so a failed commit leaves the committed rows untouched.

use std::collections::BTreeMap;

use tracing::debug;

use crate::error::StoreError;
use crate::types::TodoItem;

/// CRUD access to stored `TodoItem` records with an explicit commit step.
pub trait ItemStore {
    /// Assigns a fresh id to `item` and stages its insertion.
    fn add(&mut self, item: TodoItem) -> Result<TodoItem, StoreError>;

    /// Committed items in ascending id order.
    fn all(&self) -> Result<Vec<TodoItem>, StoreError>;

    fn find_by_id(&self, id: i64) -> Result<Option<TodoItem>, StoreError>;

    /// Stages an overwrite of the stored record with `item.id`.
    fn update(&mut self, item: &TodoItem) -> Result<(), StoreError>;

    /// Stages removal of the stored record with `item.id`.
    fn remove(&mut self, item: &TodoItem) -> Result<(), StoreError>;

    /// Commits staged changes and returns how many were applied.
    fn save(&mut self) -> Result<usize, StoreError>;

    /// Drops every staged change without applying it.
    fn discard(&mut self);

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.all()?.len())
    }
}

#[derive(Debug, Clone)]
enum Change {
    Insert(TodoItem),
    Update(TodoItem),
    Remove(i64),
}

/// Process-local `ItemStore`. Ids start at 1 and are never reused.
#[derive(Debug)]
pub struct MemoryItemStore {
    items: BTreeMap<i64, TodoItem>,
    pending: Vec<Change>,
    next_id: i64,
}

impl Default for MemoryItemStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryItemStore {
    pub fn new() -> Self {
        Self {
            items: BTreeMap::new(),
            pending: Vec::new(),
            next_id: 1,
        }
    }

    /// Number of staged changes not yet committed.
    pub fn pending_changes(&self) -> usize {
        self.pending.len()
    }

    // Replays the batch against the set of ids it would see at commit time.
    fn check_pending(&self) -> Result<(), StoreError> {
        let mut live: Vec<i64> = self.items.keys().copied().collect();
        for change in &self.pending {
            match change {
                Change::Insert(item) => live.push(item.id),
                Change::Update(item) => {
                    if !live.contains(&item.id) {
                        return Err(StoreError::NotTracked(item.id));
                    }
                }
                Change::Remove(id) => match live.iter().position(|live_id| live_id == id) {
                    Some(pos) => {
                        live.swap_remove(pos);
                    }
                    None => return Err(StoreError::NotTracked(*id)),
                },
            }
        }
        Ok(())
    }
}

impl ItemStore for MemoryItemStore {
    fn add(&mut self, mut item: TodoItem) -> Result<TodoItem, StoreError> {
        item.id = self.next_id;
        self.next_id += 1;
        debug!(id = item.id, "staged insert");
        self.pending.push(Change::Insert(item.clone()));
        Ok(item)
    }

    fn all(&self) -> Result<Vec<TodoItem>, StoreError> {
        Ok(self.items.values().cloned().collect())
    }

    fn find_by_id(&self, id: i64) -> Result<Option<TodoItem>, StoreError> {
        Ok(self.items.get(&id).cloned())
    }

    fn update(&mut self, item: &TodoItem) -> Result<(), StoreError> {
        debug!(id = item.id, "staged update");
        self.pending.push(Change::Update(item.clone()));
        Ok(())
    }

    fn remove(&mut self, item: &TodoItem) -> Result<(), StoreError> {
        debug!(id = item.id, "staged remove");
        self.pending.push(Change::Remove(item.id));
        Ok(())
    }

    fn save(&mut self) -> Result<usize, StoreError> {
        if let Err(err) = self.check_pending() {
            self.discard();
            return Err(err);
        }

        let applied = self.pending.len();
        for change in self.pending.drain(..) {
            match change {
                Change::Insert(item) | Change::Update(item) => {
                    self.items.insert(item.id, item);
                }
                Change::Remove(id) => {
                    self.items.remove(&id);
                }
            }
        }
        debug!(applied, "committed changes");
        Ok(applied)
    }

    fn discard(&mut self) {
        debug!(dropped = self.pending.len(), "discarded staged changes");
        self.pending.clear();
    }

    fn count(&self) -> Result<usize, StoreError> {
        Ok(self.items.len())
    }
}
