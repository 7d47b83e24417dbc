//! The five todo operations over an injected `ItemStore`.
//!
//! # Design
//! `TodoService` holds no state of its own besides the store. Every
//! mutating operation stages its change and commits it right away, so a
//! call that returns `Ok` has committed its effect. Input checks happen
//! before the store is touched. When `save` fails the staged batch is
//! discarded, so a failed call never leaks into a later commit.

use tracing::{debug, info};

use crate::error::TodoError;
use crate::store::ItemStore;
use crate::types::TodoItem;

/// Name of the item added when the service starts over an empty store.
pub const DEFAULT_SEED_NAME: &str = "Filipe";

#[derive(Debug)]
pub struct TodoService<S> {
    store: S,
}

impl<S: ItemStore> TodoService<S> {
    /// Wraps `store`, seeding it with one default item if it is empty.
    pub fn new(store: S) -> Result<Self, TodoError> {
        Self::with_seed_name(store, DEFAULT_SEED_NAME)
    }

    pub fn with_seed_name(mut store: S, seed_name: &str) -> Result<Self, TodoError> {
        if store.count()? == 0 {
            let seed = store.add(TodoItem::new(seed_name))?;
            commit(&mut store)?;
            info!(id = seed.id, name = %seed.name, "seeded empty store");
        }
        Ok(Self { store })
    }

    pub fn list_all(&self) -> Result<Vec<TodoItem>, TodoError> {
        Ok(self.store.all()?)
    }

    pub fn get_by_id(&self, id: i64) -> Result<TodoItem, TodoError> {
        self.store.find_by_id(id)?.ok_or(TodoError::NotFound(id))
    }

    /// Stores `item` under a freshly assigned id. Any id the caller set is
    /// ignored.
    pub fn create(&mut self, item: Option<TodoItem>) -> Result<TodoItem, TodoError> {
        let item = item.ok_or(TodoError::BadRequest)?;
        let created = self.store.add(item)?;
        commit(&mut self.store)?;
        info!(id = created.id, "created todo item");
        Ok(created)
    }

    /// Overwrites `name` and `is_complete` of the item with `id`.
    ///
    /// # Errors
    /// - `BadRequest` when `item` is absent or `item.id != id`.
    /// - `NotFound` when no item has `id`.
    pub fn update(&mut self, id: i64, item: Option<TodoItem>) -> Result<(), TodoError> {
        let item = match item {
            Some(item) if item.id == id => item,
            _ => return Err(TodoError::BadRequest),
        };

        let mut existing = self.get_by_id(id)?;
        existing.name = item.name;
        existing.is_complete = item.is_complete;

        self.store.update(&existing)?;
        commit(&mut self.store)?;
        debug!(id, "updated todo item");
        Ok(())
    }

    pub fn delete(&mut self, id: i64) -> Result<(), TodoError> {
        let existing = self.get_by_id(id)?;
        self.store.remove(&existing)?;
        commit(&mut self.store)?;
        info!(id, "deleted todo item");
        Ok(())
    }

    #[cfg(test)]
    fn store(&self) -> &S {
        &self.store
    }

    #[cfg(test)]
    fn into_store(self) -> S {
        self.store
    }
}

fn commit<S: ItemStore>(store: &mut S) -> Result<usize, TodoError> {
    store.save().map_err(|err| {
        store.discard();
        TodoError::from(err)
    })
}
