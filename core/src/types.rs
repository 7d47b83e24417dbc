//! Domain types for the todo service.
//!
//! # Design
//! `TodoItem` is both the stored record and the wire representation. Every
//! field has a serde default so a request body may omit any of them: a
//! missing `id` reads as `0`, which never matches a stored item because the
//! store hands out ids starting at 1.

use serde::{Deserialize, Serialize};

/// A single todo item.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct TodoItem {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub is_complete: bool,
}

impl TodoItem {
    /// An item that has not been assigned an id yet.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: 0,
            name: name.into(),
            is_complete: false,
        }
    }
}
