//! Domain core for the todo item service.
//!
//! # Overview
//! Holds the `TodoItem` entity, the `ItemStore` collaborator trait with an
//! in-memory implementation, and `TodoService`, which maps the five CRUD
//! operations onto the store. Nothing here knows about HTTP; the server
//! crate translates `TodoError` into status codes.
//!
//! # Design
//! - The store is injected into `TodoService::new` and owned by it.
//! - Persistence is explicit: every mutation is followed by `save`.
//! - All operations are synchronous; callers that share a service across
//!   tasks wrap it in a lock.

pub mod error;
pub mod service;
pub mod store;
pub mod types;

pub use error::{StoreError, TodoError};
pub use service::{TodoService, DEFAULT_SEED_NAME};
pub use store::{ItemStore, MemoryItemStore};
pub use types::TodoItem;
