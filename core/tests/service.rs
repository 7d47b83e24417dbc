//! Behavioral properties of `TodoService` over the in-memory store, plus a
//! store stub whose commits fail to check error propagation.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use todo_core::{
    ItemStore, MemoryItemStore, StoreError, TodoError, TodoItem, TodoService, DEFAULT_SEED_NAME,
};

fn seeded() -> TodoService<MemoryItemStore> {
    TodoService::new(MemoryItemStore::new()).unwrap()
}

fn size(service: &TodoService<MemoryItemStore>) -> usize {
    service.list_all().unwrap().len()
}

#[test]
fn fresh_service_lists_exactly_the_seed_item() {
    let service = seeded();
    let items = service.list_all().unwrap();
    assert_eq!(
        items,
        vec![TodoItem {
            id: 1,
            name: DEFAULT_SEED_NAME.to_string(),
            is_complete: false,
        }]
    );
}

#[test]
fn created_items_read_back_with_assigned_id() {
    let mut service = seeded();
    let inputs = [
        TodoItem::new("Buy milk"),
        TodoItem {
            is_complete: true,
            ..TodoItem::new("Walk dog")
        },
        TodoItem::new(""),
    ];

    for input in inputs {
        let created = service.create(Some(input.clone())).unwrap();
        let fetched = service.get_by_id(created.id).unwrap();
        assert_eq!(fetched, TodoItem { id: created.id, ..input });
    }
    assert_eq!(size(&service), 4);
}

#[test]
fn create_without_item_is_bad_request() {
    let mut service = seeded();
    assert_eq!(service.create(None), Err(TodoError::BadRequest));
    assert_eq!(size(&service), 1);
}

#[test]
fn unknown_id_is_not_found_and_changes_nothing() {
    let mut service = seeded();
    let before = service.list_all().unwrap();

    assert_eq!(service.get_by_id(42), Err(TodoError::NotFound(42)));
    assert_eq!(
        service.update(42, Some(TodoItem { id: 42, ..TodoItem::new("x") })),
        Err(TodoError::NotFound(42))
    );
    assert_eq!(service.delete(42), Err(TodoError::NotFound(42)));

    assert_eq!(service.list_all().unwrap(), before);
}

#[test]
fn update_with_mismatched_id_is_bad_request() {
    let mut service = seeded();
    let before = service.list_all().unwrap();

    let result = service.update(1, Some(TodoItem { id: 2, ..TodoItem::new("other") }));
    assert_eq!(result, Err(TodoError::BadRequest));

    // A body without an id reads as id 0.
    let result = service.update(1, Some(TodoItem::new("no id")));
    assert_eq!(result, Err(TodoError::BadRequest));

    assert_eq!(service.list_all().unwrap(), before);
}

#[test]
fn update_overwrites_name_and_completion_only() {
    let mut service = seeded();
    let created = service.create(Some(TodoItem::new("Draft"))).unwrap();

    let replacement = TodoItem {
        id: created.id,
        name: "Final".to_string(),
        is_complete: true,
    };
    service.update(created.id, Some(replacement.clone())).unwrap();

    assert_eq!(service.get_by_id(created.id).unwrap(), replacement);
    assert_eq!(service.get_by_id(1).unwrap().name, DEFAULT_SEED_NAME);
    assert_eq!(size(&service), 2);
}

#[test]
fn delete_removes_exactly_one_item() {
    let mut service = seeded();
    let created = service.create(Some(TodoItem::new("Temp"))).unwrap();
    assert_eq!(size(&service), 2);

    service.delete(created.id).unwrap();

    assert_eq!(size(&service), 1);
    assert_eq!(service.get_by_id(created.id), Err(TodoError::NotFound(created.id)));
    assert_eq!(service.delete(created.id), Err(TodoError::NotFound(created.id)));
}

#[test]
fn deleting_the_seed_does_not_reseed() {
    let mut service = seeded();
    service.delete(1).unwrap();
    assert!(service.list_all().unwrap().is_empty());

    let created = service.create(Some(TodoItem::new("next"))).unwrap();
    assert_eq!(created.id, 2);
}

#[test]
fn buy_milk_scenario() {
    let mut service = seeded();
    let created = service
        .create(Some(TodoItem::new("Buy milk")))
        .unwrap();
    assert_eq!(created.id, 2);

    let fetched = service.get_by_id(2).unwrap();
    assert_eq!(
        fetched,
        TodoItem {
            id: 2,
            name: "Buy milk".to_string(),
            is_complete: false,
        }
    );
}

// ---------------------------------------------------------------------------
// Store failures
// ---------------------------------------------------------------------------

/// Memory store whose `save` fails while the shared switch is on.
#[derive(Debug, Default)]
struct FlakyStore {
    inner: MemoryItemStore,
    fail_saves: Arc<AtomicBool>,
}

impl FlakyStore {
    fn with_switch(fail_saves: &Arc<AtomicBool>) -> Self {
        Self {
            inner: MemoryItemStore::new(),
            fail_saves: Arc::clone(fail_saves),
        }
    }
}

impl ItemStore for FlakyStore {
    fn add(&mut self, item: TodoItem) -> Result<TodoItem, StoreError> {
        self.inner.add(item)
    }

    fn all(&self) -> Result<Vec<TodoItem>, StoreError> {
        self.inner.all()
    }

    fn find_by_id(&self, id: i64) -> Result<Option<TodoItem>, StoreError> {
        self.inner.find_by_id(id)
    }

    fn update(&mut self, item: &TodoItem) -> Result<(), StoreError> {
        self.inner.update(item)
    }

    fn remove(&mut self, item: &TodoItem) -> Result<(), StoreError> {
        self.inner.remove(item)
    }

    // Leaves the staged batch in place on failure, like a backend that
    // cannot tell which changes reached storage.
    fn save(&mut self) -> Result<usize, StoreError> {
        if self.fail_saves.load(Ordering::SeqCst) {
            return Err(StoreError::Backend("disk full".to_string()));
        }
        self.inner.save()
    }

    fn discard(&mut self) {
        self.inner.discard()
    }
}

#[test]
fn store_failures_propagate_unchanged() {
    let fail_saves = Arc::new(AtomicBool::new(false));
    let mut service = TodoService::new(FlakyStore::with_switch(&fail_saves)).unwrap();
    fail_saves.store(true, Ordering::SeqCst);

    let err = service.create(Some(TodoItem::new("lost"))).unwrap_err();
    assert_eq!(err, TodoError::Store(StoreError::Backend("disk full".to_string())));

    let err = service.delete(1).unwrap_err();
    assert!(matches!(err, TodoError::Store(_)));
    assert_eq!(service.list_all().unwrap().len(), 1);
}

#[test]
fn failed_commit_does_not_leak_into_next_save() {
    let fail_saves = Arc::new(AtomicBool::new(false));
    let mut service = TodoService::new(FlakyStore::with_switch(&fail_saves)).unwrap();

    fail_saves.store(true, Ordering::SeqCst);
    assert!(service.create(Some(TodoItem::new("rejected"))).is_err());
    assert!(service.delete(1).is_err());

    fail_saves.store(false, Ordering::SeqCst);
    service
        .update(1, Some(TodoItem { id: 1, ..TodoItem::new("renamed") }))
        .unwrap();

    assert_eq!(
        service.list_all().unwrap(),
        vec![TodoItem {
            id: 1,
            name: "renamed".to_string(),
            is_complete: false,
        }]
    );
}

#[test]
fn seeding_failure_is_reported() {
    let store = FlakyStore {
        fail_saves: Arc::new(AtomicBool::new(true)),
        ..FlakyStore::default()
    };
    let err = TodoService::new(store).unwrap_err();
    assert!(matches!(err, TodoError::Store(StoreError::Backend(_))));
}
