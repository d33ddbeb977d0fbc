//! Task store: the single authority for durable task state.
//!
//! Every operation follows the same discipline: load the full collection from the
//! backing slot, change it in memory, and write the full collection back. Storage
//! trouble never reaches the caller. A slot that is missing, unreadable or malformed
//! reads as an empty collection, and a failed write is logged and dropped.

use chrono::Utc;
use tracing::{debug, error, warn};

use crate::id::{IdGenerator, TimestampIds};
use crate::storage::{KeyValueStore, StorageError};
use crate::task::{Completion, Task, TaskDraft, TaskPatch};

/// Slot holding the serialized task collection.
pub const TASKS_KEY: &str = "tasks";

const MAX_ID_ATTEMPTS: usize = 8;

/// Task collection persisted in a key-value slot.
pub struct TaskStore<S: KeyValueStore> {
    backend: S,
    ids: Box<dyn IdGenerator>,
}

impl<S: KeyValueStore> TaskStore<S> {
    /// Create a store over `backend` with the default timestamp id scheme.
    pub fn new(backend: S) -> Self {
        Self::with_ids(backend, Box::new(TimestampIds::new()))
    }

    pub fn with_ids(backend: S, ids: Box<dyn IdGenerator>) -> Self {
        TaskStore { backend, ids }
    }

    pub fn backend(&self) -> &S {
        &self.backend
    }

    /// Load the persisted collection, or an empty one if the slot is absent or bad.
    pub fn load_all(&self) -> Vec<Task> {
        match self.try_load() {
            Ok(tasks) => tasks,
            Err(e) => {
                warn!("Error loading tasks, starting fresh: {e}");
                Vec::new()
            }
        }
    }

    fn try_load(&self) -> Result<Vec<Task>, StorageError> {
        match self.backend.get(TASKS_KEY)? {
            None => Ok(Vec::new()),
            Some(raw) => Ok(serde_json::from_str(&raw)?),
        }
    }

    /// Overwrite the persisted collection. Failures are logged, not returned.
    pub fn save_all(&mut self, tasks: &[Task]) {
        if let Err(e) = self.try_save(tasks) {
            error!("Error saving tasks: {e}");
        }
    }

    fn try_save(&mut self, tasks: &[Task]) -> Result<(), StorageError> {
        let data = serde_json::to_string_pretty(tasks)?;
        self.backend.set(TASKS_KEY, &data)?;
        debug!(count = tasks.len(), "saved tasks");
        Ok(())
    }

    /// Get a task by ID.
    pub fn get(&self, id: &str) -> Option<Task> {
        self.load_all().into_iter().find(|t| t.id == id)
    }

    fn fresh_id(&mut self, tasks: &[Task]) -> String {
        let mut id = self.ids.new_id();
        for _ in 1..MAX_ID_ATTEMPTS {
            if !tasks.iter().any(|t| t.id == id) {
                break;
            }
            warn!(%id, "generated id already in use, drawing another");
            id = self.ids.new_id();
        }
        id
    }

    /// Append a new task built from `draft` and persist the collection.
    pub fn add(&mut self, draft: TaskDraft) -> Task {
        let mut tasks = self.load_all();
        let task = Task {
            id: self.fresh_id(&tasks),
            description: draft.description,
            priority: draft.priority,
            category: draft.category,
            due_date: draft.due_date,
            created_at: Utc::now(),
            completion: draft.completion,
        };
        tasks.push(task.clone());
        self.save_all(&tasks);
        debug!(id = %task.id, "added task");
        task
    }

    /// Merge `patch` over the task with `id`. Returns `None` without writing if
    /// no such task exists.
    pub fn update(&mut self, id: &str, patch: TaskPatch) -> Option<Task> {
        let mut tasks = self.load_all();
        let task = tasks.iter_mut().find(|t| t.id == id)?;
        task.apply(patch);
        let updated = task.clone();
        self.save_all(&tasks);
        Some(updated)
    }

    /// Remove the task with `id`. Persists only when something was removed.
    pub fn delete(&mut self, id: &str) -> bool {
        let mut tasks = self.load_all();
        let before = tasks.len();
        tasks.retain(|t| t.id != id);
        if tasks.len() == before {
            return false;
        }
        self.save_all(&tasks);
        true
    }

    pub fn complete(&mut self, id: &str) -> Option<Task> {
        self.update(
            id,
            TaskPatch {
                completion: Some(Completion::Completed { at: Utc::now() }),
                ..Default::default()
            },
        )
    }

    pub fn uncomplete(&mut self, id: &str) -> Option<Task> {
        self.update(
            id,
            TaskPatch {
                completion: Some(Completion::Pending),
                ..Default::default()
            },
        )
    }

    /// Flip completion the way a checkbox does.
    pub fn toggle(&mut self, id: &str) -> Option<Task> {
        let task = self.get(id)?;
        if task.is_pending() {
            self.complete(id)
        } else {
            self.uncomplete(id)
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::fields::*;
    use crate::storage::MemoryStore;

    /// Deterministic ids for tests: `t1`, `t2`, ...
    pub(crate) struct SequentialIds(pub u32);

    impl IdGenerator for SequentialIds {
        fn new_id(&mut self) -> String {
            self.0 += 1;
            format!("t{}", self.0)
        }
    }

    pub(crate) fn memory_store() -> TaskStore<MemoryStore> {
        TaskStore::with_ids(MemoryStore::new(), Box::new(SequentialIds(0)))
    }

    fn ids(tasks: &[Task]) -> Vec<String> {
        tasks.iter().map(|t| t.id.clone()).collect()
    }

    #[test]
    fn test_empty_slot_loads_empty() {
        let store = memory_store();
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_malformed_slot_loads_empty() {
        let store = TaskStore::new(MemoryStore::with_slot(TASKS_KEY, "{not json"));
        assert!(store.load_all().is_empty());

        let store = TaskStore::new(MemoryStore::with_slot(TASKS_KEY, r#"[{"id":"x"}]"#));
        assert!(store.load_all().is_empty());
    }

    #[test]
    fn test_add_appends_and_persists() {
        let mut store = memory_store();
        let a = store.add(TaskDraft::new("first"));
        let b = store.add(TaskDraft::new("second").priority(Priority::High));
        assert_ne!(a.id, b.id);
        assert!(a.created_at <= b.created_at);

        let loaded = store.load_all();
        assert_eq!(ids(&loaded), vec![a.id.clone(), b.id.clone()]);
        assert_eq!(loaded[1], b);
        assert!(store.backend().raw(TASKS_KEY).unwrap().contains("\"second\""));
    }

    #[test]
    fn test_add_redraws_colliding_id() {
        struct Repeating(Vec<&'static str>);
        impl IdGenerator for Repeating {
            fn new_id(&mut self) -> String {
                self.0.remove(0).to_string()
            }
        }
        let mut store = TaskStore::with_ids(MemoryStore::new(), Box::new(Repeating(vec!["a", "a", "b"])));
        store.add(TaskDraft::new("one"));
        let second = store.add(TaskDraft::new("two"));
        assert_eq!(second.id, "b");
    }

    #[test]
    fn test_update_merges_fields() {
        let mut store = memory_store();
        let t = store.add(TaskDraft::new("write report").category(Category::Work));
        let updated = store
            .update(
                &t.id,
                TaskPatch {
                    description: Some("write final report".into()),
                    ..Default::default()
                },
            )
            .unwrap();
        assert_eq!(updated.description, "write final report");
        assert_eq!(updated.category, Category::Work);
        assert_eq!(updated.created_at, t.created_at);
        assert_eq!(store.load_all(), vec![updated]);
    }

    #[test]
    fn test_update_missing_id_does_not_write() {
        let mut store = memory_store();
        store.add(TaskDraft::new("keep me"));
        let before = store.backend().raw(TASKS_KEY).unwrap().to_string();
        let result = store.update(
            "nope",
            TaskPatch {
                priority: Some(Priority::Low),
                ..Default::default()
            },
        );
        assert!(result.is_none());
        assert_eq!(store.backend().raw(TASKS_KEY).unwrap(), before);
    }

    #[test]
    fn test_update_on_empty_store_never_creates_slot() {
        let mut store = memory_store();
        assert!(store.update("t1", TaskPatch::default()).is_none());
        assert!(store.backend().raw(TASKS_KEY).is_none());
    }

    #[test]
    fn test_delete() {
        let mut store = memory_store();
        let a = store.add(TaskDraft::new("a"));
        let b = store.add(TaskDraft::new("b"));
        assert!(store.delete(&a.id));
        assert_eq!(ids(&store.load_all()), vec![b.id.clone()]);
        assert!(!store.delete(&a.id));
        assert_eq!(store.load_all().len(), 1);
    }

    #[test]
    fn test_complete_then_uncomplete_restores_task() {
        let mut store = memory_store();
        let original = store.add(
            TaskDraft::new("dentist")
                .priority(Priority::Low)
                .category(Category::Health),
        );
        let done = store.complete(&original.id).unwrap();
        assert_eq!(done.status(), Status::Completed);
        assert!(done.completed_at().is_some());

        let reverted = store.uncomplete(&original.id).unwrap();
        assert_eq!(reverted, original);
        assert_eq!(reverted.completed_at(), None);
    }

    #[test]
    fn test_complete_missing_id() {
        let mut store = memory_store();
        assert!(store.complete("ghost").is_none());
        assert!(store.uncomplete("ghost").is_none());
        assert!(store.toggle("ghost").is_none());
    }

    #[test]
    fn test_toggle_flips_status() {
        let mut store = memory_store();
        let t = store.add(TaskDraft::new("flip"));
        assert_eq!(store.toggle(&t.id).unwrap().status(), Status::Completed);
        assert_eq!(store.toggle(&t.id).unwrap().status(), Status::Pending);
    }

    #[test]
    fn test_sequence_of_operations_matches_model() {
        let mut store = memory_store();
        let mut model: Vec<Task> = Vec::new();

        for n in 0..5 {
            let t = store.add(TaskDraft::new(format!("task {n}")));
            model.push(t);
            assert_eq!(store.load_all(), model);
        }

        let target = model[2].id.clone();
        let updated = store
            .update(
                &target,
                TaskPatch {
                    priority: Some(Priority::High),
                    ..Default::default()
                },
            )
            .unwrap();
        model[2] = updated;
        assert_eq!(store.load_all(), model);

        let gone = model.remove(0);
        assert!(store.delete(&gone.id));
        assert_eq!(store.load_all(), model);

        let last = model[3].id.clone();
        model[3] = store.complete(&last).unwrap();
        assert_eq!(store.load_all(), model);
    }

    #[test]
    fn test_store_is_permissive() {
        let mut store = memory_store();
        let long = "x".repeat(500);
        let t = store.add(TaskDraft::new(""));
        store.update(
            &t.id,
            TaskPatch {
                description: Some(long.clone()),
                ..Default::default()
            },
        );
        assert_eq!(store.load_all()[0].description, long);
    }

    #[test]
    fn test_failed_save_is_contained() {
        let mut store = TaskStore::with_ids(MemoryStore::read_only(), Box::new(SequentialIds(0)));
        let t = store.add(TaskDraft::new("lost"));
        assert_eq!(t.description, "lost");
        assert!(store.load_all().is_empty());
    }
}
