//! Sample data for a first run.

use chrono::{Duration, NaiveDate, Utc};
use tracing::info;

use crate::db::TaskStore;
use crate::fields::*;
use crate::storage::KeyValueStore;
use crate::task::TaskDraft;

/// The sample set, relative to `today`.
pub fn sample_drafts(today: NaiveDate) -> Vec<TaskDraft> {
    vec![
        TaskDraft::new("Complete project documentation")
            .priority(Priority::High)
            .category(Category::Work)
            .due(today + Duration::days(2)),
        TaskDraft::new("Buy groceries")
            .priority(Priority::Medium)
            .category(Category::Shopping),
        TaskDraft::new("Review code changes")
            .priority(Priority::Medium)
            .category(Category::Work)
            .completed_at(Utc::now()),
        TaskDraft::new("Schedule dentist appointment")
            .priority(Priority::Low)
            .category(Category::Health),
    ]
}

/// Insert the sample set through the normal `add` path if the store is empty.
/// Returns the number of tasks inserted.
pub fn seed_if_empty<S: KeyValueStore>(store: &mut TaskStore<S>, today: NaiveDate) -> usize {
    if !store.load_all().is_empty() {
        return 0;
    }
    let drafts = sample_drafts(today);
    let count = drafts.len();
    for draft in drafts {
        store.add(draft);
    }
    info!(count, "seeded sample tasks");
    count
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::memory_store;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 7, 1).unwrap()
    }

    #[test]
    fn test_seeds_empty_store() {
        let mut store = memory_store();
        assert_eq!(seed_if_empty(&mut store, today()), 4);
        let tasks = store.load_all();
        assert_eq!(tasks.len(), 4);
        assert_eq!(tasks[0].description, "Complete project documentation");
        assert_eq!(tasks[0].due_date, NaiveDate::from_ymd_opt(2024, 7, 3));
        assert_eq!(tasks[2].status(), Status::Completed);
        assert!(tasks[2].completed_at().is_some());
        assert_eq!(tasks[3].priority, Priority::Low);
        assert!(tasks.iter().all(|t| !t.id.is_empty()));
    }

    #[test]
    fn test_second_run_is_noop() {
        let mut store = memory_store();
        seed_if_empty(&mut store, today());
        assert_eq!(seed_if_empty(&mut store, today()), 0);
        assert_eq!(store.load_all().len(), 4);
    }

    #[test]
    fn test_existing_task_blocks_seeding() {
        let mut store = memory_store();
        store.add(TaskDraft::new("mine"));
        assert_eq!(seed_if_empty(&mut store, today()), 0);
        assert_eq!(store.load_all().len(), 1);
    }
}
