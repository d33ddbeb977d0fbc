//! Summary counts over the task collection.

use chrono::{DateTime, Utc};
use serde::Serialize;

use crate::fields::*;
use crate::task::Task;

/// Derived counts; never stored.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStats {
    pub total: usize,
    pub completed: usize,
    pub pending: usize,
    /// Pending high-priority tasks only.
    pub high_priority: usize,
    pub overdue: usize,
}

/// Stats-level overdue rule: the due date, taken as UTC midnight, is earlier
/// than `now`. A task due today is therefore overdue for the whole of today.
pub fn is_past_due(task: &Task, now: DateTime<Utc>) -> bool {
    if !task.is_pending() {
        return false;
    }
    match task.due_date {
        Some(d) => d.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc() < now).unwrap_or(false),
        None => false,
    }
}

pub fn compute_stats(tasks: &[Task], now: DateTime<Utc>) -> TaskStats {
    let mut stats = TaskStats {
        total: tasks.len(),
        ..Default::default()
    };
    for t in tasks {
        match t.status() {
            Status::Completed => stats.completed += 1,
            Status::Pending => {
                stats.pending += 1;
                if t.priority == Priority::High {
                    stats.high_priority += 1;
                }
                if is_past_due(t, now) {
                    stats.overdue += 1;
                }
            }
        }
    }
    stats
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::task::Completion;
    use chrono::{NaiveDate, TimeZone};

    fn task(id: &str, priority: Priority, due: Option<NaiveDate>, done: bool) -> Task {
        let created = Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap();
        Task {
            id: id.into(),
            description: id.into(),
            priority,
            category: Category::Other,
            due_date: due,
            created_at: created,
            completion: if done {
                Completion::Completed { at: created }
            } else {
                Completion::Pending
            },
        }
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_empty_collection() {
        assert_eq!(compute_stats(&[], Utc::now()), TaskStats::default());
    }

    #[test]
    fn test_counts() {
        let now = Utc.with_ymd_and_hms(2024, 3, 10, 12, 0, 0).unwrap();
        let tasks = vec![
            task("a", Priority::High, None, false),
            task("b", Priority::High, None, true),
            task("c", Priority::Low, Some(date(2024, 3, 9)), false),
            task("d", Priority::Low, Some(date(2024, 3, 9)), true),
            task("e", Priority::Medium, Some(date(2024, 3, 11)), false),
        ];
        let stats = compute_stats(&tasks, now);
        assert_eq!(
            stats,
            TaskStats {
                total: 5,
                completed: 2,
                pending: 3,
                high_priority: 1,
                overdue: 1,
            }
        );
    }

    #[test]
    fn test_pending_and_completed_partition_total() {
        let now = Utc::now();
        for (n, m) in [(0, 0), (3, 0), (0, 4), (2, 5)] {
            let mut tasks = Vec::new();
            for i in 0..n {
                tasks.push(task(&format!("p{i}"), Priority::Medium, None, false));
            }
            for i in 0..m {
                tasks.push(task(&format!("c{i}"), Priority::Medium, None, true));
            }
            let stats = compute_stats(&tasks, now);
            assert_eq!((stats.pending, stats.completed, stats.total), (n, m, n + m));
        }
    }

    #[test]
    fn test_due_today_counts_once_day_has_started() {
        let due = date(2024, 3, 10);
        let t = task("t", Priority::Low, Some(due), false);
        let midnight = Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap();
        assert!(!is_past_due(&t, midnight));
        assert!(is_past_due(&t, midnight + chrono::Duration::seconds(1)));
    }
}
