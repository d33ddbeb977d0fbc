//! Task data structure and related functionality.
//!
//! This module defines the core `Task` struct that represents a single work item,
//! along with the draft and patch shapes the presentation layer hands to the store.
//! Completion state is a single tagged value so a completed task always carries its
//! completion time and a pending one never does.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::fields::*;

/// Whether a task is still open, and when it was finished if not.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Pending,
    Completed { at: DateTime<Utc> },
}

impl Completion {
    pub fn status(&self) -> Status {
        match self {
            Completion::Pending => Status::Pending,
            Completion::Completed { .. } => Status::Completed,
        }
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        match self {
            Completion::Pending => None,
            Completion::Completed { at } => Some(*at),
        }
    }
}

/// A single tracked item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "TaskRecord", into = "TaskRecord")]
pub struct Task {
    pub id: String,
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    pub due_date: Option<NaiveDate>,
    pub created_at: DateTime<Utc>,
    pub completion: Completion,
}

impl Task {
    pub fn status(&self) -> Status {
        self.completion.status()
    }

    pub fn completed_at(&self) -> Option<DateTime<Utc>> {
        self.completion.completed_at()
    }

    pub fn is_pending(&self) -> bool {
        self.status() == Status::Pending
    }

    /// Short form of the id used in tables: the random suffix.
    pub fn short_id(&self) -> &str {
        self.id.rsplit('_').next().unwrap_or(&self.id)
    }

    /// Shallow-merge the supplied fields over this task.
    pub fn apply(&mut self, patch: TaskPatch) {
        if let Some(d) = patch.description {
            self.description = d;
        }
        if let Some(p) = patch.priority {
            self.priority = p;
        }
        if let Some(c) = patch.category {
            self.category = c;
        }
        if let Some(due) = patch.due_date {
            self.due_date = due;
        }
        if let Some(c) = patch.completion {
            self.completion = c;
        }
    }
}

/// Persisted shape of a task: flat status plus optional completion timestamp.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TaskRecord {
    id: String,
    description: String,
    status: Status,
    priority: Priority,
    category: Category,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    due_date: Option<NaiveDate>,
    created_at: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    completed_at: Option<DateTime<Utc>>,
}

impl From<TaskRecord> for Task {
    fn from(r: TaskRecord) -> Self {
        let completion = match (r.status, r.completed_at) {
            (Status::Completed, Some(at)) => Completion::Completed { at },
            (Status::Completed, None) => {
                warn!(id = %r.id, "completed task has no completion time, using creation time");
                Completion::Completed { at: r.created_at }
            }
            (Status::Pending, _) => Completion::Pending,
        };
        Task {
            id: r.id,
            description: r.description,
            priority: r.priority,
            category: r.category,
            due_date: r.due_date,
            created_at: r.created_at,
            completion,
        }
    }
}

impl From<Task> for TaskRecord {
    fn from(t: Task) -> Self {
        TaskRecord {
            status: t.status(),
            completed_at: t.completed_at(),
            id: t.id,
            description: t.description,
            priority: t.priority,
            category: t.category,
            due_date: t.due_date,
            created_at: t.created_at,
        }
    }
}

/// Everything needed to create a task except the id and creation time.
#[derive(Debug, Clone, PartialEq)]
pub struct TaskDraft {
    pub description: String,
    pub priority: Priority,
    pub category: Category,
    pub due_date: Option<NaiveDate>,
    pub completion: Completion,
}

impl TaskDraft {
    pub fn new(description: impl Into<String>) -> Self {
        TaskDraft {
            description: description.into(),
            priority: Priority::Medium,
            category: Category::Other,
            due_date: None,
            completion: Completion::Pending,
        }
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = priority;
        self
    }

    pub fn category(mut self, category: Category) -> Self {
        self.category = category;
        self
    }

    pub fn due(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    pub fn completed_at(mut self, at: DateTime<Utc>) -> Self {
        self.completion = Completion::Completed { at };
        self
    }
}

/// Partial update. `None` keeps the existing value; `due_date: Some(None)` clears it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TaskPatch {
    pub description: Option<String>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub due_date: Option<Option<NaiveDate>>,
    pub completion: Option<Completion>,
}

impl TaskPatch {
    pub fn is_empty(&self) -> bool {
        *self == TaskPatch::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Task {
        Task {
            id: "task_1700000000000_abc123xyz".into(),
            description: "Buy groceries".into(),
            priority: Priority::Medium,
            category: Category::Shopping,
            due_date: None,
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            completion: Completion::Pending,
        }
    }

    #[test]
    fn test_pending_record_omits_optional_fields() {
        let json = serde_json::to_value(sample()).unwrap();
        assert_eq!(json["status"], "pending");
        assert_eq!(json["createdAt"], "2024-05-01T09:30:00Z");
        assert!(json.get("completedAt").is_none());
        assert!(json.get("dueDate").is_none());
    }

    #[test]
    fn test_completed_record_carries_timestamp() {
        let mut t = sample();
        let at = Utc.with_ymd_and_hms(2024, 5, 2, 8, 0, 0).unwrap();
        t.completion = Completion::Completed { at };
        t.due_date = NaiveDate::from_ymd_opt(2024, 5, 3);
        let json = serde_json::to_value(&t).unwrap();
        assert_eq!(json["status"], "completed");
        assert_eq!(json["dueDate"], "2024-05-03");
        let back: Task = serde_json::from_value(json).unwrap();
        assert_eq!(back, t);
    }

    #[test]
    fn test_completed_without_timestamp_falls_back_to_creation() {
        let raw = r#"{"id":"t1","description":"x","status":"completed","priority":"low",
            "category":"other","createdAt":"2024-05-01T00:00:00Z"}"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.completed_at(), Some(t.created_at));
    }

    #[test]
    fn test_pending_with_stray_timestamp_stays_pending() {
        let raw = r#"{"id":"t1","description":"x","status":"pending","priority":"low",
            "category":"other","createdAt":"2024-05-01T00:00:00Z",
            "completedAt":"2024-05-02T00:00:00Z"}"#;
        let t: Task = serde_json::from_str(raw).unwrap();
        assert_eq!(t.completion, Completion::Pending);
    }

    #[test]
    fn test_patch_is_shallow_merge() {
        let mut t = sample();
        t.due_date = NaiveDate::from_ymd_opt(2024, 6, 1);
        t.apply(TaskPatch {
            priority: Some(Priority::High),
            ..Default::default()
        });
        assert_eq!(t.priority, Priority::High);
        assert_eq!(t.description, "Buy groceries");
        assert!(t.due_date.is_some());

        t.apply(TaskPatch {
            due_date: Some(None),
            ..Default::default()
        });
        assert_eq!(t.due_date, None);
    }

    #[test]
    fn test_short_id() {
        assert_eq!(sample().short_id(), "abc123xyz");
    }
}
