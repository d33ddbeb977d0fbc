//! Filtering and display ordering of tasks.
//!
//! The display order is a fixed policy that surfaces outstanding, urgent,
//! soon-due work first:
//!
//! 1. pending before completed
//! 2. priority high, medium, low
//! 3. dated tasks before undated ones, earlier dates first
//! 4. newest first

use std::cmp::Ordering;

use crate::fields::*;
use crate::task::Task;

/// Query held by the presentation layer. `None` means no restriction.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskFilters {
    pub status: Option<Status>,
    pub priority: Option<Priority>,
    pub category: Option<Category>,
    pub search_query: String,
}

impl TaskFilters {
    pub fn is_empty(&self) -> bool {
        *self == TaskFilters::default()
    }

    pub fn matches(&self, task: &Task) -> bool {
        if let Some(s) = self.status {
            if task.status() != s {
                return false;
            }
        }
        if let Some(p) = self.priority {
            if task.priority != p {
                return false;
            }
        }
        if let Some(c) = self.category {
            if task.category != c {
                return false;
            }
        }
        if !self.search_query.is_empty() {
            let query = self.search_query.to_lowercase();
            if !task.description.to_lowercase().contains(&query) {
                return false;
            }
        }
        true
    }
}

/// Total display order over tasks.
pub fn display_order(a: &Task, b: &Task) -> Ordering {
    let status_rank = |t: &Task| match t.status() {
        Status::Pending => 0,
        Status::Completed => 1,
    };
    status_rank(a)
        .cmp(&status_rank(b))
        .then(a.priority.rank().cmp(&b.priority.rank()))
        .then_with(|| match (a.due_date, b.due_date) {
            (Some(x), Some(y)) => x.cmp(&y),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        })
        .then(b.created_at.cmp(&a.created_at))
}

/// Retain tasks matching `filters` and sort them for display.
pub fn apply_filters_and_sort(tasks: &[Task], filters: &TaskFilters) -> Vec<Task> {
    let mut out: Vec<Task> = tasks.iter().filter(|t| filters.matches(t)).cloned().collect();
    out.sort_by(display_order);
    out
}
