//! Task form handling for the terminal user interface.
//!
//! This module provides the `TaskForm` structure used to create and edit tasks
//! in the TUI, including field ordering and boundary validation on submit.

use chrono::NaiveDate;

use crate::{
    fields::{Category, Priority, ALL_CATEGORIES, ALL_PRIORITIES},
    format::parse_due_input,
    task::{Task, TaskDraft, TaskPatch},
    tui::{input::InputField, utils::step_index},
    validate::{validate_description, validate_due_date, ValidationError},
};

/// Field order in the form.
pub const DESCRIPTION_ORDER: usize = 0;
pub const PRIORITY_ORDER: usize = 1;
pub const CATEGORY_ORDER: usize = 2;
pub const DUE_ORDER: usize = 3;
const FIELD_COUNT: usize = 4;

/// Task form for adding and editing.
pub struct TaskForm {
    pub description: InputField,
    pub due: InputField,
    pub priority: usize,
    pub category: usize,
    pub current_field: usize,
    pub error: Option<String>,
}

impl Default for TaskForm {
    fn default() -> Self {
        Self::new()
    }
}

impl TaskForm {
    /// Blank form: medium priority, category "other", no due date.
    pub fn new() -> Self {
        Self {
            description: InputField::new(),
            due: InputField::new(),
            priority: ALL_PRIORITIES.iter().position(|&p| p == Priority::Medium).unwrap_or(0),
            category: ALL_CATEGORIES.iter().position(|&c| c == Category::Other).unwrap_or(0),
            current_field: DESCRIPTION_ORDER,
            error: None,
        }
    }

    /// Create a task form populated from an existing task.
    pub fn from_task(task: &Task) -> Self {
        let mut form = Self::new();
        form.description = InputField::with_value(&task.description);
        form.due = InputField::with_value(
            &task.due_date.map(|d| d.to_string()).unwrap_or_default());
        form.priority = ALL_PRIORITIES.iter().position(|&p| p == task.priority).unwrap_or(form.priority);
        form.category = ALL_CATEGORIES.iter().position(|&c| c == task.category).unwrap_or(form.category);
        form
    }

    pub fn selected_priority(&self) -> Priority {
        ALL_PRIORITIES[self.priority]
    }

    pub fn selected_category(&self) -> Category {
        ALL_CATEGORIES[self.category]
    }

    pub fn next_field(&mut self) {
        self.current_field = step_index(self.current_field, FIELD_COUNT, true);
    }

    pub fn prev_field(&mut self) {
        self.current_field = step_index(self.current_field, FIELD_COUNT, false);
    }

    fn active_input(&mut self) -> Option<&mut InputField> {
        match self.current_field {
            DESCRIPTION_ORDER => Some(&mut self.description),
            DUE_ORDER => Some(&mut self.due),
            _ => None,
        }
    }

    /// Handle character input for the currently active field.
    pub fn handle_char(&mut self, c: char) {
        if let Some(field) = self.active_input() {
            field.handle_char(c);
        }
    }

    pub fn handle_backspace(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_backspace();
        }
    }

    pub fn handle_delete(&mut self) {
        if let Some(field) = self.active_input() {
            field.handle_delete();
        }
    }

    /// Handle left/right arrow keys for cursor movement or selector changes.
    pub fn handle_left_right(&mut self, right: bool) {
        match self.current_field {
            PRIORITY_ORDER => self.priority = step_index(self.priority, ALL_PRIORITIES.len(), right),
            CATEGORY_ORDER => self.category = step_index(self.category, ALL_CATEGORIES.len(), right),
            _ => {
                if let Some(field) = self.active_input() {
                    if right {
                        field.move_cursor_right();
                    } else {
                        field.move_cursor_left();
                    }
                }
            }
        }
    }

    fn checked_fields(&self, today: NaiveDate) -> Result<(String, Option<NaiveDate>), ValidationError> {
        let description = validate_description(&self.description.value)?;
        let raw_due = self.due.value.trim();
        let due = if raw_due.is_empty() {
            None
        } else {
            let parsed = parse_due_input(raw_due, today)
                .ok_or_else(|| ValidationError::BadDueDate(raw_due.to_string()))?;
            Some(validate_due_date(parsed, today)?)
        };
        Ok((description, due))
    }

    /// Validate and build a draft for a new pending task.
    pub fn to_draft(&self, today: NaiveDate) -> Result<TaskDraft, ValidationError> {
        let (description, due) = self.checked_fields(today)?;
        let mut draft = TaskDraft::new(description)
            .priority(self.selected_priority())
            .category(self.selected_category());
        draft.due_date = due;
        Ok(draft)
    }

    /// Validate and build a patch replacing every editable field.
    pub fn to_patch(&self, today: NaiveDate) -> Result<TaskPatch, ValidationError> {
        let (description, due) = self.checked_fields(today)?;
        Ok(TaskPatch {
            description: Some(description),
            priority: Some(self.selected_priority()),
            category: Some(self.selected_category()),
            due_date: Some(due),
            completion: None,
        })
    }
}
