//! Main application logic for the terminal user interface.
//!
//! This module contains the `App` struct which manages the TUI state,
//! handles user input, renders the interface, and coordinates between
//! the task list, the add/edit form and dialogs. Every mutation goes through
//! the task store and is followed by a full re-read.

use std::io;
use std::time::Duration;

use chrono::{Local, NaiveDate, Utc};
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState, Wrap},
    Frame, Terminal,
};

use crate::{
    db::TaskStore,
    fields::*,
    filter::{apply_filters_and_sort, TaskFilters},
    format::{format_category, format_due, format_priority, format_status, is_overdue, truncate},
    stats::{compute_stats, TaskStats},
    storage::KeyValueStore,
    task::Task,
    tui::{
        colors::{priority_color, DARK_GREEN, DARK_RED, GOLD},
        enums::{AppState, InputMode},
        task_form::{TaskForm, CATEGORY_ORDER, DESCRIPTION_ORDER, DUE_ORDER, PRIORITY_ORDER},
        utils::{centered_rect, cycle_filter},
    },
};

/// Main application state for the terminal user interface.
pub struct App<S: KeyValueStore> {
    state: AppState,
    store: TaskStore<S>,
    tasks: Vec<Task>,
    visible: Vec<Task>,
    stats: TaskStats,
    filters: TaskFilters,
    search_active: bool,
    task_list_state: TableState,
    task_form: TaskForm,
    editing: Option<String>,
    input_mode: InputMode,
    status_message: String,
    confirm_delete: Option<String>,
}

impl<S: KeyValueStore> App<S> {
    pub fn new(store: TaskStore<S>) -> Self {
        let mut app = App {
            state: AppState::TaskList,
            store,
            tasks: Vec::new(),
            visible: Vec::new(),
            stats: TaskStats::default(),
            filters: TaskFilters::default(),
            search_active: false,
            task_list_state: TableState::default(),
            task_form: TaskForm::new(),
            editing: None,
            input_mode: InputMode::None,
            status_message: String::new(),
            confirm_delete: None,
        };
        app.refresh_tasks();
        app
    }

    fn today() -> NaiveDate {
        Local::now().date_naive()
    }

    /// Reload the collection from the store and recompute the derived views.
    fn refresh_tasks(&mut self) {
        self.tasks = self.store.load_all();
        self.stats = compute_stats(&self.tasks, Utc::now());
        self.update_visible();
    }

    /// Re-apply filters, preserving the selected task when it is still shown.
    fn update_visible(&mut self) {
        let old_selected_id = self.selected_task().map(|t| t.id.clone());
        self.visible = apply_filters_and_sort(&self.tasks, &self.filters);

        let new_index = old_selected_id
            .and_then(|id| self.visible.iter().position(|t| t.id == id))
            .or_else(|| {
                let prev = self.task_list_state.selected().unwrap_or(0);
                if self.visible.is_empty() {
                    None
                } else {
                    Some(prev.min(self.visible.len() - 1))
                }
            });
        self.task_list_state.select(new_index);
    }

    fn selected_task(&self) -> Option<&Task> {
        self.task_list_state
            .selected()
            .and_then(|i| self.visible.get(i))
    }

    fn set_status_message(&mut self, msg: impl Into<String>) {
        self.status_message = msg.into();
    }

    fn clear_status_message(&mut self) {
        self.status_message.clear();
    }

    fn toggle_selected(&mut self) {
        let Some(id) = self.selected_task().map(|t| t.id.clone()) else {
            return;
        };
        match self.store.toggle(&id) {
            Some(t) if t.is_pending() => self.set_status_message("Task marked as pending"),
            Some(_) => self.set_status_message("Task completed!"),
            None => self.set_status_message("Task no longer exists"),
        }
        self.refresh_tasks();
    }

    fn open_add_form(&mut self) {
        self.task_form = TaskForm::new();
        self.editing = None;
        self.state = AppState::AddTask;
        self.input_mode = InputMode::Text;
    }

    fn open_edit_form(&mut self) {
        let Some(task) = self.selected_task().cloned() else {
            return;
        };
        if !task.is_pending() {
            self.set_status_message("Completed tasks cannot be edited");
            return;
        }
        self.task_form = TaskForm::from_task(&task);
        self.editing = Some(task.id);
        self.state = AppState::EditTask;
        self.input_mode = InputMode::Text;
    }

    fn close_form(&mut self) {
        self.state = AppState::TaskList;
        self.input_mode = InputMode::None;
        self.editing = None;
    }

    /// Validate the form and hand it to the store.
    fn submit_form(&mut self) {
        let today = Self::today();
        let outcome = match self.editing.clone() {
            Some(id) => self
                .task_form
                .to_patch(today)
                .map(|patch| self.store.update(&id, patch).is_some()),
            None => self
                .task_form
                .to_draft(today)
                .map(|draft| {
                    self.store.add(draft);
                    true
                }),
        };
        match outcome {
            Err(e) => {
                self.task_form.error = Some(e.to_string());
            }
            Ok(found) => {
                let msg = match (self.editing.is_some(), found) {
                    (true, true) => "Task updated successfully",
                    (true, false) => "Task no longer exists",
                    (false, _) => "Task created successfully",
                };
                self.close_form();
                self.set_status_message(msg);
                self.refresh_tasks();
            }
        }
    }

    fn delete_confirmed(&mut self) {
        if let Some(id) = self.confirm_delete.take() {
            if self.store.delete(&id) {
                self.set_status_message("Task deleted");
            } else {
                self.set_status_message("Task no longer exists");
            }
            self.refresh_tasks();
        }
    }

    fn handle_search_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => {
                self.search_active = false;
                self.input_mode = InputMode::None;
                self.filters.search_query.clear();
                self.update_visible();
            }
            KeyCode::Enter => {
                self.search_active = false;
                self.input_mode = InputMode::None;
                if self.filters.search_query.is_empty() {
                    self.set_status_message("Search cleared");
                } else {
                    self.set_status_message(format!(
                        "Search applied: '{}' ({} tasks)",
                        self.filters.search_query,
                        self.visible.len()
                    ));
                }
            }
            KeyCode::Backspace => {
                if self.filters.search_query.pop().is_some() {
                    self.update_visible();
                }
            }
            KeyCode::Char(c) => {
                self.filters.search_query.push(c);
                self.update_visible();
            }
            _ => {}
        }
    }

    /// Handle keyboard input on the task list. Returns true if the app should quit.
    fn handle_task_list_input(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if self.search_active {
            self.handle_search_input(key);
            return false;
        }

        match key {
            KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => return true,
            KeyCode::Char('q') => return true,
            KeyCode::Esc => {
                if !self.filters.search_query.is_empty() {
                    self.filters.search_query.clear();
                    self.update_visible();
                } else {
                    return true;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected > 0 {
                        self.task_list_state.select(Some(selected - 1));
                    }
                } else if !self.visible.is_empty() {
                    self.task_list_state.select(Some(0));
                }
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if let Some(selected) = self.task_list_state.selected() {
                    if selected + 1 < self.visible.len() {
                        self.task_list_state.select(Some(selected + 1));
                    }
                } else if !self.visible.is_empty() {
                    self.task_list_state.select(Some(0));
                }
            }
            KeyCode::Enter | KeyCode::Char(' ') => self.toggle_selected(),
            KeyCode::Char('a') => self.open_add_form(),
            KeyCode::Char('e') => self.open_edit_form(),
            KeyCode::Char('d') => {
                if let Some(task) = self.selected_task().cloned() {
                    let label = format!("Delete '{}'", truncate(&task.description, 40));
                    self.confirm_delete = Some(task.id);
                    self.set_status_message(label);
                    self.state = AppState::Confirm;
                }
            }
            KeyCode::Char('/') => {
                self.search_active = true;
                self.input_mode = InputMode::Text;
            }
            KeyCode::Char('s') => {
                self.filters.status = cycle_filter(&ALL_STATUSES, self.filters.status);
                self.update_visible();
            }
            KeyCode::Char('p') => {
                self.filters.priority = cycle_filter(&ALL_PRIORITIES, self.filters.priority);
                self.update_visible();
            }
            KeyCode::Char('c') => {
                self.filters.category = cycle_filter(&ALL_CATEGORIES, self.filters.category);
                self.update_visible();
            }
            KeyCode::Char('x') => {
                self.filters = TaskFilters::default();
                self.update_visible();
                self.set_status_message("Filters cleared");
            }
            KeyCode::Char('r') => {
                self.refresh_tasks();
                self.set_status_message("Refreshed");
            }
            KeyCode::Char('h') | KeyCode::F(1) => self.state = AppState::Help,
            _ => {}
        }
        false
    }

    fn handle_form_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Esc => self.close_form(),
            KeyCode::Tab | KeyCode::Down => self.task_form.next_field(),
            KeyCode::BackTab | KeyCode::Up => self.task_form.prev_field(),
            KeyCode::Left => self.task_form.handle_left_right(false),
            KeyCode::Right => self.task_form.handle_left_right(true),
            KeyCode::Backspace => self.task_form.handle_backspace(),
            KeyCode::Delete => self.task_form.handle_delete(),
            KeyCode::Enter => self.submit_form(),
            KeyCode::Char(c) => self.task_form.handle_char(c),
            _ => {}
        }
    }

    fn handle_confirm_input(&mut self, key: KeyCode) {
        match key {
            KeyCode::Char('y') | KeyCode::Char('Y') | KeyCode::Enter => {
                self.delete_confirmed();
                self.state = AppState::TaskList;
            }
            KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => {
                self.confirm_delete = None;
                self.clear_status_message();
                self.state = AppState::TaskList;
            }
            _ => {}
        }
    }

    /// Dispatch one key press. Returns true if the app should quit.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) -> bool {
        if self.state != AppState::Confirm {
            self.clear_status_message();
        }
        match self.state {
            AppState::TaskList => return self.handle_task_list_input(key, modifiers),
            AppState::AddTask | AppState::EditTask => self.handle_form_input(key),
            AppState::Help => self.state = AppState::TaskList,
            AppState::Confirm => self.handle_confirm_input(key),
        }
        false
    }

    fn handle_input(&mut self) -> io::Result<bool> {
        if event::poll(Duration::from_millis(50))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    return Ok(self.handle_key(key.code, key.modifiers));
                }
            }
        }
        Ok(false)
    }

    /// Render the row of summary cards.
    fn render_stats(&self, f: &mut Frame, area: Rect) {
        let cards = [
            ("Total Tasks", self.stats.total, Color::Cyan),
            ("Completed", self.stats.completed, Color::Green),
            ("Pending", self.stats.pending, Color::Gray),
            ("High Priority", self.stats.high_priority, Color::LightRed),
            ("Overdue", self.stats.overdue, Color::Red),
        ];
        let chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Ratio(1, 5); 5])
            .split(area);
        for (i, (label, value, color)) in cards.iter().enumerate() {
            let card = Paragraph::new(Line::from(Span::styled(
                value.to_string(),
                Style::default().fg(*color).add_modifier(Modifier::BOLD),
            )))
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).title(*label));
            f.render_widget(card, chunks[i]);
        }
    }

    fn render_filters(&self, f: &mut Frame, area: Rect) {
        let label = |s: Option<&'static str>| s.unwrap_or("All");
        let mut spans = vec![
            Span::styled("Status: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(label(self.filters.status.map(format_status))),
            Span::raw("   "),
            Span::styled("Priority: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(label(self.filters.priority.map(format_priority))),
            Span::raw("   "),
            Span::styled("Category: ", Style::default().add_modifier(Modifier::BOLD)),
            Span::raw(label(self.filters.category.map(format_category))),
            Span::raw("   "),
            Span::styled("Search: ", Style::default().add_modifier(Modifier::BOLD)),
        ];
        if self.search_active {
            spans.push(Span::styled(
                format!("{}_", self.filters.search_query),
                Style::default().fg(GOLD),
            ));
        } else if self.filters.search_query.is_empty() {
            spans.push(Span::raw("-"));
        } else {
            spans.push(Span::raw(format!("'{}'", self.filters.search_query)));
        }
        let bar = Paragraph::new(Line::from(spans))
            .block(Block::default().borders(Borders::ALL).title("Filters"));
        f.render_widget(bar, area);
    }

    /// Render the main task table.
    fn render_task_list(&mut self, f: &mut Frame, area: Rect) {
        let today = Self::today();

        let header_cells = ["", "Description", "Priority", "Category", "Due"]
            .iter()
            .map(|h| Cell::from(*h).style(Style::default().add_modifier(Modifier::BOLD)));
        let header = Row::new(header_cells)
            .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)))
            .height(1);

        let rows: Vec<Row> = self
            .visible
            .iter()
            .map(|task| {
                let done = !task.is_pending();
                let overdue = is_overdue(task, today);
                let check = if done { "[x]" } else { "[ ]" };
                let mut due = format_due(task.due_date, today);
                if overdue {
                    due.push_str(" !");
                }
                let row_style = if done {
                    Style::default().fg(Color::DarkGray).add_modifier(Modifier::CROSSED_OUT)
                } else {
                    Style::default().fg(Color::White)
                };
                let priority_style = if done {
                    Style::default()
                } else {
                    Style::default().fg(priority_color(task.priority))
                };
                let due_style = if overdue {
                    Style::default().fg(Color::Red).add_modifier(Modifier::BOLD)
                } else {
                    Style::default()
                };
                Row::new(vec![
                    Cell::from(check),
                    Cell::from(task.description.clone()),
                    Cell::from(format_priority(task.priority)).style(priority_style),
                    Cell::from(format_category(task.category)),
                    Cell::from(due).style(due_style),
                ])
                .style(row_style)
            })
            .collect();

        let widths = [
            Constraint::Length(3),
            Constraint::Min(25),
            Constraint::Length(9),
            Constraint::Length(10),
            Constraint::Length(13),
        ];

        let title = if self.visible.is_empty() {
            "No tasks found - press 'a' to create one".to_string()
        } else {
            format!(
                "Tasks ({}/{}) - Press 'h' for help",
                self.visible.len(),
                self.tasks.len()
            )
        };

        let table = Table::new(rows, widths)
            .header(header)
            .block(Block::default().borders(Borders::ALL).title(title))
            .row_highlight_style(Style::default().bg(Color::Gray).fg(Color::Black))
            .highlight_symbol(">> ");

        f.render_stateful_widget(table, area, &mut self.task_list_state);
    }

    /// Render the add/edit form as a popup over the list.
    fn render_task_form(&mut self, f: &mut Frame, area: Rect, is_edit: bool) {
        let area = centered_rect(60, 70, area);
        f.render_widget(Clear, area);

        let outer = Block::default()
            .borders(Borders::ALL)
            .title(if is_edit { "Edit Task" } else { "Add New Task" })
            .style(Style::default().bg(DARK_GREEN));
        let inner = outer.inner(area);
        f.render_widget(outer, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Description
                Constraint::Length(3), // Priority
                Constraint::Length(3), // Category
                Constraint::Length(3), // Due Date
                Constraint::Length(2), // Error
                Constraint::Min(1),    // Instructions
            ])
            .split(inner);

        let field_style = |order: usize| {
            if self.task_form.current_field == order {
                Style::default().fg(GOLD)
            } else {
                Style::default()
            }
        };

        let count = self.task_form.description.value.chars().count();
        let description = Paragraph::new(self.task_form.description.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title(format!("Task Description * ({count}/200)"))
                .border_style(field_style(DESCRIPTION_ORDER)),
        );
        f.render_widget(description, chunks[0]);

        let priority = Paragraph::new(format!(
            "< {} >",
            format_priority(self.task_form.selected_priority())
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Priority")
                .border_style(field_style(PRIORITY_ORDER)),
        );
        f.render_widget(priority, chunks[1]);

        let category = Paragraph::new(format!(
            "< {} >",
            format_category(self.task_form.selected_category())
        ))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Category")
                .border_style(field_style(CATEGORY_ORDER)),
        );
        f.render_widget(category, chunks[2]);

        let due = Paragraph::new(self.task_form.due.value.as_str()).block(
            Block::default()
                .borders(Borders::ALL)
                .title("Due Date (Optional)")
                .border_style(field_style(DUE_ORDER)),
        );
        f.render_widget(due, chunks[3]);

        if let Some(err) = &self.task_form.error {
            let error = Paragraph::new(err.as_str())
                .style(Style::default().fg(Color::LightRed).add_modifier(Modifier::BOLD));
            f.render_widget(error, chunks[4]);
        }

        let instructions = Paragraph::new(vec![
            Line::from("Tab/↑↓ move between fields   ←/→ change priority and category"),
            Line::from("Enter to save   Esc to cancel"),
            Line::from("Due: YYYY-MM-DD, today, tomorrow, in 3d, friday, eow"),
        ])
        .style(Style::default().fg(Color::Gray))
        .wrap(Wrap { trim: true });
        f.render_widget(instructions, chunks[5]);

        let cursor_field = match self.task_form.current_field {
            DESCRIPTION_ORDER => Some((&self.task_form.description, chunks[0])),
            DUE_ORDER => Some((&self.task_form.due, chunks[3])),
            _ => None,
        };
        if let (InputMode::Text, Some((field, rect))) = (self.input_mode, cursor_field) {
            let x = rect.x + 1 + field.cursor as u16;
            if x < rect.x + rect.width.saturating_sub(1) {
                f.set_cursor_position((x, rect.y + 1));
            }
        }
    }

    fn render_help(&mut self, f: &mut Frame, area: Rect) {
        let bold = Style::default().add_modifier(Modifier::BOLD);
        let help_text = vec![
            Line::from(vec![Span::styled("Task Manager Help", bold)]),
            Line::from(""),
            Line::from(vec![Span::styled("Task List:", bold)]),
            Line::from("  ↑/k, ↓/j     Navigate tasks"),
            Line::from("  Space/Enter  Toggle completion"),
            Line::from("  a            Add new task"),
            Line::from("  e            Edit selected task (pending only)"),
            Line::from("  d            Delete selected task"),
            Line::from("  /            Search descriptions"),
            Line::from("  s            Cycle status filter (All → Pending → Completed)"),
            Line::from("  p            Cycle priority filter"),
            Line::from("  c            Cycle category filter"),
            Line::from("  x            Clear all filters"),
            Line::from("  r            Reload tasks"),
            Line::from("  h/F1         Show this help"),
            Line::from("  q/Ctrl+C/Esc Quit"),
            Line::from(""),
            Line::from(vec![Span::styled("Form:", bold)]),
            Line::from("  Tab/↑/↓      Navigate between fields"),
            Line::from("  ←/→          Change priority/category"),
            Line::from("  Enter        Save task"),
            Line::from("  Esc          Cancel"),
            Line::from(""),
            Line::from(vec![Span::styled("Ordering:", bold)]),
            Line::from("  Pending first, then High → Low priority, then earliest due date,"),
            Line::from("  then newest. A red '!' marks tasks due before today."),
        ];

        let paragraph = Paragraph::new(help_text)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .title("Help - Press any key to return"),
            )
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render a confirmation dialog for deletion.
    fn render_confirm(&mut self, f: &mut Frame, area: Rect) {
        let block = Block::default()
            .title("Confirm Action")
            .borders(Borders::ALL)
            .style(Style::default().bg(DARK_RED));

        let area = centered_rect(50, 20, area);
        f.render_widget(Clear, area);

        let text = vec![
            Line::from(""),
            Line::from(vec![Span::styled(
                "Are you sure you want to:",
                Style::default().add_modifier(Modifier::BOLD),
            )]),
            Line::from(self.status_message.as_str()),
            Line::from(""),
            Line::from("This action cannot be undone."),
            Line::from(""),
            Line::from("Press 'y' to confirm, 'n' to cancel"),
        ];

        let paragraph = Paragraph::new(text)
            .block(block)
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });

        f.render_widget(paragraph, area);
    }

    /// Render the status bar at the bottom of the screen.
    fn render_status_bar(&mut self, f: &mut Frame, area: Rect) {
        let status_text = if self.state == AppState::Confirm {
            "Confirm Action".to_string()
        } else if !self.status_message.is_empty() {
            self.status_message.clone()
        } else if self.search_active {
            "Type to search (Esc to clear, Enter to confirm)".to_string()
        } else {
            match self.state {
                AppState::TaskList if !self.filters.is_empty() => format!(
                    "Showing {} of {} tasks (x to clear filters) | Press 'h' for help",
                    self.visible.len(),
                    self.tasks.len()
                ),
                AppState::TaskList => format!("Tasks: {} | Press 'h' for help", self.visible.len()),
                AppState::AddTask => "Add New Task".to_string(),
                AppState::EditTask => "Edit Task".to_string(),
                AppState::Help => "Help".to_string(),
                AppState::Confirm => unreachable!("handled above"),
            }
        };

        let status = Paragraph::new(status_text)
            .style(Style::default().bg(GOLD).fg(Color::Rgb(20, 20, 20)))
            .alignment(Alignment::Left);

        f.render_widget(status, area);
    }

    /// Main render function that dispatches to appropriate view renderers.
    fn render(&mut self, f: &mut Frame) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3), // Stats
                Constraint::Length(3), // Filters
                Constraint::Min(0),    // Table
                Constraint::Length(1), // Status bar
            ])
            .split(f.area());

        if self.state == AppState::Help {
            let body = chunks[0].union(chunks[2]);
            self.render_help(f, body);
            self.render_status_bar(f, chunks[3]);
            return;
        }

        self.render_stats(f, chunks[0]);
        self.render_filters(f, chunks[1]);
        self.render_task_list(f, chunks[2]);

        match self.state {
            AppState::AddTask => self.render_task_form(f, chunks[2], false),
            AppState::EditTask => self.render_task_form(f, chunks[2], true),
            AppState::Confirm => self.render_confirm(f, chunks[2]),
            AppState::TaskList | AppState::Help => {}
        }

        self.render_status_bar(f, chunks[3]);
    }

    /// Main event loop for the TUI application.
    ///
    /// Handles rendering and input processing until the user exits.
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.handle_input()? {
                break;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::tests::memory_store;
    use crate::storage::MemoryStore;
    use crate::task::TaskDraft;
    use ratatui::backend::TestBackend;

    fn press(app: &mut App<MemoryStore>, key: KeyCode) -> bool {
        app.handle_key(key, KeyModifiers::NONE)
    }

    fn type_str(app: &mut App<MemoryStore>, s: &str) {
        for c in s.chars() {
            press(app, KeyCode::Char(c));
        }
    }

    fn app_with(descriptions: &[&str]) -> App<MemoryStore> {
        let mut store = memory_store();
        for d in descriptions {
            store.add(TaskDraft::new(*d));
        }
        App::new(store)
    }

    #[test]
    fn test_add_task_through_form() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        assert_eq!(app.state, AppState::AddTask);
        type_str(&mut app, "Call plumber");
        press(&mut app, KeyCode::Enter);

        assert_eq!(app.state, AppState::TaskList);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.tasks[0].description, "Call plumber");
        assert_eq!(app.stats.pending, 1);
        assert_eq!(app.status_message, "Task created successfully");
    }

    #[test]
    fn test_invalid_form_stays_open() {
        let mut app = app_with(&[]);
        press(&mut app, KeyCode::Char('a'));
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.state, AppState::AddTask);
        assert_eq!(app.task_form.error.as_deref(), Some("Task description is required"));
        assert!(app.store.load_all().is_empty());

        press(&mut app, KeyCode::Esc);
        assert_eq!(app.state, AppState::TaskList);
    }

    #[test]
    fn test_toggle_updates_stats_and_order() {
        let mut app = app_with(&["first", "second"]);
        let top = app.selected_task().unwrap().id.clone();
        press(&mut app, KeyCode::Char(' '));
        assert_eq!(app.stats.completed, 1);
        // completed task drops to the bottom but stays selected
        assert_eq!(app.visible.last().unwrap().id, top);
        assert_eq!(app.selected_task().unwrap().id, top);
    }

    #[test]
    fn test_edit_rejected_for_completed() {
        let mut app = app_with(&["done already"]);
        press(&mut app, KeyCode::Char(' '));
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state, AppState::TaskList);
        assert_eq!(app.status_message, "Completed tasks cannot be edited");
    }

    #[test]
    fn test_edit_pending_task() {
        let mut app = app_with(&["old text"]);
        press(&mut app, KeyCode::Char('e'));
        assert_eq!(app.state, AppState::EditTask);
        for _ in 0.."old text".len() {
            press(&mut app, KeyCode::Backspace);
        }
        type_str(&mut app, "new text");
        press(&mut app, KeyCode::Tab);
        press(&mut app, KeyCode::Left);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.tasks[0].description, "new text");
        assert_eq!(app.tasks[0].priority, Priority::High);
    }

    #[test]
    fn test_delete_requires_confirmation() {
        let mut app = app_with(&["a", "b"]);
        press(&mut app, KeyCode::Char('d'));
        assert_eq!(app.state, AppState::Confirm);
        press(&mut app, KeyCode::Char('n'));
        assert_eq!(app.tasks.len(), 2);

        press(&mut app, KeyCode::Char('d'));
        press(&mut app, KeyCode::Char('y'));
        assert_eq!(app.state, AppState::TaskList);
        assert_eq!(app.tasks.len(), 1);
        assert_eq!(app.store.load_all().len(), 1);
    }

    #[test]
    fn test_filters_and_search() {
        let mut app = app_with(&["Buy groceries", "Review code changes"]);
        press(&mut app, KeyCode::Char('/'));
        type_str(&mut app, "groc");
        assert_eq!(app.visible.len(), 1);
        press(&mut app, KeyCode::Enter);
        assert_eq!(app.visible[0].description, "Buy groceries");

        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.filters.status, Some(Status::Pending));
        press(&mut app, KeyCode::Char('s'));
        assert_eq!(app.filters.status, Some(Status::Completed));
        assert!(app.visible.is_empty());
        assert_eq!(app.task_list_state.selected(), None);

        press(&mut app, KeyCode::Char('x'));
        assert_eq!(app.visible.len(), 2);
    }

    #[test]
    fn test_quit_keys() {
        let mut app = app_with(&[]);
        assert!(press(&mut app, KeyCode::Char('q')));
        assert!(app.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL));
    }

    #[test]
    fn test_renders_without_panicking() {
        let mut app = app_with(&["Buy groceries"]);
        let mut terminal = Terminal::new(TestBackend::new(100, 30)).unwrap();
        terminal.draw(|f| app.render(f)).unwrap();
        press(&mut app, KeyCode::Char('a'));
        terminal.draw(|f| app.render(f)).unwrap();
        press(&mut app, KeyCode::Esc);
        press(&mut app, KeyCode::Char('h'));
        terminal.draw(|f| app.render(f)).unwrap();
    }
}
