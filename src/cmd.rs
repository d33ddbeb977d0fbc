//! Command implementations for the CLI interface.
//!
//! Each handler validates input at the boundary, calls into the task store, and
//! reports the outcome. Not-found and validation problems surface as errors so
//! the binary can exit non-zero; the store itself never raises.

use anyhow::{anyhow, bail, Result};
use chrono::{Local, NaiveDate, Utc};
use clap::Subcommand;
use clap_complete::{generate, Shell};

use crate::db::TaskStore;
use crate::fields::*;
use crate::filter::{apply_filters_and_sort, TaskFilters};
use crate::format::*;
use crate::seed::seed_if_empty;
use crate::stats::compute_stats;
use crate::storage::KeyValueStore;
use crate::task::{TaskDraft, TaskPatch};
use crate::validate::{validate_description, validate_due_date, ValidationError};

#[derive(Subcommand)]
pub enum Commands {
    /// Launch the interactive UI.
    Ui,

    /// Add a new task.
    Add {
        /// What needs doing (up to 200 characters).
        description: String,
        /// Priority: high | medium | low.
        #[arg(long, short, value_enum, default_value_t = Priority::Medium)]
        priority: Priority,
        /// Category: work | personal | shopping | health | education | other.
        #[arg(long, short, value_enum, default_value_t = Category::Other)]
        category: Category,
        /// Due date: YYYY-MM-DD, "today", "tomorrow", or "in Nd".
        #[arg(long, short)]
        due: Option<String>,
    },

    /// List tasks, pending and most urgent first.
    List {
        /// Filter by status.
        #[arg(long, value_enum)]
        status: Option<Status>,
        /// Filter by priority.
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        /// Filter by category.
        #[arg(long, value_enum)]
        category: Option<Category>,
        /// Case-insensitive text to look for in descriptions.
        #[arg(long, short)]
        search: Option<String>,
        /// Limit number of rows printed.
        #[arg(long)]
        limit: Option<usize>,
        /// Print JSON instead of a table.
        #[arg(long)]
        json: bool,
    },

    /// View a single task.
    View {
        /// Task ID, short ID, or description.
        id: String,
    },

    /// Change fields on a pending task.
    Edit {
        /// Task ID, short ID, or description.
        id: String,
        #[arg(long)]
        desc: Option<String>,
        #[arg(long, value_enum)]
        priority: Option<Priority>,
        #[arg(long, value_enum)]
        category: Option<Category>,
        #[arg(long)]
        due: Option<String>,
        /// Clear due date.
        #[arg(long, conflicts_with = "due")]
        clear_due: bool,
    },

    /// Mark a task completed.
    Done {
        /// Task ID, short ID, or description.
        id: String,
    },

    /// Mark a completed task pending again.
    #[command(alias = "reopen")]
    Undo {
        /// Task ID, short ID, or description.
        id: String,
    },

    /// Flip a task between pending and completed.
    Toggle {
        /// Task ID, short ID, or description.
        id: String,
    },

    /// Delete a task permanently.
    #[command(alias = "delete")]
    Rm {
        /// Task ID, short ID, or description.
        id: String,
    },

    /// Show summary counts.
    Stats {
        /// Print JSON instead of text.
        #[arg(long)]
        json: bool,
    },

    /// Insert the sample tasks if the store is empty.
    Seed,

    /// Generate shell completion scripts.
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn resolve<S: KeyValueStore>(store: &TaskStore<S>, identifier: &str) -> Result<String> {
    resolve_task_identifier(identifier, &store.load_all()).map_err(|e| anyhow!(e))
}

fn parse_due(raw: &str, today: NaiveDate) -> Result<NaiveDate, ValidationError> {
    let due = parse_due_input(raw, today).ok_or_else(|| ValidationError::BadDueDate(raw.to_string()))?;
    validate_due_date(due, today)
}

/// Add a new task to the store.
pub fn cmd_add<S: KeyValueStore>(
    store: &mut TaskStore<S>,
    description: String,
    priority: Priority,
    category: Category,
    due: Option<String>,
) -> Result<()> {
    let today = today();
    let mut draft = TaskDraft::new(validate_description(&description)?)
        .priority(priority)
        .category(category);
    if let Some(raw) = due {
        draft = draft.due(parse_due(&raw, today)?);
    }
    let task = store.add(draft);
    println!("Added task {}", task.short_id());
    Ok(())
}

/// List tasks with optional filtering.
pub fn cmd_list<S: KeyValueStore>(
    store: &TaskStore<S>,
    filters: TaskFilters,
    limit: Option<usize>,
    json: bool,
) -> Result<()> {
    let mut tasks = apply_filters_and_sort(&store.load_all(), &filters);
    if let Some(n) = limit {
        tasks.truncate(n);
    }
    if json {
        println!("{}", serde_json::to_string_pretty(&tasks)?);
    } else if tasks.is_empty() {
        println!("No tasks found.");
    } else {
        print_table(&tasks, today());
    }
    Ok(())
}

/// View detailed information about a specific task.
pub fn cmd_view<S: KeyValueStore>(store: &TaskStore<S>, id: String) -> Result<()> {
    let task_id = resolve(store, &id)?;
    let task = store
        .get(&task_id)
        .ok_or_else(|| anyhow!("Task {task_id} not found."))?;
    print!("{}", format_task_detail(&task, today()));
    Ok(())
}

/// Update fields on a pending task.
pub fn cmd_edit<S: KeyValueStore>(
    store: &mut TaskStore<S>,
    id: String,
    desc: Option<String>,
    priority: Option<Priority>,
    category: Option<Category>,
    due: Option<String>,
    clear_due: bool,
) -> Result<()> {
    let task_id = resolve(store, &id)?;
    let Some(current) = store.get(&task_id) else {
        bail!("Task {task_id} not found.");
    };
    if !current.is_pending() {
        bail!("Completed tasks cannot be edited. Reopen it first with `tm undo`.");
    }

    let today = today();
    let mut patch = TaskPatch {
        description: desc.as_deref().map(validate_description).transpose()?,
        priority,
        category,
        ..Default::default()
    };
    if clear_due {
        patch.due_date = Some(None);
    }
    if let Some(raw) = due {
        patch.due_date = Some(Some(parse_due(&raw, today)?));
    }
    if patch.is_empty() {
        bail!("Nothing to change. Pass --desc, --priority, --category, --due or --clear-due.");
    }

    let task = store
        .update(&task_id, patch)
        .ok_or_else(|| anyhow!("Task {task_id} not found."))?;
    println!("Updated task {}", task.short_id());
    Ok(())
}

/// Mark a task as completed.
pub fn cmd_done<S: KeyValueStore>(store: &mut TaskStore<S>, id: String) -> Result<()> {
    let task_id = resolve(store, &id)?;
    let task = store
        .complete(&task_id)
        .ok_or_else(|| anyhow!("Task {task_id} not found."))?;
    println!("Task completed: {}", task.description);
    Ok(())
}

/// Reopen a completed task.
pub fn cmd_undo<S: KeyValueStore>(store: &mut TaskStore<S>, id: String) -> Result<()> {
    let task_id = resolve(store, &id)?;
    let task = store
        .uncomplete(&task_id)
        .ok_or_else(|| anyhow!("Task {task_id} not found."))?;
    println!("Task marked as pending: {}", task.description);
    Ok(())
}

pub fn cmd_toggle<S: KeyValueStore>(store: &mut TaskStore<S>, id: String) -> Result<()> {
    let task_id = resolve(store, &id)?;
    let task = store
        .toggle(&task_id)
        .ok_or_else(|| anyhow!("Task {task_id} not found."))?;
    match task.status() {
        Status::Completed => println!("Task completed: {}", task.description),
        Status::Pending => println!("Task marked as pending: {}", task.description),
    }
    Ok(())
}

/// Delete a task by ID.
pub fn cmd_rm<S: KeyValueStore>(store: &mut TaskStore<S>, id: String) -> Result<()> {
    let task_id = resolve(store, &id)?;
    if !store.delete(&task_id) {
        bail!("Task {task_id} not found.");
    }
    println!("Task deleted.");
    Ok(())
}

/// Print summary counts for the whole collection.
pub fn cmd_stats<S: KeyValueStore>(store: &TaskStore<S>, json: bool) -> Result<()> {
    let stats = compute_stats(&store.load_all(), Utc::now());
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
        return Ok(());
    }
    println!("{:<14} {}", "Total Tasks", stats.total);
    println!("{:<14} {}", "Completed", stats.completed);
    println!("{:<14} {}", "Pending", stats.pending);
    println!("{:<14} {}", "High Priority", stats.high_priority);
    println!("{:<14} {}", "Overdue", stats.overdue);
    Ok(())
}

pub fn cmd_seed<S: KeyValueStore>(store: &mut TaskStore<S>) -> Result<()> {
    match seed_if_empty(store, Utc::now().date_naive()) {
        0 => println!("Store already has tasks; nothing seeded."),
        n => println!("Added {n} sample task(s)."),
    }
    Ok(())
}

/// Generate shell completion scripts.
pub fn cmd_completions(shell: Shell) {
    use clap::CommandFactory;
    use crate::cli::Cli;

    let mut app = Cli::command();
    let app_name = app.get_name().to_string();
    generate(shell, &mut app, app_name, &mut std::io::stdout());
}
