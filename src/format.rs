//! Display helpers and input parsing for the CLI and TUI.
//!
//! Formatting of task fields, due-date parsing with natural-language support,
//! the per-item overdue check, and task identifier resolution.

use chrono::{Datelike, Duration, NaiveDate};

use crate::fields::*;
use crate::task::Task;

/// Parse human-readable due date input with smart natural language support.
///
/// Supports:
/// - "today", "tomorrow", "yesterday"
/// - "next monday", "next tuesday", etc.
/// - "this friday", "this weekend"
/// - "end of week", "end of month"
/// - "in 3d", "in 2w", "in 1m"
/// - "YYYY-MM-DD" format
pub fn parse_due_input(s: &str, today: NaiveDate) -> Option<NaiveDate> {
    let s = s.trim().to_lowercase();

    match s.as_str() {
        "today" => return Some(today),
        "tomorrow" => return Some(today + Duration::days(1)),
        "yesterday" => return Some(today - Duration::days(1)),
        "end of week" | "eow" => {
            let (_, end) = start_end_of_this_week(today);
            return Some(end);
        }
        "end of month" | "eom" => {
            let (year, month) = if today.month() == 12 {
                (today.year() + 1, 1)
            } else {
                (today.year(), today.month() + 1)
            };
            let first_of_next = NaiveDate::from_ymd_opt(year, month, 1)?;
            return Some(first_of_next - Duration::days(1));
        }
        "this weekend" | "weekend" => {
            let days_until_saturday = (5 + 7 - today.weekday().num_days_from_monday()) % 7;
            return Some(today + Duration::days(days_until_saturday as i64));
        }
        _ => {}
    }

    if let Some(rest) = s.strip_prefix("in ") {
        let rest = rest.trim();
        let (count, unit_days) = if let Some(n) = rest.strip_suffix('d') {
            (n, 1)
        } else if let Some(n) = rest.strip_suffix('w') {
            (n, 7)
        } else if let Some(n) = rest.strip_suffix('m') {
            // Approximate: 30 days per month
            (n, 30)
        } else {
            (rest, 1)
        };
        if let Ok(n) = count.trim().parse::<i64>() {
            let offset = n.checked_mul(unit_days).and_then(Duration::try_days)?;
            return today.checked_add_signed(offset);
        }
    }

    let weekdays = [
        ("monday", 0), ("tuesday", 1), ("wednesday", 2), ("thursday", 3),
        ("friday", 4), ("saturday", 5), ("sunday", 6),
        ("mon", 0), ("tue", 1), ("wed", 2), ("thu", 3),
        ("fri", 4), ("sat", 5), ("sun", 6),
    ];
    let current_day = today.weekday().num_days_from_monday() as i64;
    for (day_name, target_day) in weekdays {
        let days_ahead = (target_day + 7 - current_day) % 7;
        if s == day_name || s == format!("this {day_name}") {
            return Some(today + Duration::days(days_ahead));
        }
        if s == format!("next {day_name}") {
            let days_to_add = if days_ahead == 0 { 7 } else { days_ahead + 7 };
            return Some(today + Duration::days(days_to_add));
        }
    }

    NaiveDate::parse_from_str(&s, "%Y-%m-%d").ok()
}

/// Calculate the start and end dates of the current ISO week (Monday to Sunday).
pub fn start_end_of_this_week(today: NaiveDate) -> (NaiveDate, NaiveDate) {
    let weekday = today.weekday().num_days_from_monday() as i64;
    let start = today - Duration::days(weekday);
    (start, start + Duration::days(6))
}

/// Due date label: "Today", "Tomorrow", or the ISO date.
pub fn format_due(due: Option<NaiveDate>, today: NaiveDate) -> String {
    match due {
        None => "-".into(),
        Some(d) if d == today => "Today".into(),
        Some(d) if Some(d) == today.succ_opt() => "Tomorrow".into(),
        Some(d) => d.format("%Y-%m-%d").to_string(),
    }
}

/// Per-item overdue marker: pending with a due date before the start of today.
///
/// Unlike `stats::is_past_due`, a task due today is not overdue here.
pub fn is_overdue(task: &Task, today: NaiveDate) -> bool {
    task.is_pending() && task.due_date.is_some_and(|d| d < today)
}

pub fn format_status(s: Status) -> &'static str {
    match s {
        Status::Pending => "Pending",
        Status::Completed => "Completed",
    }
}

pub fn format_priority(p: Priority) -> &'static str {
    match p {
        Priority::High => "High",
        Priority::Medium => "Medium",
        Priority::Low => "Low",
    }
}

pub fn format_category(c: Category) -> &'static str {
    match c {
        Category::Work => "Work",
        Category::Personal => "Personal",
        Category::Shopping => "Shopping",
        Category::Health => "Health",
        Category::Education => "Education",
        Category::Other => "Other",
    }
}

/// Truncate a string to a maximum width, adding ellipsis if needed.
pub fn truncate(s: &str, width: usize) -> String {
    if s.chars().count() <= width {
        s.to_string()
    } else {
        let mut out = String::new();
        for (i, ch) in s.chars().enumerate() {
            if i + 1 >= width {
                out.push('…');
                break;
            }
            out.push(ch);
        }
        out
    }
}

/// Print tasks in a formatted table.
pub fn print_table(tasks: &[Task], today: NaiveDate) {
    println!(
        "{:<10} {:<10} {:<7} {:<10} {:<12} {}",
        "ID", "Status", "Pri", "Category", "Due", "Description"
    );
    for t in tasks {
        let mut due = format_due(t.due_date, today);
        if is_overdue(t, today) {
            due.push('!');
        }
        let check = if t.is_pending() { "[ ]" } else { "[x]" };
        println!(
            "{:<10} {:<10} {:<7} {:<10} {:<12} {} {}",
            t.short_id(),
            format_status(t.status()),
            format_priority(t.priority),
            format_category(t.category),
            due,
            check,
            truncate(&t.description, 60)
        );
    }
}

/// Multi-line detail view of a single task.
pub fn format_task_detail(task: &Task, today: NaiveDate) -> String {
    let mut out = String::new();
    out.push_str(&format!("ID:           {}\n", task.id));
    out.push_str(&format!("Description:  {}\n", task.description));
    out.push_str(&format!("Status:       {}\n", format_status(task.status())));
    out.push_str(&format!("Priority:     {}\n", format_priority(task.priority)));
    out.push_str(&format!("Category:     {}\n", format_category(task.category)));
    let due = match task.due_date {
        Some(d) => {
            let overdue = if is_overdue(task, today) { ", overdue" } else { "" };
            format!("{d} ({}{overdue})", format_due(Some(d), today))
        }
        None => "-".into(),
    };
    out.push_str(&format!("Due:          {due}\n"));
    out.push_str(&format!("Created UTC:  {}\n", task.created_at.to_rfc3339()));
    if let Some(at) = task.completed_at() {
        out.push_str(&format!("Completed:    {}\n", at.to_rfc3339()));
    }
    out
}

/// Resolve a task identifier to a full task id.
///
/// Accepts a full id, an exact short id (as shown in tables), or a unique
/// case-insensitive description.
pub fn resolve_task_identifier(identifier: &str, tasks: &[Task]) -> Result<String, String> {
    let identifier = identifier.trim();
    if identifier.is_empty() {
        return Err("Task identifier cannot be empty".to_string());
    }
    if let Some(t) = tasks.iter().find(|t| t.id == identifier) {
        return Ok(t.id.clone());
    }

    let mut matches: Vec<&Task> = tasks.iter().filter(|t| t.short_id() == identifier).collect();
    if matches.is_empty() {
        let wanted = identifier.to_lowercase();
        matches = tasks
            .iter()
            .filter(|t| t.description.to_lowercase() == wanted)
            .collect();
    }

    match matches.len() {
        0 => Err(format!("No task found matching '{}'", identifier)),
        1 => Ok(matches[0].id.clone()),
        _ => {
            let mut error_msg = format!("Multiple tasks match '{}':\n", identifier);
            for task in matches {
                error_msg.push_str(&format!(
                    "  {}: {} ({})\n",
                    task.id,
                    task.description,
                    format_status(task.status())
                ));
            }
            error_msg.push_str("Please use the full ID instead.");
            Err(error_msg)
        }
    }
}
