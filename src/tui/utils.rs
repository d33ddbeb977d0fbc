//! Layout and cycling helpers shared by the TUI views.

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Carve a rectangle of the given percentage size out of the middle of `r`.
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Step an optional filter value through `options`: all, first, ..., last, all.
pub fn cycle_filter<T: Copy + PartialEq>(options: &[T], current: Option<T>) -> Option<T> {
    match current {
        None => options.first().copied(),
        Some(v) => {
            let idx = options.iter().position(|&o| o == v)?;
            options.get(idx + 1).copied()
        }
    }
}

/// Step a selector index forwards or backwards with wrap-around.
pub fn step_index(current: usize, len: usize, forward: bool) -> usize {
    if len == 0 {
        return 0;
    }
    if forward {
        (current + 1) % len
    } else if current == 0 {
        len - 1
    } else {
        current - 1
    }
}
