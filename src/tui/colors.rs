//! Color constants for the terminal user interface.

use ratatui::style::Color;

use crate::fields::Priority;

/// Accent for the focused form field and the header bar.
pub const GOLD: Color = Color::Rgb(255, 215, 0);
/// Background of the delete confirmation dialog.
pub const DARK_RED: Color = Color::Rgb(114, 0, 0);
/// Medium priority badge.
pub const AMBER: Color = Color::Rgb(230, 150, 20);
/// Background of the add/edit form popup.
pub const DARK_GREEN: Color = Color::Rgb(0, 80, 0);

/// Foreground color for a priority badge.
pub fn priority_color(p: Priority) -> Color {
    match p {
        Priority::High => Color::LightRed,
        Priority::Medium => AMBER,
        Priority::Low => Color::Gray,
    }
}
