//! Layout helpers for the chatdock TUI.
//!
//! ```text
//! ┌─ Assistant ───────────────────────────────┐
//! │ welcome banner / loading / output panel   │
//! └───────────────────────────────────────────┘
//! ┌───────────────────────────────┐┌─────────┐
//! │ > input field (auto-grows)    ││  Send   │
//! └───────────────────────────────┘└─────────┘
//!  status bar
//! ```

use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Width of the send button, borders included.
pub const SEND_WIDTH: u16 = 10;

/// Most input lines shown before the field scrolls.
pub const MAX_INPUT_LINES: u16 = 8;

/// Width of the `> ` prompt in front of input lines.
pub const PROMPT_WIDTH: u16 = 2;

/// Areas of the widget for a given terminal size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WidgetLayout {
    /// Welcome banner, loading indicator or output panel.
    pub panel: Rect,
    /// Input field, borders included.
    pub input: Rect,
    /// Send button, borders included.
    pub send: Rect,
    /// Status bar.
    pub status: Rect,
}

/// Split `area` for an input field showing `input_lines` lines.
pub fn widget_layout(area: Rect, input_lines: u16) -> WidgetLayout {
    // Leave the panel at least three rows.
    let room = area.height.saturating_sub(1 + 3 + 2).max(1);
    let input_height = input_lines.clamp(1, MAX_INPUT_LINES).min(room) + 2;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(input_height),
            Constraint::Length(1),
        ])
        .split(area);

    let input_row = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Min(4), Constraint::Length(SEND_WIDTH)])
        .split(rows[1]);

    WidgetLayout {
        panel: rows[0],
        input: input_row[0],
        send: input_row[1],
        status: rows[2],
    }
}

/// Columns available for input text inside the field.
pub fn input_text_width(area: Rect) -> u16 {
    widget_layout(area, 1)
        .input
        .width
        .saturating_sub(2 + PROMPT_WIDTH)
        .max(1)
}

/// Create a centered rect with fixed dimensions.
pub fn centered_fixed(width: u16, height: u16, area: Rect) -> Rect {
    let x = area.x + area.width.saturating_sub(width) / 2;
    let y = area.y + area.height.saturating_sub(height) / 2;
    Rect::new(x, y, width.min(area.width), height.min(area.height))
}
