//! Input field and send button.
//!
//! The field wraps its content to the available width and keeps the cursor
//! line in view once the content outgrows the field.

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

use crate::ui::theme::{Styles, Symbols};
use crate::ui::widgets::TextInputState;
use crate::ui::PROMPT_WIDTH;

/// Input field with a `> ` prompt.
pub struct InputBar<'a> {
    input: &'a TextInputState,
    placeholder: &'a str,
    focused: bool,
}

impl<'a> InputBar<'a> {
    /// Create a new input bar widget.
    pub fn new(input: &'a TextInputState) -> Self {
        Self {
            input,
            placeholder: "Ask me anything...",
            focused: true,
        }
    }

    /// Set whether the input bar is focused.
    #[must_use]
    pub fn focused(mut self, focused: bool) -> Self {
        self.focused = focused;
        self
    }

    /// Wrap the content to `width` and return display lines plus the index
    /// of the line holding the cursor.
    fn build_input_lines(&self, width: u16) -> (Vec<Line<'static>>, usize) {
        let content = self.input.content();

        if content.is_empty() {
            let mut spans = vec![Span::styled("> ", Styles::active())];
            if self.focused {
                spans.push(Span::styled(Symbols::CURSOR, Styles::active()));
            }
            spans.push(Span::styled(self.placeholder.to_string(), Styles::dim()));
            return (vec![Line::from(spans)], 0);
        }

        let cursor = self.focused.then_some(Symbols::CURSOR);
        let (wrapped, cursor_line) = self.input.wrapped_lines(cursor, width);
        let lines = wrapped
            .into_iter()
            .enumerate()
            .map(|(i, text)| {
                let prefix = if i == 0 { "> " } else { "  " };
                Line::from(vec![
                    Span::styled(prefix, Styles::active()),
                    Span::styled(text, Styles::default()),
                ])
            })
            .collect();

        (lines, cursor_line)
    }
}

impl Widget for InputBar<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let border_style = if self.focused {
            Styles::border_active()
        } else {
            Styles::border()
        };

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(border_style)
            .style(Styles::default());

        let inner = block.inner(area);
        let width = inner.width.saturating_sub(PROMPT_WIDTH);
        let (lines, cursor_line) = self.build_input_lines(width);

        // Keep the cursor line visible.
        let inner_height = usize::from(inner.height);
        let scroll = cursor_line.saturating_sub(inner_height.saturating_sub(1));

        Paragraph::new(lines)
            .block(block)
            .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0))
            .render(area, buf);
    }
}

/// Clickable send trigger.
pub struct SendButton {
    busy: bool,
}

impl SendButton {
    /// Create a send button; `busy` dims it while a request is outstanding.
    pub fn new(busy: bool) -> Self {
        Self { busy }
    }
}

impl Widget for SendButton {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let style = if self.busy {
            Styles::button_busy()
        } else {
            Styles::button()
        };

        Paragraph::new(Line::from("Send"))
            .alignment(Alignment::Center)
            .style(style)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Styles::border_active()),
            )
            .render(area, buf);
    }
}
