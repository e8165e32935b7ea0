//! Output panel showing the assistant's last answer.

use crate::ui::theme::Styles;
use chatdock_engine::Output;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::Line,
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// Output panel widget.
pub struct OutputPanel<'a> {
    output: Option<&'a Output>,
    image_note: Option<(&'a str, bool)>,
    scroll: u16,
}

impl<'a> OutputPanel<'a> {
    /// Create a panel for `output`; `None` renders an empty panel.
    pub fn new(output: Option<&'a Output>) -> Self {
        Self {
            output,
            image_note: None,
            scroll: 0,
        }
    }

    /// Attach a note about the exported image, flagged when it is a failure.
    #[must_use]
    pub fn image_note(mut self, note: Option<&'a str>, is_error: bool) -> Self {
        self.image_note = note.map(|n| (n, is_error));
        self
    }

    /// Set the vertical scroll offset.
    #[must_use]
    pub fn scroll(mut self, scroll: u16) -> Self {
        self.scroll = scroll;
        self
    }

    /// Largest useful scroll offset when drawn into `area`.
    pub fn max_scroll(&self, area: Rect) -> u16 {
        let width = usize::from(area.width.saturating_sub(2).max(1));
        let rows: usize = self
            .lines()
            .iter()
            .map(|line| {
                let text: String = line.spans.iter().map(|s| s.content.as_ref()).collect();
                textwrap::wrap(&text, width).len().max(1)
            })
            .sum();
        let visible = usize::from(area.height.saturating_sub(2));
        u16::try_from(rows.saturating_sub(visible)).unwrap_or(u16::MAX)
    }

    fn lines(&self) -> Vec<Line<'static>> {
        let Some(output) = self.output else {
            return Vec::new();
        };

        let style = if output.is_error() {
            Styles::error()
        } else {
            Styles::default()
        };
        let mut lines: Vec<Line<'static>> = output
            .plain_lines()
            .into_iter()
            .map(|l| Line::styled(l, style))
            .collect();

        if let Some((note, is_error)) = self.image_note {
            let note_style = if is_error {
                Styles::warning()
            } else {
                Styles::dim()
            };
            lines.push(Line::from(""));
            lines.push(Line::styled(note.to_string(), note_style));
        }
        lines
    }
}

impl Widget for OutputPanel<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" Assistant ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .style(Styles::default());

        Paragraph::new(self.lines())
            .block(block)
            .wrap(Wrap { trim: false })
            .scroll((self.scroll, 0))
            .render(area, buf);
    }
}
