//! Welcome banner, shown until the first submission.

use crate::ui::theme::Styles;
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
};

/// The welcome banner.
pub struct WelcomeBanner<'a> {
    endpoint: &'a str,
    shift_enter: bool,
}

impl<'a> WelcomeBanner<'a> {
    /// Create a banner naming the endpoint questions go to.
    pub fn new(endpoint: &'a str) -> Self {
        Self {
            endpoint,
            shift_enter: false,
        }
    }

    /// Advertise Shift+Enter for new lines instead of Ctrl+J.
    ///
    /// Only terminals reporting key modifiers on Enter can tell the two apart.
    #[must_use]
    pub fn shift_enter(mut self, shift_enter: bool) -> Self {
        self.shift_enter = shift_enter;
        self
    }
}

impl Widget for WelcomeBanner<'_> {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .title(" chatdock ")
            .title_style(Styles::title())
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .style(Styles::default());

        let lines = vec![
            Line::from(""),
            Line::from(Span::styled(
                "  Hi! Ask a question and the assistant will answer here.",
                Styles::highlight(),
            )),
            Line::from(""),
            Line::from(Span::styled(
                "  Answers come back as text or as a chart.",
                Styles::default(),
            )),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Endpoint: ", Styles::dim()),
                Span::styled(self.endpoint.to_string(), Styles::default()),
            ]),
            Line::from(""),
            Line::from(vec![
                Span::styled("  Press ", Styles::dim()),
                Span::styled("[Enter]", Styles::key_hint()),
                Span::styled(" to send, ", Styles::dim()),
                Span::styled(
                    if self.shift_enter {
                        "[Shift+Enter]"
                    } else {
                        "[Ctrl+J]"
                    },
                    Styles::key_hint(),
                ),
                Span::styled(" for a new line", Styles::dim()),
            ]),
        ];

        Paragraph::new(lines)
            .block(block)
            .wrap(Wrap { trim: false })
            .style(Styles::default())
            .render(area, buf);
    }
}
