//! Loading indicator: three dots taking turns to light up.

use crate::ui::centered_fixed;
use crate::ui::theme::{Styles, Symbols};
use ratatui::{
    buffer::Buffer,
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget},
};

const DOTS: usize = 3;

/// Animated loading indicator.
pub struct LoadingIndicator {
    frame: usize,
}

impl LoadingIndicator {
    /// Create the indicator at animation `frame`.
    pub fn new(frame: usize) -> Self {
        Self { frame }
    }

    fn dots(&self) -> Line<'static> {
        let lit = self.frame % DOTS;
        let mut spans = Vec::with_capacity(DOTS * 2);
        for i in 0..DOTS {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            if i == lit {
                spans.push(Span::styled(Symbols::DOT, Styles::highlight()));
            } else {
                spans.push(Span::styled(Symbols::DOT_DIM, Styles::dim()));
            }
        }
        Line::from(spans)
    }
}

impl Widget for LoadingIndicator {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(Styles::border())
            .style(Styles::default());
        let inner = block.inner(area);
        block.render(area, buf);

        let center = centered_fixed(12, 2, inner);
        Paragraph::new(vec![
            self.dots().centered(),
            Line::styled("thinking", Styles::dim()).centered(),
        ])
        .render(center, buf);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::buffer_to_string;

    #[test]
    fn test_dots_cycle() {
        let render = |frame| {
            let area = Rect::new(0, 0, 20, 6);
            let mut buffer = Buffer::empty(area);
            LoadingIndicator::new(frame).render(area, &mut buffer);
            buffer_to_string(&buffer)
        };

        assert!(render(0).contains("● ∙ ∙"));
        assert!(render(1).contains("∙ ● ∙"));
        assert!(render(5).contains("∙ ∙ ●"));
        assert!(render(0).contains("thinking"));
    }
}
