//! Rendering of the whole chat widget.

use crate::app::App;
use crate::ui::widgets::{KeyHint, StatusBar};
use crate::widgets::{InputBar, LoadingIndicator, OutputPanel, SendButton, WelcomeBanner};
use ratatui::{buffer::Buffer, layout::Rect, widgets::Widget};

const HINTS: [KeyHint; 3] = [
    KeyHint::new("Enter", "Send"),
    KeyHint::new("Ctrl+J", "Line"),
    KeyHint::new("Esc", "Quit"),
];

/// Render the app into `buf`.
pub fn render(app: &App, area: Rect, buf: &mut Buffer) {
    let layout = crate::ui::widget_layout(area, app.widget.input.height());
    let widget = &app.widget;

    if widget.loading_visible {
        LoadingIndicator::new(app.tick).render(layout.panel, buf);
    } else if widget.output_visible {
        OutputPanel::new(widget.output.as_ref())
            .image_note(widget.image_note.as_deref(), widget.image_note_is_error)
            .scroll(widget.output_scroll)
            .render(layout.panel, buf);
    } else if widget.welcome_visible {
        WelcomeBanner::new(&app.endpoint)
            .shift_enter(app.shift_enter_newline)
            .render(layout.panel, buf);
    } else {
        OutputPanel::new(None).render(layout.panel, buf);
    }

    InputBar::new(&widget.input)
        .focused(!app.should_quit)
        .render(layout.input, buf);
    SendButton::new(app.is_loading()).render(layout.send, buf);

    let right = if app.is_loading() {
        "waiting for reply"
    } else {
        app.endpoint.as_str()
    };
    StatusBar::new("chat")
        .hints(HINTS.to_vec())
        .right(right)
        .render(layout.status, buf);
}

#[cfg(test)]
mod tests {
    use crate::event::Action;
    use crate::test_utils::{create_test_app, render_app_to_string};

    #[test]
    fn test_initial_screen_shows_welcome() {
        let app = create_test_app();
        let screen = render_app_to_string(&app);
        assert!(screen.contains("chatdock"));
        assert!(screen.contains("Endpoint: http://127.0.0.1:5000/assistant"));
        assert!(screen.contains("Ask me anything..."));
        assert!(screen.contains("Send"));
        assert!(screen.contains("[Ctrl+J] for a new line"));
    }

    #[test]
    fn test_welcome_advertises_shift_enter_when_reported() {
        let mut app = create_test_app();
        app.shift_enter_newline = true;
        let screen = render_app_to_string(&app);
        assert!(screen.contains("[Shift+Enter] for a new line"));
    }

    #[test]
    fn test_loading_replaces_welcome() {
        let mut app = create_test_app();
        app.handle_action(Action::Insert('q'));
        app.submit();

        let screen = render_app_to_string(&app);
        assert!(!screen.contains("Endpoint:"));
        assert!(screen.contains("thinking"));
        assert!(screen.contains("waiting for reply"));
    }

    #[test]
    fn test_output_after_completion() {
        let mut app = create_test_app();
        app.handle_action(Action::Insert('q'));
        let submission = app.submit().unwrap();
        app.complete(submission.ticket, Ok("Top artist: Miles Davis".into()));

        let screen = render_app_to_string(&app);
        assert!(screen.contains("Top artist: Miles Davis"));
        assert!(!screen.contains("thinking"));
        assert!(!screen.contains("Endpoint:"));
    }
}
