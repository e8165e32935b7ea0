//! chatdock-tui: Terminal UI for the chatdock chat widget
//!
//! This crate provides the terminal surface of the widget:
//! - Welcome banner, loading indicator and output panel
//! - Auto-growing input field with a send button
//! - Keyboard and mouse handling
//! - Headless mode for testing and automation

mod app;
mod event;
pub mod headless;
mod requests;
#[cfg(test)]
pub mod test_utils;
mod ui;
mod view;
mod widgets;

pub use app::{App, WidgetState};
pub use chatdock_engine;
pub use event::{key_to_action, Action, Event, EventHandler};

use chatdock_engine::{AssistantClient, Config};
use crossterm::{
    cursor::Show as ShowCursor,
    event::{
        DisableMouseCapture, EnableMouseCapture, KeyboardEnhancementFlags,
        PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
    },
    execute,
    terminal::{
        disable_raw_mode, enable_raw_mode, supports_keyboard_enhancement, window_size,
        EnterAlternateScreen, LeaveAlternateScreen,
    },
};
use ratatui::{backend::CrosstermBackend, layout::Rect, Terminal};
use requests::Requests;
use std::io::{self, stdout};
use std::sync::Arc;
use tracing::{debug, info};

/// RAII guard for terminal state restoration.
struct TerminalGuard {
    keyboard_enhanced: bool,
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        if self.keyboard_enhanced {
            let _ = execute!(stdout(), PopKeyboardEnhancementFlags);
        }
        let _ = disable_raw_mode();
        let _ = execute!(stdout(), DisableMouseCapture, LeaveAlternateScreen, ShowCursor);
    }
}

/// Viewport width in pixels, if the terminal reports one.
fn viewport_width_px() -> Option<u32> {
    window_size()
        .ok()
        .map(|size| u32::from(size.width))
        .filter(|&px| px > 0)
}

/// Run the chat widget in the terminal.
///
/// Sets up the terminal, runs the event loop until the user quits, and
/// restores the terminal on exit.
pub async fn run_widget(
    config: Config,
    client: Arc<dyn AssistantClient>,
) -> Result<(), Box<dyn std::error::Error>> {
    enable_raw_mode()?;
    let mut guard = TerminalGuard {
        keyboard_enhanced: false,
    };

    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Without this most terminals send Shift+Enter as a bare Enter.
    if supports_keyboard_enhancement().unwrap_or(false) {
        execute!(
            stdout,
            PushKeyboardEnhancementFlags(KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES)
        )?;
        guard.keyboard_enhanced = true;
    }
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let size = terminal.size()?;
    let mut app = App::new(&config, Rect::new(0, 0, size.width, size.height));
    app.viewport_width_px = viewport_width_px();
    app.shift_enter_newline = guard.keyboard_enhanced;
    info!(
        endpoint = %app.endpoint,
        viewport_width_px = ?app.viewport_width_px,
        keyboard_enhanced = guard.keyboard_enhanced,
        "chat widget started"
    );

    let mut events = EventHandler::new(config.tick_rate_ms);
    let mut requests = Requests::new(client);

    let result = run_loop(&mut terminal, &mut app, &mut events, &mut requests).await;
    requests.abort_all();

    terminal.show_cursor()?;

    result
}

async fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &mut EventHandler,
    requests: &mut Requests,
) -> Result<(), Box<dyn std::error::Error>> {
    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            view::render(app, area, frame.buffer_mut());
        })?;

        if app.should_quit {
            return Ok(());
        }

        let Some(event) = events.next().await else {
            return Ok(());
        };

        let action = match event {
            Event::Key(key) => key_to_action(key, app.key_policy, app.viewport_width_px),
            Event::Mouse(mouse) => app.mouse_action(mouse),
            Event::Tick => {
                app.tick();
                Action::None
            }
            Event::Resize(width, height) => {
                let px = viewport_width_px();
                debug!(width, height, viewport_width_px = ?px, "terminal resized");
                app.resize(width, height, px);
                Action::None
            }
        };

        if let Some(submission) = app.handle_action(action) {
            debug!(ticket = submission.ticket.get(), "sending request");
            requests.spawn(submission);
        }

        if !requests.is_empty() {
            requests.collect_finished(app).await;
        }
    }
}

/// Returns the TUI version.
pub fn tui_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
