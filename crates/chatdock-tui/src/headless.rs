//! Headless mode for the chatdock TUI.
//!
//! Runs the widget against a test backend instead of a real terminal, so
//! end-to-end flows can be driven from tests. Actions go in over a channel
//! and the rendered screen comes back after each frame.

use crate::app::App;
use crate::event::Action;
use crate::requests::Requests;
use crate::view;
use chatdock_engine::{AssistantClient, Config};
use ratatui::{backend::TestBackend, buffer::Buffer, layout::Rect, Terminal};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

/// Default terminal dimensions for headless mode.
pub const DEFAULT_WIDTH: u16 = 80;
pub const DEFAULT_HEIGHT: u16 = 24;

/// State captured from the headless widget after each render.
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug, Clone, Default)]
pub struct HeadlessState {
    /// Text contents of the terminal buffer.
    pub screen_contents: String,
    /// Whether the welcome banner is visible.
    pub welcome_visible: bool,
    /// Whether a request is outstanding.
    pub loading: bool,
    /// Number of request tasks still running.
    pub in_flight: usize,
    /// Whether the output panel is visible.
    pub output_visible: bool,
    /// Markup of the last output.
    pub markup: String,
    /// Current content of the input field.
    pub input: String,
    /// Whether the widget should quit.
    pub should_quit: bool,
}

/// Handle to control a headless widget.
pub struct HeadlessHandle {
    action_tx: mpsc::UnboundedSender<Action>,
    state_rx: watch::Receiver<HeadlessState>,
}

impl HeadlessHandle {
    /// Send an action. Returns `true` if the widget is still listening.
    pub fn send_action(&self, action: Action) -> bool {
        self.action_tx.send(action).is_ok()
    }

    /// Type `text` into the input field, one character at a time.
    pub fn type_text(&self, text: &str) -> bool {
        text.chars().all(|c| {
            let action = if c == '\n' {
                Action::Newline
            } else {
                Action::Insert(c)
            };
            self.send_action(action)
        })
    }

    /// Get the latest state.
    pub fn state(&self) -> HeadlessState {
        self.state_rx.borrow().clone()
    }

    /// Wait until `condition` holds, or `None` on timeout.
    pub async fn wait_for<F>(&mut self, condition: F, timeout: Duration) -> Option<HeadlessState>
    where
        F: Fn(&HeadlessState) -> bool,
    {
        let deadline = tokio::time::Instant::now() + timeout;

        loop {
            let state = self.state();
            if condition(&state) {
                return Some(state);
            }

            let remaining = deadline.saturating_duration_since(tokio::time::Instant::now());
            if remaining.is_zero() {
                return None;
            }

            match tokio::time::timeout(remaining, self.state_rx.changed()).await {
                Ok(Ok(())) => {}
                // Timed out, or the widget is gone.
                _ => return None,
            }
        }
    }

    /// Wait for `text` to appear on screen.
    pub async fn wait_for_text(&mut self, text: &str, timeout: Duration) -> Option<HeadlessState> {
        self.wait_for(|s| s.screen_contents.contains(text), timeout)
            .await
    }

    /// Check if the widget has quit.
    pub fn has_quit(&self) -> bool {
        self.state().should_quit
    }
}

/// Configuration for headless mode.
#[derive(Debug, Clone)]
pub struct HeadlessConfig {
    /// Terminal width.
    pub width: u16,
    /// Terminal height.
    pub height: u16,
    /// Tick rate in milliseconds.
    pub tick_rate_ms: u64,
}

impl Default for HeadlessConfig {
    fn default() -> Self {
        Self {
            width: DEFAULT_WIDTH,
            height: DEFAULT_HEIGHT,
            tick_rate_ms: 20,
        }
    }
}

/// Run the widget headless.
///
/// Returns a handle to drive it and the join handle of the background task.
///
/// # Example
///
/// ```ignore
/// let client = Arc::new(HttpAssistant::new(config.clone()));
/// let (mut handle, task) = run_widget_headless(&config, client, HeadlessConfig::default());
///
/// handle.type_text("top artists");
/// handle.send_action(Action::Submit);
/// handle.wait_for_text("Miles Davis", Duration::from_secs(2)).await;
///
/// handle.send_action(Action::Quit);
/// task.await.unwrap();
/// ```
pub fn run_widget_headless(
    config: &Config,
    client: Arc<dyn AssistantClient>,
    headless: HeadlessConfig,
) -> (HeadlessHandle, JoinHandle<Result<(), String>>) {
    let (action_tx, action_rx) = mpsc::unbounded_channel();
    let (state_tx, state_rx) = watch::channel(HeadlessState::default());

    let app = App::new(config, Rect::new(0, 0, headless.width, headless.height));

    let task = tokio::spawn(async move {
        run_headless_loop(app, client, headless, action_rx, state_tx)
            .await
            .map_err(|e| e.to_string())
    });

    let handle = HeadlessHandle {
        action_tx,
        state_rx,
    };

    (handle, task)
}

async fn run_headless_loop(
    mut app: App,
    client: Arc<dyn AssistantClient>,
    headless: HeadlessConfig,
    mut action_rx: mpsc::UnboundedReceiver<Action>,
    state_tx: watch::Sender<HeadlessState>,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let backend = TestBackend::new(headless.width, headless.height);
    let mut terminal = Terminal::new(backend)?;
    let mut requests = Requests::new(client);
    let tick_duration = Duration::from_millis(headless.tick_rate_ms);

    loop {
        terminal.draw(|frame| {
            let area = frame.area();
            view::render(&app, area, frame.buffer_mut());
        })?;

        let _ = state_tx.send(HeadlessState {
            screen_contents: buffer_to_string(terminal.backend().buffer()),
            welcome_visible: app.widget.welcome_visible,
            loading: app.is_loading(),
            in_flight: requests.len(),
            output_visible: app.widget.output_visible,
            markup: app.widget.markup.clone(),
            input: app.widget.input.content().to_string(),
            should_quit: app.should_quit,
        });

        if app.should_quit {
            break;
        }

        requests.collect_finished(&mut app).await;

        let action = tokio::select! {
            Some(action) = action_rx.recv() => action,
            () = tokio::time::sleep(tick_duration) => {
                app.tick();
                Action::None
            }
        };

        if let Some(submission) = app.handle_action(action) {
            requests.spawn(submission);
        }
    }

    requests.abort_all();
    Ok(())
}

/// Convert a terminal buffer to a string representation.
fn buffer_to_string(buffer: &Buffer) -> String {
    let area = buffer.area;
    let mut result = String::new();

    for y in area.y..area.y + area.height {
        for x in area.x..area.x + area.width {
            if let Some(cell) = buffer.cell((x, y)) {
                result.push_str(cell.symbol());
            }
        }
        while result.ends_with(' ') {
            result.pop();
        }
        result.push('\n');
    }

    if result.ends_with('\n') {
        result.pop();
    }

    result
}
