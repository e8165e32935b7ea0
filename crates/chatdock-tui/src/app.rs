//! Application state and update logic for the chatdock TUI.

use crate::event::Action;
use crate::ui::widgets::TextInputState;
use crate::ui::{input_text_width, widget_layout, WidgetLayout};
use crate::widgets::OutputPanel;
use chatdock_engine::{
    save_png, ChatController, ChatSurface, Config, KeyPolicy, Output, Payload, RequestFailure,
    Submission, Ticket,
};
use crossterm::event::{MouseButton, MouseEvent, MouseEventKind};
use ratatui::layout::{Position, Rect};
use std::path::PathBuf;
use tracing::{info, warn};

/// Lines scrolled per scroll action.
const SCROLL_STEP: u16 = 3;

/// Visible state of the widget's surfaces.
///
/// This is what the controller drives through [`ChatSurface`].
#[allow(clippy::struct_excessive_bools)]
#[derive(Debug)]
pub struct WidgetState {
    /// Input field.
    pub input: TextInputState,
    /// Whether the welcome banner is visible.
    pub welcome_visible: bool,
    /// Whether the loading indicator is visible.
    pub loading_visible: bool,
    /// Whether the output panel is visible.
    pub output_visible: bool,
    /// Output of the last completed request.
    pub output: Option<Output>,
    /// Markup written into the output panel.
    pub markup: String,
    /// Note about an exported image (path or export error).
    pub image_note: Option<String>,
    /// Whether `image_note` reports a failure.
    pub image_note_is_error: bool,
    /// Scroll offset of the output panel.
    pub output_scroll: u16,
    /// Directory for exported images.
    image_dir: Option<PathBuf>,
}

impl WidgetState {
    fn new(image_dir: Option<PathBuf>) -> Self {
        Self {
            input: TextInputState::new(),
            welcome_visible: true,
            loading_visible: false,
            output_visible: false,
            output: None,
            markup: String::new(),
            image_note: None,
            image_note_is_error: false,
            output_scroll: 0,
            image_dir,
        }
    }

    fn export_image(&mut self, uri: &str) {
        let Some(dir) = &self.image_dir else {
            return;
        };
        match save_png(dir, uri) {
            Ok(path) => {
                info!(path = %path.display(), "saved chart image");
                self.image_note = Some(format!("saved to {}", path.display()));
                self.image_note_is_error = false;
            }
            Err(e) => {
                warn!(error = %e, "failed to save chart image");
                self.image_note = Some(format!("could not save image: {e}"));
                self.image_note_is_error = true;
            }
        }
    }
}

impl ChatSurface for WidgetState {
    fn clear_input(&mut self) {
        self.input.clear();
    }

    fn hide_welcome(&mut self) {
        self.welcome_visible = false;
    }

    fn show_loading(&mut self) {
        self.output_visible = false;
        self.loading_visible = true;
    }

    fn show_output(&mut self, output: &Output) {
        self.markup = output.markup();
        self.image_note = None;
        self.image_note_is_error = false;
        self.output_scroll = 0;
        if let Output::Payload(Payload::Image(uri)) = output {
            self.export_image(uri);
        }
        self.output = Some(output.clone());
    }

    fn show_result(&mut self) {
        self.loading_visible = false;
        self.output_visible = true;
    }
}

/// Application state.
#[derive(Debug)]
pub struct App {
    /// Whether the app should quit.
    pub should_quit: bool,

    /// Surfaces driven by the controller.
    pub widget: WidgetState,

    /// Request cycle controller.
    pub controller: ChatController,

    /// Enter-to-submit policy.
    pub key_policy: KeyPolicy,

    /// Viewport width in pixels, if the terminal reports it.
    pub viewport_width_px: Option<u32>,

    /// Whether the terminal reports Shift on Enter, so Shift+Enter inserts
    /// a newline.
    pub shift_enter_newline: bool,

    /// Terminal area the widget is laid out in.
    pub area: Rect,

    /// Endpoint shown in the status bar.
    pub endpoint: String,

    /// Animation frame counter.
    pub tick: usize,
}

impl App {
    /// Create a new app instance.
    pub fn new(config: &Config, area: Rect) -> Self {
        Self {
            should_quit: false,
            widget: WidgetState::new(config.image_dir.clone()),
            controller: ChatController::new(),
            key_policy: config.key_policy(),
            viewport_width_px: None,
            shift_enter_newline: false,
            area,
            endpoint: format!(
                "{}{}",
                config.base_url.trim_end_matches('/'),
                config.endpoint_path
            ),
            tick: 0,
        }
    }

    /// Whether a request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.controller.is_loading()
    }

    /// Current layout of the widget.
    pub fn layout(&self) -> WidgetLayout {
        widget_layout(self.area, self.widget.input.height())
    }

    /// Advance animations.
    pub fn tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
    }

    /// Handle a terminal resize.
    pub fn resize(&mut self, width: u16, height: u16, viewport_width_px: Option<u32>) {
        self.area = Rect::new(0, 0, width, height);
        self.viewport_width_px = viewport_width_px;
        self.input_changed();
        self.widget.output_scroll = self.widget.output_scroll.min(self.max_output_scroll());
    }

    /// Handle an action.
    ///
    /// Returns the submission to send when the action started a request.
    pub fn handle_action(&mut self, action: Action) -> Option<Submission> {
        match action {
            Action::Quit => self.should_quit = true,
            Action::Submit => return self.submit(),
            Action::Insert(c) => {
                self.widget.input.insert(c);
                self.input_changed();
            }
            Action::Newline => {
                self.widget.input.insert('\n');
                self.input_changed();
            }
            Action::Backspace => {
                self.widget.input.backspace();
                self.input_changed();
            }
            Action::Delete => {
                self.widget.input.delete();
                self.input_changed();
            }
            Action::Left => self.widget.input.move_left(),
            Action::Right => self.widget.input.move_right(),
            Action::Home => self.widget.input.move_home(),
            Action::End => self.widget.input.move_end(),
            Action::ScrollUp => {
                self.widget.output_scroll = self.widget.output_scroll.saturating_sub(SCROLL_STEP);
            }
            Action::ScrollDown => {
                self.widget.output_scroll = self
                    .widget
                    .output_scroll
                    .saturating_add(SCROLL_STEP)
                    .min(self.max_output_scroll());
            }
            Action::None => {}
        }
        None
    }

    /// Translate a mouse event into an action.
    pub fn mouse_action(&self, mouse: MouseEvent) -> Action {
        match mouse.kind {
            MouseEventKind::Down(MouseButton::Left)
                if self.layout().send.contains(Position::new(mouse.column, mouse.row)) =>
            {
                Action::Submit
            }
            MouseEventKind::ScrollUp => Action::ScrollUp,
            MouseEventKind::ScrollDown => Action::ScrollDown,
            _ => Action::None,
        }
    }

    /// Start a request cycle with the current input.
    pub fn submit(&mut self) -> Option<Submission> {
        let raw = self.widget.input.content().to_string();
        self.controller.begin(&mut self.widget, &raw)
    }

    /// Finish a request cycle.
    ///
    /// Returns `false` when the response was stale and ignored.
    pub fn complete(&mut self, ticket: Ticket, result: Result<String, RequestFailure>) -> bool {
        self.controller.complete(&mut self.widget, ticket, result)
    }

    fn max_output_scroll(&self) -> u16 {
        let widget = &self.widget;
        OutputPanel::new(widget.output.as_ref())
            .image_note(widget.image_note.as_deref(), widget.image_note_is_error)
            .max_scroll(self.layout().panel)
    }

    /// Grow or shrink the input field to fit its content.
    fn input_changed(&mut self) {
        let width = input_text_width(self.area);
        self.widget.input.fit_to_content(width);
    }
}
