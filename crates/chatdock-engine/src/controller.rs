//! Chat widget controller.
//!
//! Turns a submit gesture into one outbound request and the response into
//! output on a [`ChatSurface`]. A request cycle is split in two halves so a
//! UI event loop can run the request on its own task:
//!
//! - [`ChatController::begin`] validates input and flips the surface into
//!   the loading state, handing back a [`Submission`];
//! - [`ChatController::complete`] renders the result and flips the surface
//!   back.
//!
//! [`ChatController::submit`] runs both halves around an awaited request.
//!
//! Overlapping submissions: the latest one wins. Every submission carries a
//! [`Ticket`]; completing anything but the newest ticket is a no-op.

use tracing::debug;

use crate::client::{AssistantClient, RequestFailure};
use crate::input::normalize_input;
use crate::payload::Output;

/// The UI capabilities the controller drives.
pub trait ChatSurface {
    /// Empty the input field and reset it to its single-line height.
    fn clear_input(&mut self);

    /// Hide the welcome banner.
    fn hide_welcome(&mut self);

    /// Hide the output panel and show the loading indicator.
    fn show_loading(&mut self);

    /// Write `output` into the output panel without changing visibility.
    fn show_output(&mut self, output: &Output);

    /// Make the output panel visible and hide the loading indicator.
    fn show_result(&mut self);
}

/// Sequence number of a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Ticket(u64);

impl Ticket {
    /// Raw sequence number.
    pub fn get(self) -> u64 {
        self.0
    }
}

/// A validated submission waiting for its response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Submission {
    /// Ticket to hand back to [`ChatController::complete`].
    pub ticket: Ticket,
    /// Trimmed input to send.
    pub input: String,
}

/// Runs `show_result` on every exit path, unwinding included.
struct ResultGuard<'a, S: ChatSurface + ?Sized> {
    surface: &'a mut S,
}

impl<S: ChatSurface + ?Sized> Drop for ResultGuard<'_, S> {
    fn drop(&mut self) {
        self.surface.show_result();
    }
}

/// Request/response/render cycle for one widget.
#[derive(Debug, Default)]
pub struct ChatController {
    next_ticket: u64,
    pending: Option<Ticket>,
}

impl ChatController {
    /// Create a controller with no request outstanding.
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether a request is outstanding.
    pub fn is_loading(&self) -> bool {
        self.pending.is_some()
    }

    /// Ticket of the outstanding request, if any.
    pub fn pending(&self) -> Option<Ticket> {
        self.pending
    }

    /// Start a request cycle.
    ///
    /// Returns `None` and leaves the surface untouched when `raw` is blank.
    pub fn begin<S: ChatSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        raw: &str,
    ) -> Option<Submission> {
        let input = normalize_input(raw)?;

        self.next_ticket += 1;
        let ticket = Ticket(self.next_ticket);
        if let Some(previous) = self.pending.replace(ticket) {
            debug!(
                previous = previous.get(),
                ticket = ticket.get(),
                "superseding in-flight request"
            );
        }

        surface.clear_input();
        surface.hide_welcome();
        surface.show_loading();

        Some(Submission { ticket, input })
    }

    /// Finish a request cycle.
    ///
    /// Returns `false` when `ticket` has been superseded, in which case the
    /// surface is not touched.
    pub fn complete<S: ChatSurface + ?Sized>(
        &mut self,
        surface: &mut S,
        ticket: Ticket,
        result: Result<String, RequestFailure>,
    ) -> bool {
        if self.pending != Some(ticket) {
            debug!(ticket = ticket.get(), "dropping stale response");
            return false;
        }
        self.pending = None;

        let guard = ResultGuard { surface };
        let output = match result {
            Ok(body) => Output::from_body(body),
            Err(e) => Output::error(e.to_string()),
        };
        guard.surface.show_output(&output);
        true
    }

    /// Run a whole cycle: begin, await the request, complete.
    ///
    /// Returns `false` when the input was blank and nothing was sent.
    pub async fn submit<C, S>(&mut self, client: &C, surface: &mut S, raw: &str) -> bool
    where
        C: AssistantClient + ?Sized,
        S: ChatSurface + ?Sized,
    {
        let Some(submission) = self.begin(surface, raw) else {
            return false;
        };
        let result = client.ask(&submission.input).await;
        self.complete(surface, submission.ticket, result);
        true
    }
}
