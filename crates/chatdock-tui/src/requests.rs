//! In-flight assistant requests.

use crate::app::App;
use chatdock_engine::{AssistantClient, RequestFailure, Submission, Ticket};
use std::sync::Arc;
use tokio::task::JoinHandle;
use tracing::debug;

type RequestHandle = JoinHandle<Result<String, RequestFailure>>;

/// Background request tasks, tagged with the ticket they answer.
pub struct Requests {
    client: Arc<dyn AssistantClient>,
    handles: Vec<(Ticket, RequestHandle)>,
}

impl Requests {
    /// Create an empty pool sending through `client`.
    pub fn new(client: Arc<dyn AssistantClient>) -> Self {
        Self {
            client,
            handles: Vec::new(),
        }
    }

    /// Number of requests still tracked.
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    /// Whether no request is tracked.
    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Spawn the request for `submission`, aborting any it supersedes.
    pub fn spawn(&mut self, submission: Submission) {
        for (ticket, handle) in self.handles.drain(..) {
            debug!(ticket = ticket.get(), "aborting superseded request");
            handle.abort();
        }

        let client = Arc::clone(&self.client);
        let Submission { ticket, input } = submission;
        let handle = tokio::spawn(async move { client.ask(&input).await });
        self.handles.push((ticket, handle));
    }

    /// Hand finished requests to the app. Returns whether any finished.
    pub async fn collect_finished(&mut self, app: &mut App) -> bool {
        let mut finished = Vec::new();
        for (i, (_, handle)) in self.handles.iter().enumerate() {
            if handle.is_finished() {
                finished.push(i);
            }
        }

        let any = !finished.is_empty();
        for i in finished.into_iter().rev() {
            let (ticket, handle) = self.handles.remove(i);
            let result = match handle.await {
                Ok(result) => result,
                Err(e) if e.is_cancelled() => continue,
                Err(e) => Err(RequestFailure::other(format!("request task failed: {e}"))),
            };
            app.complete(ticket, result);
        }
        any
    }

    /// Abort every tracked request.
    pub fn abort_all(&mut self) {
        for (_, handle) in self.handles.drain(..) {
            handle.abort();
        }
    }
}

impl Drop for Requests {
    fn drop(&mut self) {
        self.abort_all();
    }
}
