//! Debounced render scheduling.
//!
//! The scheduler is a small actor task. Edits restart a quiet-period timer;
//! when it fires, the latest text is sent to the [`Renderer`] on its own task
//! so slow responses never block later requests. Responses are not cancelled:
//! each one is tagged with the version it was issued for and the receiver
//! decides whether it is still current.

use std::sync::Arc;
use std::time::Duration;

use mdview_editor_core::{RenderRequest, RenderResult, Theme, Version};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::Instant;

use crate::renderer::Renderer;

#[derive(Debug)]
enum SchedulerInput {
    Edit { content: String, version: Version },
    SetTheme(Theme),
    Flush,
}

struct Pending {
    content: String,
    version: Version,
    deadline: Instant,
}

/// Handle to the scheduling task. Dropping it stops the task; requests
/// already in flight still deliver their results.
pub struct ConversionScheduler {
    tx: mpsc::UnboundedSender<SchedulerInput>,
    task: JoinHandle<()>,
}

impl ConversionScheduler {
    /// Spawn the scheduling task. Results are delivered on `results`.
    pub fn spawn<R: Renderer>(
        renderer: Arc<R>,
        theme: Theme,
        debounce: Duration,
        results: mpsc::UnboundedSender<RenderResult>,
    ) -> Self {
        let (tx, rx) = mpsc::unbounded_channel();
        let task = tokio::spawn(run(renderer, theme, debounce, rx, results));
        Self { tx, task }
    }

    /// Replace the pending text and restart the quiet period.
    pub fn schedule(&self, content: String, version: Version) {
        self.send(SchedulerInput::Edit { content, version });
    }

    /// Theme for requests issued from now on.
    pub fn set_theme(&self, theme: Theme) {
        self.send(SchedulerInput::SetTheme(theme));
    }

    /// Issue the pending request without waiting for the quiet period.
    pub fn flush(&self) {
        self.send(SchedulerInput::Flush);
    }

    fn send(&self, input: SchedulerInput) {
        if self.tx.send(input).is_err() {
            tracing::warn!("render scheduler has stopped; input dropped");
        }
    }
}

impl Drop for ConversionScheduler {
    fn drop(&mut self) {
        self.task.abort();
    }
}

async fn run<R: Renderer>(
    renderer: Arc<R>,
    mut theme: Theme,
    debounce: Duration,
    mut input: mpsc::UnboundedReceiver<SchedulerInput>,
    results: mpsc::UnboundedSender<RenderResult>,
) {
    let mut pending: Option<Pending> = None;

    loop {
        let deadline = pending.as_ref().map(|p| p.deadline);
        tokio::select! {
            msg = input.recv() => match msg {
                Some(SchedulerInput::Edit { content, version }) => {
                    pending = Some(Pending {
                        content,
                        version,
                        deadline: Instant::now() + debounce,
                    });
                }
                Some(SchedulerInput::SetTheme(next)) => theme = next,
                Some(SchedulerInput::Flush) => {
                    if let Some(p) = pending.take() {
                        issue(&renderer, p, theme, &results);
                    }
                }
                None => break,
            },
            _ = tokio::time::sleep_until(deadline.unwrap_or_else(Instant::now)), if deadline.is_some() => {
                if let Some(p) = pending.take() {
                    issue(&renderer, p, theme, &results);
                }
            }
        }
    }

    tracing::debug!("render scheduler stopped");
}

fn issue<R: Renderer>(
    renderer: &Arc<R>,
    pending: Pending,
    theme: Theme,
    results: &mpsc::UnboundedSender<RenderResult>,
) {
    let Pending {
        content, version, ..
    } = pending;
    tracing::debug!(version = %version, len = content.len(), %theme, "issuing render request");

    let renderer = Arc::clone(renderer);
    let results = results.clone();
    tokio::spawn(async move {
        let request = RenderRequest { content, theme };
        let result = match renderer.render(request).await {
            Ok(response) => RenderResult::from_response(version, response),
            Err(err) => {
                tracing::warn!(version = %version, error = %err, "render request failed");
                RenderResult::failed(version, err.to_string())
            }
        };
        if results.send(result).is_err() {
            tracing::trace!(version = %version, "render result dropped: session closed");
        }
    });
}
