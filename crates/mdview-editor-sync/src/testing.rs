//! Test doubles shared by the session and scheduler tests.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use mdview_editor_core::{RenderRequest, RenderResponse};

use crate::error::RenderError;
use crate::renderer::Renderer;

#[derive(Clone, Debug)]
pub(crate) enum Failure {
    /// Respond with an `error` field.
    Field(String),
    /// Respond with a non-success status.
    Status(u16),
}

/// Renders `content` as `<p>{content}</p>` after a per-content delay.
#[derive(Clone, Default)]
pub(crate) struct FakeRenderer {
    requests: Arc<Mutex<Vec<RenderRequest>>>,
    delays: HashMap<String, Duration>,
    failures: HashMap<String, Failure>,
}

impl FakeRenderer {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn with_delay(mut self, content: &str, delay: Duration) -> Self {
        self.delays.insert(content.to_owned(), delay);
        self
    }

    pub(crate) fn failing_on(mut self, content: &str, failure: Failure) -> Self {
        self.failures.insert(content.to_owned(), failure);
        self
    }

    /// Every request received so far, in arrival order.
    pub(crate) fn requests(&self) -> Vec<RenderRequest> {
        self.requests.lock().unwrap().clone()
    }
}

impl Renderer for FakeRenderer {
    async fn render(&self, request: RenderRequest) -> Result<RenderResponse, RenderError> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delays.get(&request.content).copied() {
            tokio::time::sleep(delay).await;
        }
        match self.failures.get(&request.content) {
            Some(Failure::Field(message)) => Ok(RenderResponse {
                html: None,
                error: Some(message.clone()),
            }),
            Some(Failure::Status(code)) => Err(RenderError::Status {
                code: *code,
                reason: "Service Unavailable".into(),
            }),
            None => Ok(RenderResponse {
                html: Some(format!("<p>{}</p>", request.content)),
                error: None,
            }),
        }
    }
}
