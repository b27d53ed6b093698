//! The rendering collaborator.
//!
//! Markdown-to-HTML conversion happens outside this crate. [`Renderer`] is the
//! request/response seam; [`HttpRenderer`] talks to the conversion service
//! over HTTP.

use std::future::Future;

use mdview_editor_core::{RenderRequest, RenderResponse};

use crate::error::RenderError;

/// Converts markdown to HTML.
///
/// A response with an `error` field is a successful round trip that reports a
/// rendering failure; `Err` is reserved for transport problems.
pub trait Renderer: Send + Sync + 'static {
    fn render(
        &self,
        request: RenderRequest,
    ) -> impl Future<Output = Result<RenderResponse, RenderError>> + Send;
}

/// Renderer backed by `POST {endpoint}/api/convert`.
#[derive(Debug, Clone)]
pub struct HttpRenderer {
    client: reqwest::Client,
    endpoint: String,
}

impl HttpRenderer {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self::with_client(reqwest::Client::new(), endpoint)
    }

    pub fn with_client(client: reqwest::Client, endpoint: impl Into<String>) -> Self {
        Self {
            client,
            endpoint: endpoint.into(),
        }
    }

    /// Full URL of the conversion endpoint.
    pub fn convert_url(&self) -> String {
        format!("{}/api/convert", self.endpoint.trim_end_matches('/'))
    }
}

impl Renderer for HttpRenderer {
    async fn render(&self, request: RenderRequest) -> Result<RenderResponse, RenderError> {
        let response = self
            .client
            .post(self.convert_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            // Prefer the service's own message when the body carries one.
            let reason = match response.json::<RenderResponse>().await {
                Ok(RenderResponse {
                    error: Some(message),
                    ..
                }) if !message.is_empty() => message,
                _ => status.canonical_reason().unwrap_or("unknown status").to_owned(),
            };
            return Err(RenderError::Status {
                code: status.as_u16(),
                reason,
            });
        }

        Ok(response.json::<RenderResponse>().await?)
    }
}
