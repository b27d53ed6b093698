//! Render results and the displayed preview.
//!
//! Markdown is rendered by an external service. This module holds the wire
//! types for that boundary and the staleness rule that decides whether an
//! arriving result may replace what is currently displayed.

use std::fmt;

use pulldown_cmark_escape::escape_html;
use serde::{Deserialize, Serialize};

use crate::types::Version;

/// Preview colour scheme passed to the renderer.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl fmt::Display for Theme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Theme::Light => f.write_str("light"),
            Theme::Dark => f.write_str("dark"),
        }
    }
}

/// Body of a render request.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderRequest {
    pub content: String,
    pub theme: Theme,
}

/// Body of a render response.
///
/// Success carries `html`; failure carries `error` and possibly partial `html`.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderResponse {
    #[serde(default)]
    pub html: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Outcome of one render request, tagged with the version it was issued for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderResult {
    pub html: String,
    pub for_version: Version,
    pub error: Option<String>,
}

impl RenderResult {
    /// A successful render.
    pub fn rendered(for_version: Version, html: impl Into<String>) -> Self {
        Self {
            html: html.into(),
            for_version,
            error: None,
        }
    }

    /// A failed render. The html is the inline error block.
    pub fn failed(for_version: Version, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            html: error_block(&message),
            for_version,
            error: Some(message),
        }
    }

    /// Interpret a decoded response body.
    ///
    /// A non-empty `error` field wins over any html sent alongside it. An
    /// empty one is treated as absent.
    pub fn from_response(for_version: Version, response: RenderResponse) -> Self {
        match response {
            RenderResponse {
                error: Some(message),
                ..
            } if !message.is_empty() => Self::failed(for_version, message),
            RenderResponse { html, .. } => Self::rendered(for_version, html.unwrap_or_default()),
        }
    }

    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Inline error markup shown in place of the preview.
pub fn error_block(message: &str) -> String {
    let mut out = String::with_capacity(message.len() + 48);
    out.push_str("<p class=\"render-error\" style=\"color:red\">Error: ");
    // Writing into a String cannot fail.
    let _ = escape_html(&mut out, message);
    out.push_str("</p>");
    out
}

/// What the preview pane currently shows.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub enum PreviewOutput {
    /// Nothing rendered yet.
    #[default]
    Empty,
    Rendered { html: String, version: Version },
    Failed {
        message: String,
        html: String,
        version: Version,
    },
}

/// Whether an arriving result was displayed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// The document moved on; the result was dropped.
    Stale { result: Version, current: Version },
}

impl PreviewOutput {
    /// Markup to display.
    pub fn html(&self) -> &str {
        match self {
            Self::Empty => "",
            Self::Rendered { html, .. } | Self::Failed { html, .. } => html,
        }
    }

    /// Version of the document the displayed markup was rendered from.
    pub fn version(&self) -> Option<Version> {
        match self {
            Self::Empty => None,
            Self::Rendered { version, .. } | Self::Failed { version, .. } => Some(*version),
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Failed { message, .. } => Some(message),
            _ => None,
        }
    }

    /// Replace the displayed output with `result` if it belongs to `current`.
    pub fn apply(&mut self, result: RenderResult, current: Version) -> ApplyOutcome {
        if result.for_version != current {
            tracing::debug!(
                result = %result.for_version,
                current = %current,
                "discarding stale render result"
            );
            return ApplyOutcome::Stale {
                result: result.for_version,
                current,
            };
        }

        *self = match result.error {
            Some(message) => Self::Failed {
                message,
                html: result.html,
                version: result.for_version,
            },
            None => Self::Rendered {
                html: result.html,
                version: result.for_version,
            },
        };
        ApplyOutcome::Applied
    }
}
