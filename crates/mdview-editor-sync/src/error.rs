//! Errors from the rendering collaborator.

use miette::Diagnostic;
use thiserror::Error;

/// A render request that did not produce a usable response.
#[derive(Error, Debug, Diagnostic)]
#[non_exhaustive]
pub enum RenderError {
    /// Connection failure, timeout or undecodable body.
    #[error("renderer unreachable: {0}")]
    #[diagnostic(code(mdview::render::http), help("is the renderer running at the configured endpoint?"))]
    Http(#[from] reqwest::Error),

    /// The renderer answered with a non-success status.
    #[error("renderer returned {code}: {reason}")]
    #[diagnostic(code(mdview::render::status))]
    Status { code: u16, reason: String },
}
