//! mdview-editor-sync: the async half of the mdview editor.
//!
//! Wraps the pure state machines of `mdview-editor-core` in an
//! [`EditorSession`] that debounces render requests, applies their results
//! under the staleness rule, runs settle timers, and handles file import,
//! export and clipboard copies.

pub mod clipboard;
pub mod error;
pub mod export;
pub mod import;
pub mod renderer;
pub mod scheduler;
pub mod session;

#[cfg(test)]
mod testing;

pub use clipboard::{ClipboardPlatform, CopyFeedback, CopyTarget};
pub use error::RenderError;
pub use export::{
    Artifact, ArtifactConverter, ExportFormat, ExportInput, Exporters, MarkdownExporter,
};
pub use import::{read_bounded, read_markdown_file};
pub use renderer::{HttpRenderer, Renderer};
pub use scheduler::ConversionScheduler;
pub use session::{EditorSession, SessionEvent, SessionUpdate};
