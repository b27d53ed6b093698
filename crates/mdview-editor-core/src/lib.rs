//! mdview-editor-core: Pure state machines for a live markdown editor.
//!
//! This crate provides:
//! - `TextBuffer` trait and the ropey-backed `EditorRope`
//! - `Document` with a monotonic `Version` and a single mutation entry point
//! - `History` snapshot undo/redo and `CursorTracker`
//! - `ScrollSync`, `LayoutState` and `FullscreenMode` transitions, combined in `UiState`
//! - Render wire types and the staleness rule for the preview
//!
//! Nothing here performs I/O beyond config files; the async driver lives in
//! `mdview-editor-sync`.

pub mod config;
pub mod cursor;
pub mod document;
pub mod error;
pub mod fullscreen;
pub mod history;
pub mod input;
pub mod layout;
pub mod render;
pub mod scroll;
pub mod state;
pub mod stats;
pub mod text;
pub mod types;

pub use config::{DEFAULT_MAX_IMPORT_BYTES, EditorConfig};
pub use cursor::{CursorPosition, CursorTracker};
pub use document::{Document, Mutation};
pub use error::{ConfigError, EditorError};
pub use fullscreen::{FullscreenEffect, FullscreenEvent, FullscreenMode, RELAYOUT_SETTLE_DELAY};
pub use history::History;
pub use input::{EditorCommand, Key, KeyCombo, Modifiers, command_for};
pub use layout::{
    ContainerRect, CursorStyle, DIVIDER_WIDTH, LayoutEffect, LayoutEvent, LayoutState,
    MAX_SPLIT_PERCENT, MIN_SPLIT_PERCENT, PaneWidths, SplitPercent,
};
pub use render::{
    ApplyOutcome, PreviewOutput, RenderRequest, RenderResponse, RenderResult, Theme, error_block,
};
pub use scroll::{
    Pane, SCROLL_SUPPRESS_WINDOW, ScrollEvent, ScrollMetrics, ScrollOutcome, ScrollSync,
    ViewportMapping,
};
pub use smol_str::SmolStr;
pub use state::{UiEffect, UiEvent, UiState};
pub use stats::{DocumentStats, PreviewStats};
pub use text::{EditorRope, TextBuffer};
pub use types::{EditInfo, EditOrigin, Selection, Version};
