//! Fullscreen mode for the editor and preview panes.
//!
//! A single three-state mode replaces two independent flags, so "both panes
//! fullscreen" cannot be represented.

use std::time::Duration;

use crate::input::Key;

/// Delay before the relayout signal fires after the editor enters or leaves
/// fullscreen, so measurements see the final dimensions.
pub const RELAYOUT_SETTLE_DELAY: Duration = Duration::from_millis(300);

/// Which pane, if any, fills the window.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum FullscreenMode {
    #[default]
    Normal,
    EditorFullscreen,
    PreviewFullscreen,
}

/// Input to the fullscreen state machine.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FullscreenEvent {
    ToggleEditor,
    TogglePreview,
    /// A key press; only Escape is acted upon.
    Key(Key),
}

/// Side effects the host must perform after a fullscreen transition.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FullscreenEffect {
    /// Emit a relayout signal once the delay has elapsed, replacing any
    /// pending one.
    ScheduleRelayout(Duration),
}

impl FullscreenMode {
    pub fn is_editor_fullscreen(self) -> bool {
        self == Self::EditorFullscreen
    }

    pub fn is_preview_fullscreen(self) -> bool {
        self == Self::PreviewFullscreen
    }

    pub fn is_fullscreen(self) -> bool {
        self != Self::Normal
    }

    /// Whether the editor pane is shown.
    pub fn editor_visible(self) -> bool {
        self != Self::PreviewFullscreen
    }

    /// Whether the preview pane (and the divider) is shown.
    pub fn preview_visible(self) -> bool {
        self != Self::EditorFullscreen
    }

    /// Apply an event, returning the new mode and an optional effect.
    #[must_use]
    pub fn transition(self, event: &FullscreenEvent) -> (Self, Option<FullscreenEffect>) {
        let next = match (event, self) {
            (FullscreenEvent::ToggleEditor, Self::EditorFullscreen) => Self::Normal,
            (FullscreenEvent::ToggleEditor, _) => Self::EditorFullscreen,
            (FullscreenEvent::TogglePreview, Self::PreviewFullscreen) => Self::Normal,
            (FullscreenEvent::TogglePreview, _) => Self::PreviewFullscreen,
            (FullscreenEvent::Key(Key::Escape), _) => Self::Normal,
            (FullscreenEvent::Key(_), current) => current,
        };

        if next == self {
            return (self, None);
        }

        tracing::debug!(from = ?self, to = ?next, "fullscreen mode changed");
        let effect = (self.is_editor_fullscreen() || next.is_editor_fullscreen())
            .then_some(FullscreenEffect::ScheduleRelayout(RELAYOUT_SETTLE_DELAY));
        (next, effect)
    }
}
