//! Combined UI state.
//!
//! Layout, fullscreen and scroll mirroring are held in one immutable
//! [`UiState`] that is replaced wholesale per event.

use crate::fullscreen::{FullscreenEffect, FullscreenEvent, FullscreenMode};
use crate::layout::{DIVIDER_WIDTH, LayoutEffect, LayoutEvent, LayoutState, PaneWidths};
use crate::scroll::{ScrollEvent, ScrollMetrics, ScrollOutcome, ScrollSync};

use web_time::Instant;

/// Everything the panes need to know to draw themselves.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct UiState {
    pub layout: LayoutState,
    pub fullscreen: FullscreenMode,
    pub scroll: ScrollSync,
}

/// Input to [`UiState::apply`].
#[derive(Clone, Debug, PartialEq)]
pub enum UiEvent {
    Layout(LayoutEvent),
    Fullscreen(FullscreenEvent),
    Scroll(ScrollEvent),
    SetSyncScroll {
        enabled: bool,
        editor: ScrollMetrics,
        preview: ScrollMetrics,
        at: Instant,
    },
}

/// Work for the host after a UI transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum UiEffect {
    Layout(LayoutEffect),
    Fullscreen(FullscreenEffect),
    Scroll(ScrollOutcome),
}

impl UiState {
    pub fn new(layout: LayoutState, scroll: ScrollSync) -> Self {
        Self {
            layout,
            fullscreen: FullscreenMode::Normal,
            scroll,
        }
    }

    /// Widths of the visible panes. A fullscreen pane gets the whole
    /// container and the hidden one gets nothing.
    pub fn visible_widths(&self, container_width: f64) -> PaneWidths {
        let full = container_width.max(0.0);
        match self.fullscreen {
            FullscreenMode::EditorFullscreen => PaneWidths {
                editor: full,
                preview: 0.0,
            },
            FullscreenMode::PreviewFullscreen => PaneWidths {
                editor: 0.0,
                preview: full,
            },
            FullscreenMode::Normal => {
                PaneWidths::compute(container_width, self.layout.live_split(), DIVIDER_WIDTH)
            }
        }
    }

    /// Apply one event.
    #[must_use]
    pub fn apply(self, event: UiEvent) -> (Self, Vec<UiEffect>) {
        match event {
            UiEvent::Layout(event) => {
                let (layout, effects) = self.layout.transition(event);
                (
                    Self { layout, ..self },
                    effects.into_iter().map(UiEffect::Layout).collect(),
                )
            }
            UiEvent::Fullscreen(event) => {
                let (fullscreen, effect) = self.fullscreen.transition(&event);
                (
                    Self { fullscreen, ..self },
                    effect.into_iter().map(UiEffect::Fullscreen).collect(),
                )
            }
            UiEvent::Scroll(event) => {
                let (scroll, outcome) = self.scroll.on_scroll(event);
                (Self { scroll, ..self }, vec![UiEffect::Scroll(outcome)])
            }
            UiEvent::SetSyncScroll {
                enabled,
                editor,
                preview,
                at,
            } => {
                let was_enabled = self.scroll.is_enabled();
                let scroll = self.scroll.set_enabled(enabled);
                if enabled && !was_enabled {
                    let (scroll, outcome) = scroll.realign(editor, preview, at);
                    (Self { scroll, ..self }, vec![UiEffect::Scroll(outcome)])
                } else {
                    (Self { scroll, ..self }, Vec::new())
                }
            }
        }
    }
}
