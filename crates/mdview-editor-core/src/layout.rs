//! Split-pane layout and divider drag handling.
//!
//! The split is stored as the editor pane's share of the container, clamped to
//! a band that keeps both panes usable. Pointer moves during a drag are
//! coalesced through a single pending slot that is drained once per animation
//! frame, so a burst of moves produces one layout write.

use serde::{Deserialize, Serialize};

/// Narrowest editor share, in percent.
pub const MIN_SPLIT_PERCENT: f64 = 20.0;
/// Widest editor share, in percent.
pub const MAX_SPLIT_PERCENT: f64 = 80.0;
/// Split used when nothing else is configured.
pub const DEFAULT_SPLIT_PERCENT: f64 = 50.0;
/// Width taken by the divider: 8px of gutter on each side.
pub const DIVIDER_WIDTH: f64 = 16.0;

/// Editor share of the container width, always within
/// `[MIN_SPLIT_PERCENT, MAX_SPLIT_PERCENT]`.
#[derive(Clone, Copy, Debug, PartialEq, PartialOrd, Serialize, Deserialize)]
#[serde(from = "f64", into = "f64")]
pub struct SplitPercent(f64);

impl SplitPercent {
    /// Clamp a raw percentage into the usable band. NaN maps to the default.
    pub fn new(percent: f64) -> Self {
        if percent.is_nan() {
            return Self::default();
        }
        Self(percent.clamp(MIN_SPLIT_PERCENT, MAX_SPLIT_PERCENT))
    }

    pub fn get(self) -> f64 {
        self.0
    }
}

impl Default for SplitPercent {
    fn default() -> Self {
        Self(DEFAULT_SPLIT_PERCENT)
    }
}

impl From<f64> for SplitPercent {
    fn from(percent: f64) -> Self {
        Self::new(percent)
    }
}

impl From<SplitPercent> for f64 {
    fn from(split: SplitPercent) -> Self {
        split.0
    }
}

/// Horizontal extent of the split container, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ContainerRect {
    pub left: f64,
    pub width: f64,
}

impl ContainerRect {
    pub fn new(left: f64, width: f64) -> Self {
        Self { left, width }
    }

    /// Split for a pointer at `pointer_x`. None for a degenerate container.
    pub fn split_at(&self, pointer_x: f64) -> Option<SplitPercent> {
        if self.width.is_nan() || self.width <= 0.0 {
            return None;
        }
        Some(SplitPercent::new(
            (pointer_x - self.left) / self.width * 100.0,
        ))
    }
}

/// Concrete pane widths for a container.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PaneWidths {
    pub editor: f64,
    pub preview: f64,
}

impl PaneWidths {
    /// Split `container_width - divider` between the panes.
    ///
    /// The two widths always sum to the container width minus the divider
    /// (never negative).
    pub fn compute(container_width: f64, split: SplitPercent, divider: f64) -> Self {
        let usable = (container_width - divider).max(0.0);
        let editor = usable * split.get() / 100.0;
        Self {
            editor,
            preview: usable - editor,
        }
    }

    pub fn total(&self) -> f64 {
        self.editor + self.preview
    }
}

/// Mouse cursor affordance requested from the host.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CursorStyle {
    Default,
    ColumnResize,
}

/// Input to the layout state machine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutEvent {
    /// Pointer pressed on the divider.
    DragStart,
    /// Pointer moved anywhere in the document while dragging.
    PointerMove { x: f64, container: ContainerRect },
    /// The host's animation frame callback fired.
    AnimationFrame,
    /// Pointer released anywhere in the document.
    DragEnd,
}

/// Side effects the host must perform after a layout transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum LayoutEffect {
    /// Install document-level pointer move/up listeners.
    CapturePointer,
    /// Remove the listeners installed by `CapturePointer`.
    ReleasePointer,
    SetCursor(CursorStyle),
    /// Schedule one animation frame callback.
    RequestFrame,
    /// Drop the outstanding animation frame callback.
    CancelFrame,
    /// Write pane widths for this split.
    ApplySplit(SplitPercent),
}

#[derive(Clone, Copy, Debug, PartialEq)]
struct DragState {
    current: SplitPercent,
    pending_frame: Option<SplitPercent>,
}

/// Persisted split plus any in-progress drag.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LayoutState {
    split: SplitPercent,
    drag: Option<DragState>,
}

impl LayoutState {
    pub fn new(split: SplitPercent) -> Self {
        Self { split, drag: None }
    }

    /// The committed split. Does not change until a drag ends.
    pub fn split(&self) -> SplitPercent {
        self.split
    }

    /// The split currently shown: the drag position while dragging.
    pub fn live_split(&self) -> SplitPercent {
        self.drag.map(|d| d.current).unwrap_or(self.split)
    }

    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Pane widths for the committed split.
    pub fn widths(&self, container_width: f64) -> PaneWidths {
        PaneWidths::compute(container_width, self.split, DIVIDER_WIDTH)
    }

    /// Apply an event.
    #[must_use]
    pub fn transition(self, event: LayoutEvent) -> (Self, Vec<LayoutEffect>) {
        match (event, self.drag) {
            (LayoutEvent::DragStart, None) => {
                tracing::debug!(split = self.split.get(), "divider drag started");
                let next = Self {
                    drag: Some(DragState {
                        current: self.split,
                        pending_frame: None,
                    }),
                    ..self
                };
                (
                    next,
                    vec![
                        LayoutEffect::CapturePointer,
                        LayoutEffect::SetCursor(CursorStyle::ColumnResize),
                    ],
                )
            }
            (LayoutEvent::PointerMove { x, container }, Some(mut drag)) => {
                let Some(split) = container.split_at(x) else {
                    return (self, Vec::new());
                };
                let needs_frame = drag.pending_frame.is_none();
                drag.current = split;
                drag.pending_frame = Some(split);
                let effects = if needs_frame {
                    vec![LayoutEffect::RequestFrame]
                } else {
                    Vec::new()
                };
                (
                    Self {
                        drag: Some(drag),
                        ..self
                    },
                    effects,
                )
            }
            (LayoutEvent::AnimationFrame, Some(mut drag)) => match drag.pending_frame.take() {
                Some(split) => (
                    Self {
                        drag: Some(drag),
                        ..self
                    },
                    vec![LayoutEffect::ApplySplit(split)],
                ),
                None => (self, Vec::new()),
            },
            (LayoutEvent::DragEnd, Some(drag)) => {
                tracing::debug!(split = drag.current.get(), "divider drag committed");
                let mut effects = Vec::with_capacity(4);
                if drag.pending_frame.is_some() {
                    effects.push(LayoutEffect::CancelFrame);
                }
                effects.push(LayoutEffect::ReleasePointer);
                effects.push(LayoutEffect::SetCursor(CursorStyle::Default));
                effects.push(LayoutEffect::ApplySplit(drag.current));
                (
                    Self {
                        split: drag.current,
                        drag: None,
                    },
                    effects,
                )
            }
            // Moves, frames and releases outside a drag, or a second press.
            _ => (self, Vec::new()),
        }
    }
}
