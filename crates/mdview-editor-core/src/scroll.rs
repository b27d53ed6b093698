//! Proportional scroll mirroring from the editor pane into the preview pane.
//!
//! The coordinator is a small value type: every scroll event produces a new
//! coordinator and an outcome telling the host what (if anything) to write.

use std::time::Duration;

use web_time::Instant;

/// Default window during which scroll events are treated as echoes of a
/// programmatic preview scroll.
pub const SCROLL_SUPPRESS_WINDOW: Duration = Duration::from_millis(50);

/// The two scrollable panes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Pane {
    Editor,
    Preview,
}

/// Scroll geometry of one pane, in pixels.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ScrollMetrics {
    pub scroll_top: f64,
    pub scroll_height: f64,
    pub client_height: f64,
}

impl ScrollMetrics {
    pub fn new(scroll_top: f64, scroll_height: f64, client_height: f64) -> Self {
        Self {
            scroll_top,
            scroll_height,
            client_height,
        }
    }

    /// Distance the pane can scroll. Zero when the content fits.
    pub fn scrollable_range(&self) -> f64 {
        (self.scroll_height - self.client_height).max(0.0)
    }

    /// Scroll position as a fraction of the scrollable range, in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        let range = self.scrollable_range();
        if range <= 0.0 {
            return 0.0;
        }
        (self.scroll_top / range).clamp(0.0, 1.0)
    }

    /// Scroll top that puts this pane at `ratio` of its range.
    pub fn offset_for_ratio(&self, ratio: f64) -> f64 {
        ratio.clamp(0.0, 1.0) * self.scrollable_range()
    }
}

/// Derived mapping for one editor scroll event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportMapping {
    pub source_scroll_ratio: f64,
}

/// A scroll event from either pane, with the geometry of both.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollEvent {
    pub pane: Pane,
    pub editor: ScrollMetrics,
    pub preview: ScrollMetrics,
    pub at: Instant,
}

/// What the host should do in response to a scroll event.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum ScrollOutcome {
    /// Set the preview's scroll top.
    Mirror {
        mapping: ViewportMapping,
        preview_scroll_top: f64,
    },
    /// Sync is off; the event only scrolls its own pane.
    Disabled,
    /// The editor did not actually move since the last mirror.
    Unchanged,
    /// Echo of our own programmatic scroll.
    Suppressed,
    /// The user scrolled the preview directly.
    Manual,
}

/// Scroll mirroring state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollSync {
    enabled: bool,
    last_editor_top: Option<f64>,
    suppress_until: Option<Instant>,
    window: Duration,
}

impl Default for ScrollSync {
    fn default() -> Self {
        Self::new(true)
    }
}

impl ScrollSync {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            last_editor_top: None,
            suppress_until: None,
            window: SCROLL_SUPPRESS_WINDOW,
        }
    }

    /// Use a different suppression window.
    #[must_use]
    pub fn with_window(mut self, window: Duration) -> Self {
        self.window = window;
        self
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Turn mirroring on or off. Manual scrolling is unaffected either way.
    #[must_use]
    pub fn set_enabled(mut self, enabled: bool) -> Self {
        self.enabled = enabled;
        if !enabled {
            self.suppress_until = None;
        }
        self
    }

    fn is_suppressed(&self, at: Instant) -> bool {
        self.suppress_until.is_some_and(|until| at < until)
    }

    fn mirror(mut self, editor: ScrollMetrics, preview: ScrollMetrics, at: Instant) -> (Self, ScrollOutcome) {
        let mapping = ViewportMapping {
            source_scroll_ratio: editor.ratio(),
        };
        let preview_scroll_top = preview.offset_for_ratio(mapping.source_scroll_ratio);
        self.last_editor_top = Some(editor.scroll_top);
        self.suppress_until = Some(at + self.window);
        (
            self,
            ScrollOutcome::Mirror {
                mapping,
                preview_scroll_top,
            },
        )
    }

    /// Handle a scroll event.
    #[must_use]
    pub fn on_scroll(self, event: ScrollEvent) -> (Self, ScrollOutcome) {
        let suppressed = self.is_suppressed(event.at);
        match event.pane {
            Pane::Preview if suppressed => (self, ScrollOutcome::Suppressed),
            Pane::Preview => (self, ScrollOutcome::Manual),
            Pane::Editor if !self.enabled => (self, ScrollOutcome::Disabled),
            Pane::Editor if suppressed => (self, ScrollOutcome::Suppressed),
            Pane::Editor if self.last_editor_top == Some(event.editor.scroll_top) => {
                (self, ScrollOutcome::Unchanged)
            }
            Pane::Editor => self.mirror(event.editor, event.preview, event.at),
        }
    }

    /// Force a mirror of the current editor position, ignoring the no-op guard.
    ///
    /// Used when sync is switched back on or the preview content changes
    /// height. Returns `Disabled` when sync is off.
    #[must_use]
    pub fn realign(self, editor: ScrollMetrics, preview: ScrollMetrics, at: Instant) -> (Self, ScrollOutcome) {
        if !self.enabled {
            return (self, ScrollOutcome::Disabled);
        }
        self.mirror(editor, preview, at)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn editor_at(top: f64) -> ScrollMetrics {
        ScrollMetrics::new(top, 2000.0, 500.0)
    }

    fn preview() -> ScrollMetrics {
        ScrollMetrics::new(0.0, 4400.0, 400.0)
    }

    fn event(pane: Pane, editor: ScrollMetrics, at: Instant) -> ScrollEvent {
        ScrollEvent {
            pane,
            editor,
            preview: preview(),
            at,
        }
    }

    #[test]
    fn test_half_way_maps_to_half_way() {
        let now = Instant::now();
        let (_, outcome) = ScrollSync::new(true).on_scroll(event(Pane::Editor, editor_at(750.0), now));
        match outcome {
            ScrollOutcome::Mirror {
                mapping,
                preview_scroll_top,
            } => {
                assert_eq!(mapping.source_scroll_ratio, 0.5);
                assert_eq!(preview_scroll_top, 2000.0);
            }
            other => panic!("expected mirror, got {other:?}"),
        }
    }

    #[test]
    fn test_content_that_fits_maps_to_top() {
        let fits = ScrollMetrics::new(0.0, 300.0, 500.0);
        assert_eq!(fits.ratio(), 0.0);
        assert_eq!(fits.scrollable_range(), 0.0);

        let now = Instant::now();
        let (_, outcome) = ScrollSync::new(true).on_scroll(event(Pane::Editor, fits, now));
        assert!(matches!(
            outcome,
            ScrollOutcome::Mirror { preview_scroll_top, .. } if preview_scroll_top == 0.0
        ));
    }

    #[test]
    fn test_echo_is_suppressed_within_window() {
        let start = Instant::now();
        let (sync, _) = ScrollSync::new(true).on_scroll(event(Pane::Editor, editor_at(100.0), start));

        let echo = start + Duration::from_millis(10);
        let (sync, outcome) = sync.on_scroll(event(Pane::Preview, editor_at(100.0), echo));
        assert_eq!(outcome, ScrollOutcome::Suppressed);

        let (sync, outcome) = sync.on_scroll(event(Pane::Editor, editor_at(120.0), echo));
        assert_eq!(outcome, ScrollOutcome::Suppressed);

        let later = start + SCROLL_SUPPRESS_WINDOW + Duration::from_millis(1);
        let (_, outcome) = sync.on_scroll(event(Pane::Editor, editor_at(120.0), later));
        assert!(matches!(outcome, ScrollOutcome::Mirror { .. }));
    }

    #[test]
    fn test_unchanged_position_is_skipped() {
        let start = Instant::now();
        let (sync, _) = ScrollSync::new(true).on_scroll(event(Pane::Editor, editor_at(300.0), start));

        let later = start + Duration::from_millis(200);
        let (_, outcome) = sync.on_scroll(event(Pane::Editor, editor_at(300.0), later));
        assert_eq!(outcome, ScrollOutcome::Unchanged);
    }

    #[test]
    fn test_disabled_still_allows_manual_scrolling() {
        let now = Instant::now();
        let sync = ScrollSync::new(true).set_enabled(false);

        let (sync, outcome) = sync.on_scroll(event(Pane::Editor, editor_at(300.0), now));
        assert_eq!(outcome, ScrollOutcome::Disabled);

        let (_, outcome) = sync.on_scroll(event(Pane::Preview, editor_at(300.0), now));
        assert_eq!(outcome, ScrollOutcome::Manual);
    }

    #[test]
    fn test_realign_bypasses_unchanged_guard() {
        let start = Instant::now();
        let (sync, _) = ScrollSync::new(true).on_scroll(event(Pane::Editor, editor_at(300.0), start));

        let (_, outcome) = sync.realign(editor_at(300.0), preview(), start + Duration::from_secs(1));
        assert!(matches!(outcome, ScrollOutcome::Mirror { .. }));

        let (_, outcome) = ScrollSync::new(false).realign(editor_at(300.0), preview(), start);
        assert_eq!(outcome, ScrollOutcome::Disabled);
    }
}
