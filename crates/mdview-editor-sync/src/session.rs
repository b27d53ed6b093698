//! The editor session.
//!
//! [`EditorSession`] owns the document, its history and the UI state, and is
//! the only place any of them change. Background work (render requests and
//! timers) reports back through a channel; the host drains it with
//! [`EditorSession::next_event`] and feeds each event to
//! [`EditorSession::handle_event`], so state is only touched one event at a
//! time.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use mdview_editor_core::{
    ApplyOutcome, CursorPosition, CursorTracker, Document, DocumentStats, EditInfo, EditOrigin,
    EditorCommand, EditorConfig, EditorError, EditorRope, FullscreenEffect, FullscreenEvent,
    FullscreenMode, History, Key, KeyCombo, LayoutEffect, LayoutEvent, LayoutState, Mutation,
    PreviewOutput, PreviewStats, RenderResult, ScrollEvent, ScrollMetrics, ScrollOutcome, ScrollSync, Selection,
    Theme, UiEffect, UiEvent, UiState, Version, command_for,
};
use tokio::sync::mpsc;
use tokio::task::AbortHandle;
use web_time::Instant;

use crate::clipboard::{ClipboardPlatform, CopyFeedback, CopyTarget};
use crate::export::{Artifact, ArtifactConverter, ExportFormat, ExportInput, Exporters};
use crate::import::read_markdown_file;
use crate::renderer::Renderer;
use crate::scheduler::ConversionScheduler;

/// Background completions delivered to the session.
#[derive(Clone, Debug, PartialEq)]
pub enum SessionEvent {
    RenderFinished(RenderResult),
    /// The settle delay after an editor fullscreen change has elapsed.
    Relayout,
    /// A copy confirmation's display time is up.
    CopyFeedbackExpired { generation: u64 },
}

/// What changed after handling a [`SessionEvent`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionUpdate {
    Preview(ApplyOutcome),
    /// The host should re-measure the editor surface.
    Relayout,
    CopyFeedbackCleared(CopyTarget),
    Nothing,
}

/// A single-user editing session.
///
/// Must be created inside a tokio runtime.
pub struct EditorSession {
    config: EditorConfig,
    document: Document,
    history: History,
    cursor: CursorTracker,
    ui: UiState,
    preview: PreviewOutput,
    exporters: Exporters,
    scheduler: ConversionScheduler,
    render_rx: mpsc::UnboundedReceiver<RenderResult>,
    timer_tx: mpsc::UnboundedSender<SessionEvent>,
    timer_rx: mpsc::UnboundedReceiver<SessionEvent>,
    relayout: Option<AbortHandle>,
    copy_feedback: CopyFeedback,
    last_metrics: Option<(ScrollMetrics, ScrollMetrics)>,
    mac_bindings: bool,
}

impl EditorSession {
    /// Start a session on `initial_text` and schedule its first render.
    pub fn new<R: Renderer>(config: EditorConfig, renderer: R, initial_text: &str) -> Self {
        let (render_tx, render_rx) = mpsc::unbounded_channel();
        let (timer_tx, timer_rx) = mpsc::unbounded_channel();
        let scheduler =
            ConversionScheduler::spawn(Arc::new(renderer), config.theme, config.debounce(), render_tx);

        let ui = UiState::new(
            LayoutState::new(config.initial_split_percent),
            ScrollSync::new(config.sync_scroll).with_window(config.scroll_suppress_window()),
        );
        let document = Document::new(initial_text);
        scheduler.schedule(initial_text.to_owned(), document.version());

        tracing::debug!(
            len = initial_text.len(),
            theme = %config.theme,
            sync_scroll = config.sync_scroll,
            "editor session started"
        );

        Self {
            history: History::new(initial_text),
            document,
            cursor: CursorTracker::new(),
            ui,
            preview: PreviewOutput::default(),
            exporters: Exporters::new(),
            scheduler,
            render_rx,
            timer_tx,
            timer_rx,
            relayout: None,
            copy_feedback: CopyFeedback::default(),
            last_metrics: None,
            mac_bindings: cfg!(target_os = "macos"),
            config,
        }
    }

    /// Use Cmd (true) or Ctrl (false) as the primary shortcut modifier.
    #[must_use]
    pub fn with_mac_bindings(mut self, mac: bool) -> Self {
        self.mac_bindings = mac;
        self
    }

    // --- editing ---

    /// Apply a user edit.
    pub fn edit(&mut self, mutation: Mutation) -> Option<EditInfo> {
        self.apply_edit(mutation, EditOrigin::User)
    }

    /// Replace the whole text, as a textarea change event does.
    pub fn set_text(&mut self, text: impl Into<String>) -> Option<EditInfo> {
        self.edit(Mutation::ReplaceAll(text.into()))
    }

    /// Empty the document. Recorded like any other edit.
    pub fn clear(&mut self) -> Option<EditInfo> {
        self.apply_edit(Mutation::replace_all(""), EditOrigin::Clear)
    }

    /// Restore the previous snapshot. Returns false at the oldest one.
    pub fn undo(&mut self) -> bool {
        let Some(text) = self.history.undo().map(str::to_owned) else {
            return false;
        };
        self.apply_edit(Mutation::ReplaceAll(text), EditOrigin::Restore);
        true
    }

    /// Restore the next snapshot. Returns false at the newest one.
    pub fn redo(&mut self) -> bool {
        let Some(text) = self.history.redo().map(str::to_owned) else {
            return false;
        };
        self.apply_edit(Mutation::ReplaceAll(text), EditOrigin::Restore);
        true
    }

    /// The single path by which the document changes.
    fn apply_edit(&mut self, mutation: Mutation, origin: EditOrigin) -> Option<EditInfo> {
        let edit = self.document.apply(mutation, origin)?;
        let content = self.document.content_string();
        if origin.is_recorded() {
            self.history.record(&content);
        }
        self.scheduler.schedule(content, edit.version);
        Some(edit)
    }

    /// Issue the pending render request now.
    pub fn flush(&mut self) {
        self.scheduler.flush();
    }

    /// Theme for subsequent render requests.
    pub fn set_theme(&mut self, theme: Theme) {
        self.config.theme = theme;
        self.scheduler.set_theme(theme);
    }

    // --- caret ---

    pub fn move_caret(&mut self, offset: usize) -> CursorPosition {
        self.cursor.update(self.document.text(), offset)
    }

    pub fn select(&mut self, selection: Selection) -> CursorPosition {
        self.cursor.update_selection(self.document.text(), selection)
    }

    // --- panes ---

    /// Handle a scroll event from either pane.
    pub fn scroll(&mut self, event: ScrollEvent) -> ScrollOutcome {
        self.last_metrics = Some((event.editor, event.preview));
        self.apply_ui(UiEvent::Scroll(event))
            .into_iter()
            .find_map(|effect| match effect {
                UiEffect::Scroll(outcome) => Some(outcome),
                _ => None,
            })
            .unwrap_or(ScrollOutcome::Unchanged)
    }

    /// Turn scroll mirroring on or off.
    ///
    /// Turning it on realigns the preview with the last known editor
    /// position, if any scroll has been seen yet.
    pub fn set_sync_scroll(&mut self, enabled: bool, at: Instant) -> Option<ScrollOutcome> {
        self.config.sync_scroll = enabled;
        match self.last_metrics {
            Some((editor, preview)) => self
                .apply_ui(UiEvent::SetSyncScroll {
                    enabled,
                    editor,
                    preview,
                    at,
                })
                .into_iter()
                .find_map(|effect| match effect {
                    UiEffect::Scroll(outcome) => Some(outcome),
                    _ => None,
                }),
            None => {
                self.ui.scroll = self.ui.scroll.set_enabled(enabled);
                None
            }
        }
    }

    pub fn layout(&mut self, event: LayoutEvent) -> Vec<LayoutEffect> {
        self.apply_ui(UiEvent::Layout(event))
            .into_iter()
            .filter_map(|effect| match effect {
                UiEffect::Layout(effect) => Some(effect),
                _ => None,
            })
            .collect()
    }

    pub fn fullscreen(&mut self, event: FullscreenEvent) -> FullscreenMode {
        self.apply_ui(UiEvent::Fullscreen(event));
        self.ui.fullscreen
    }

    /// Run the command bound to `combo`, if any.
    pub fn key(&mut self, combo: &KeyCombo) -> Option<EditorCommand> {
        let command = command_for(combo, self.mac_bindings)?;
        self.execute(command);
        Some(command)
    }

    pub fn execute(&mut self, command: EditorCommand) {
        tracing::debug!(?command, "executing command");
        match command {
            EditorCommand::Undo => {
                self.undo();
            }
            EditorCommand::Redo => {
                self.redo();
            }
            EditorCommand::Clear => {
                self.clear();
            }
            EditorCommand::ToggleSyncScroll => {
                let enabled = !self.ui.scroll.is_enabled();
                self.set_sync_scroll(enabled, Instant::now());
            }
            EditorCommand::ToggleEditorFullscreen => {
                self.fullscreen(FullscreenEvent::ToggleEditor);
            }
            EditorCommand::TogglePreviewFullscreen => {
                self.fullscreen(FullscreenEvent::TogglePreview);
            }
            EditorCommand::ExitFullscreen => {
                self.fullscreen(FullscreenEvent::Key(Key::Escape));
            }
        }
    }

    fn apply_ui(&mut self, event: UiEvent) -> Vec<UiEffect> {
        let (ui, effects) = self.ui.apply(event);
        self.ui = ui;
        for effect in &effects {
            // The configured delay wins over the default carried by the effect.
            if let UiEffect::Fullscreen(FullscreenEffect::ScheduleRelayout(_)) = effect {
                let timer =
                    self.spawn_timer(self.config.relayout_settle_delay(), SessionEvent::Relayout);
                if let Some(previous) = self.relayout.replace(timer) {
                    previous.abort();
                }
            }
        }
        effects
    }

    fn spawn_timer(&self, delay: Duration, event: SessionEvent) -> AbortHandle {
        let tx = self.timer_tx.clone();
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            let _ = tx.send(event);
        })
        .abort_handle()
    }

    // --- background events ---

    /// Wait for the next background completion.
    pub async fn next_event(&mut self) -> Option<SessionEvent> {
        tokio::select! {
            Some(result) = self.render_rx.recv() => Some(SessionEvent::RenderFinished(result)),
            Some(event) = self.timer_rx.recv() => Some(event),
            else => None,
        }
    }

    pub fn handle_event(&mut self, event: SessionEvent) -> SessionUpdate {
        match event {
            SessionEvent::RenderFinished(result) => {
                let outcome = self.preview.apply(result, self.document.version());
                if outcome == ApplyOutcome::Applied {
                    if let Some(message) = self.preview.error() {
                        tracing::warn!(version = %self.document.version(), %message, "preview shows render error");
                    }
                }
                SessionUpdate::Preview(outcome)
            }
            SessionEvent::Relayout => {
                self.relayout = None;
                tracing::debug!(mode = ?self.ui.fullscreen, "relayout");
                SessionUpdate::Relayout
            }
            SessionEvent::CopyFeedbackExpired { generation } => {
                match self.copy_feedback.expire(generation) {
                    Some(target) => SessionUpdate::CopyFeedbackCleared(target),
                    None => SessionUpdate::Nothing,
                }
            }
        }
    }

    // --- import / export / clipboard ---

    /// Replace the document with the contents of a file.
    ///
    /// Oversized or unreadable files leave the session untouched.
    pub async fn import_file(
        &mut self,
        path: impl AsRef<Path>,
    ) -> Result<Option<EditInfo>, EditorError> {
        let text = read_markdown_file(path.as_ref(), self.config.max_import_bytes).await?;
        Ok(self.apply_edit(Mutation::ReplaceAll(text), EditOrigin::Import))
    }

    pub fn register_exporter(&mut self, converter: Box<dyn ArtifactConverter>) {
        self.exporters.register(converter);
    }

    /// Build an export artifact from the current text and preview.
    pub fn export(&self, format: ExportFormat) -> Result<Artifact, EditorError> {
        let markdown = self.document.content_string();
        self.exporters.export(
            format,
            ExportInput {
                markdown: &markdown,
                html: self.preview.html(),
            },
        )
    }

    pub async fn copy_markdown<C: ClipboardPlatform>(
        &mut self,
        clipboard: &C,
    ) -> Result<(), EditorError> {
        let text = self.document.content_string();
        self.copy(CopyTarget::Markdown, &text, clipboard).await
    }

    pub async fn copy_html<C: ClipboardPlatform>(
        &mut self,
        clipboard: &C,
    ) -> Result<(), EditorError> {
        let html = self.preview.html().to_owned();
        self.copy(CopyTarget::Html, &html, clipboard).await
    }

    async fn copy<C: ClipboardPlatform>(
        &mut self,
        target: CopyTarget,
        text: &str,
        clipboard: &C,
    ) -> Result<(), EditorError> {
        if let Err(err) = clipboard.write_text(text).await {
            tracing::warn!(?target, error = %err, "clipboard write failed");
            return Err(EditorError::Clipboard(err.to_string()));
        }
        let generation = self.copy_feedback.next_generation();
        let timer = self.spawn_timer(
            self.config.copy_feedback_duration(),
            SessionEvent::CopyFeedbackExpired { generation },
        );
        self.copy_feedback.show(target, generation, timer);
        Ok(())
    }

    // --- accessors ---

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn text(&self) -> &EditorRope {
        self.document.text()
    }

    pub fn content(&self) -> String {
        self.document.content_string()
    }

    pub fn version(&self) -> Version {
        self.document.version()
    }

    pub fn preview(&self) -> &PreviewOutput {
        &self.preview
    }

    /// Whether the displayed preview lags the document.
    ///
    /// True from the moment an edit schedules a render until the result for
    /// the current version is applied. Stale results do not clear it.
    pub fn rendering(&self) -> bool {
        self.preview.version() != Some(self.document.version())
    }

    /// Character, word and paragraph counts of the displayed preview.
    pub fn preview_stats(&self) -> PreviewStats {
        PreviewStats::of_html(self.preview.html())
    }

    pub fn cursor_position(&self) -> CursorPosition {
        self.cursor.position()
    }

    pub fn stats(&self) -> DocumentStats {
        DocumentStats::of(self.document.text())
    }

    pub fn ui(&self) -> &UiState {
        &self.ui
    }

    pub fn history(&self) -> &History {
        &self.history
    }

    pub fn can_undo(&self) -> bool {
        self.history.can_undo()
    }

    pub fn can_redo(&self) -> bool {
        self.history.can_redo()
    }

    pub fn copy_feedback(&self) -> Option<CopyTarget> {
        self.copy_feedback.showing()
    }
}

impl Drop for EditorSession {
    fn drop(&mut self) {
        if let Some(timer) = self.relayout.take() {
            timer.abort();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::HttpRenderer;
    use crate::testing::{Failure, FakeRenderer};
    use mdview_editor_core::{ContainerRect, Pane};
    use std::error::Error;
    use std::sync::Mutex;

    fn config() -> EditorConfig {
        EditorConfig::default()
    }

    fn session(renderer: &FakeRenderer, text: &str) -> EditorSession {
        EditorSession::new(config(), renderer.clone(), text).with_mac_bindings(false)
    }

    async fn settle(session: &mut EditorSession) -> SessionUpdate {
        let event = session.next_event().await.unwrap();
        session.handle_event(event)
    }

    #[derive(Default)]
    struct FakeClipboard {
        written: Mutex<Vec<String>>,
        deny: bool,
    }

    impl ClipboardPlatform for FakeClipboard {
        async fn write_text(&self, text: &str) -> Result<(), Box<dyn Error + Send + Sync + 'static>> {
            if self.deny {
                return Err("permission denied".into());
            }
            self.written.lock().unwrap().push(text.to_owned());
            Ok(())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_initial_text_is_rendered() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "# hi");

        assert_eq!(
            settle(&mut session).await,
            SessionUpdate::Preview(ApplyOutcome::Applied)
        );
        assert_eq!(session.preview().html(), "<p># hi</p>");
        assert_eq!(session.preview().version(), Some(Version::INITIAL));
    }

    #[tokio::test(start_paused = true)]
    async fn test_typing_renders_only_the_latest_text() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "");

        session.set_text("a");
        session.set_text("ab");
        session.set_text("abc");

        assert_eq!(
            settle(&mut session).await,
            SessionUpdate::Preview(ApplyOutcome::Applied)
        );
        assert_eq!(session.preview().html(), "<p>abc</p>");
        assert_eq!(renderer.requests().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_late_result_for_older_version_is_discarded() {
        let renderer = FakeRenderer::new()
            .with_delay("slow", Duration::from_secs(2))
            .with_delay("fast", Duration::from_millis(10));
        let mut session = session(&renderer, "");

        session.set_text("slow");
        session.flush();
        session.set_text("fast");
        session.flush();

        assert_eq!(
            settle(&mut session).await,
            SessionUpdate::Preview(ApplyOutcome::Applied)
        );
        assert_eq!(
            settle(&mut session).await,
            SessionUpdate::Preview(ApplyOutcome::Stale {
                result: Version::new(1),
                current: Version::new(2)
            })
        );
        assert_eq!(session.preview().html(), "<p>fast</p>");
        assert_eq!(session.preview().version(), Some(Version::new(2)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_rendering_flag_tracks_the_current_version() {
        let renderer = FakeRenderer::new()
            .with_delay("slow", Duration::from_secs(2))
            .with_delay("fast", Duration::from_millis(10))
            .with_delay("fast!", Duration::from_secs(5));
        let mut session = session(&renderer, "");
        assert!(session.rendering());

        settle(&mut session).await;
        assert!(!session.rendering());

        session.set_text("slow");
        session.flush();
        assert!(session.rendering());
        session.set_text("fast");
        session.flush();

        settle(&mut session).await;
        assert!(!session.rendering());

        // The late result for "slow" is stale and leaves the flag alone.
        session.set_text("fast!");
        assert!(matches!(
            settle(&mut session).await,
            SessionUpdate::Preview(ApplyOutcome::Stale { .. })
        ));
        assert!(session.rendering());
        settle(&mut session).await;
        assert!(!session.rendering());
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_stats_count_rendered_text() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "two words");
        assert_eq!(session.preview_stats(), PreviewStats::default());

        settle(&mut session).await;
        assert_eq!(
            session.preview_stats(),
            PreviewStats {
                chars: 9,
                words: 2,
                paragraphs: 1
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_render_failure_does_not_block_editing() {
        let renderer =
            FakeRenderer::new().failing_on("three", Failure::Field("bad input".into()));
        let mut session = session(&renderer, "");

        session.set_text("one");
        session.set_text("two");
        session.set_text("three");
        assert_eq!(session.version(), Version::new(3));

        settle(&mut session).await;
        assert_eq!(session.preview().error(), Some("bad input"));
        assert!(session.preview().html().contains("render-error"));
        assert_eq!(session.version(), Version::new(3));
        assert_eq!(session.content(), "three");

        session.set_text("three!");
        settle(&mut session).await;
        assert_eq!(session.preview().error(), None);
        assert_eq!(session.preview().html(), "<p>three!</p>");
    }

    #[tokio::test]
    async fn test_unreachable_renderer_shows_inline_error() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let endpoint = format!("http://{}", listener.local_addr().unwrap());
        drop(listener);

        let mut session = EditorSession::new(config(), HttpRenderer::new(endpoint), "# hi");
        session.flush();

        assert_eq!(
            settle(&mut session).await,
            SessionUpdate::Preview(ApplyOutcome::Applied)
        );
        let message = session.preview().error().unwrap();
        assert!(message.starts_with("renderer unreachable: "));
        assert!(
            session
                .preview()
                .html()
                .starts_with("<p class=\"render-error\" style=\"color:red\">Error: renderer unreachable: ")
        );
        assert!(!session.rendering());

        // Editing carries on.
        assert!(session.set_text("# hi!").is_some());
        assert_eq!(session.content(), "# hi!");
    }

    #[tokio::test(start_paused = true)]
    async fn test_undo_redo_round_trip() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "start");

        session.set_text("one");
        session.set_text("two");

        assert!(session.undo());
        assert!(session.undo());
        assert!(!session.undo());
        assert_eq!(session.content(), "start");
        // Restores are mutations too.
        assert_eq!(session.version(), Version::new(4));

        assert!(session.redo());
        assert!(session.redo());
        assert!(!session.redo());
        assert_eq!(session.content(), "two");
        assert_eq!(session.history().len(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_edit_after_undo_drops_redo_tail() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "");

        session.set_text("a");
        session.set_text("ab");
        session.undo();
        session.set_text("ax");

        assert!(!session.can_redo());
        assert!(session.undo());
        assert_eq!(session.content(), "a");
    }

    #[tokio::test(start_paused = true)]
    async fn test_unchanged_text_is_not_an_edit() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "same");

        assert_eq!(session.set_text("same"), None);
        assert_eq!(session.version(), Version::INITIAL);
        assert!(!session.can_undo());
    }

    #[tokio::test(start_paused = true)]
    async fn test_clear_is_undoable() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "# draft");

        session.execute(EditorCommand::Clear);
        assert_eq!(session.content(), "");
        assert!(session.undo());
        assert_eq!(session.content(), "# draft");
    }

    #[tokio::test(start_paused = true)]
    async fn test_oversized_import_changes_nothing() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "keep me");

        let file = tempfile::NamedTempFile::new().unwrap();
        file.as_file().set_len(16 * 1024 * 1024).unwrap();

        let err = session.import_file(file.path()).await.unwrap_err();
        assert_eq!(
            err.to_string(),
            "file too large: 16.0MB (maximum size is 15MB)"
        );
        assert_eq!(session.content(), "keep me");
        assert_eq!(session.version(), Version::INITIAL);
        assert!(!session.can_undo());
    }

    #[tokio::test(start_paused = true)]
    async fn test_import_goes_through_the_edit_pipeline() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "old");

        let file = tempfile::NamedTempFile::new().unwrap();
        std::fs::write(file.path(), "# imported").unwrap();

        let edit = session.import_file(file.path()).await.unwrap().unwrap();
        assert_eq!(edit.origin, EditOrigin::Import);
        assert_eq!(session.content(), "# imported");

        settle(&mut session).await;
        assert_eq!(session.preview().html(), "<p># imported</p>");

        assert!(session.undo());
        assert_eq!(session.content(), "old");
    }

    #[tokio::test(start_paused = true)]
    async fn test_caret_and_selection_positions() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "a\nbb\nccc");

        assert_eq!(
            session.move_caret(3),
            CursorPosition { line: 2, column: 2 }
        );
        assert_eq!(
            session.select(Selection::new(8, 5)),
            CursorPosition { line: 3, column: 1 }
        );
        assert_eq!(session.cursor_position().to_string(), "Ln 3, Col 1");
    }

    #[tokio::test(start_paused = true)]
    async fn test_editor_fullscreen_relayouts_after_settle() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "");
        settle(&mut session).await;

        let start = tokio::time::Instant::now();
        assert_eq!(
            session.fullscreen(FullscreenEvent::ToggleEditor),
            FullscreenMode::EditorFullscreen
        );
        tokio::time::sleep(Duration::from_millis(100)).await;
        session.fullscreen(FullscreenEvent::ToggleEditor);

        // The first signal was superseded; only one arrives, 300ms after the
        // second toggle.
        assert_eq!(settle(&mut session).await, SessionUpdate::Relayout);
        assert!(start.elapsed() >= Duration::from_millis(400));
        assert!(
            tokio::time::timeout(Duration::from_secs(1), session.next_event())
                .await
                .is_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_preview_fullscreen_does_not_relayout() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "");
        settle(&mut session).await;

        session.fullscreen(FullscreenEvent::TogglePreview);
        assert!(!session.ui().fullscreen.editor_visible());
        assert_eq!(
            session.key(&KeyCombo::new(Key::Escape)),
            Some(EditorCommand::ExitFullscreen)
        );
        assert_eq!(session.ui().fullscreen, FullscreenMode::Normal);
        assert!(
            tokio::time::timeout(Duration::from_secs(1), session.next_event())
                .await
                .is_err()
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_sync_toggle_realigns() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "");
        let editor = ScrollMetrics::new(750.0, 2000.0, 500.0);
        let preview = ScrollMetrics::new(0.0, 4400.0, 400.0);
        let at = Instant::now();

        let outcome = session.scroll(ScrollEvent {
            pane: Pane::Editor,
            editor,
            preview,
            at,
        });
        assert!(matches!(
            outcome,
            ScrollOutcome::Mirror { preview_scroll_top, .. } if preview_scroll_top == 2000.0
        ));

        let toggle = KeyCombo::primary_shift(Key::character("S"), false);
        session.key(&toggle);
        assert!(!session.ui().scroll.is_enabled());
        assert_eq!(
            session.scroll(ScrollEvent {
                pane: Pane::Editor,
                editor: ScrollMetrics::new(900.0, 2000.0, 500.0),
                preview,
                at: at + Duration::from_secs(1),
            }),
            ScrollOutcome::Disabled
        );

        let outcome = session.set_sync_scroll(true, at + Duration::from_secs(2));
        assert!(matches!(
            outcome,
            Some(ScrollOutcome::Mirror { mapping, .. }) if mapping.source_scroll_ratio == 0.6
        ));
    }

    #[tokio::test(start_paused = true)]
    async fn test_divider_drag_through_session() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "");
        let container = ContainerRect::new(0.0, 1000.0);

        session.layout(LayoutEvent::DragStart);
        let effects = session.layout(LayoutEvent::PointerMove { x: 700.0, container });
        assert_eq!(effects, vec![LayoutEffect::RequestFrame]);
        session.layout(LayoutEvent::DragEnd);

        assert_eq!(session.ui().layout.split().get(), 70.0);
        assert!(!session.ui().layout.is_dragging());
    }

    #[tokio::test(start_paused = true)]
    async fn test_copy_shows_feedback_for_two_seconds() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "# copy me");
        settle(&mut session).await;

        let clipboard = FakeClipboard::default();
        session.copy_markdown(&clipboard).await.unwrap();
        assert_eq!(session.copy_feedback(), Some(CopyTarget::Markdown));

        session.copy_html(&clipboard).await.unwrap();
        assert_eq!(session.copy_feedback(), Some(CopyTarget::Html));
        assert_eq!(
            *clipboard.written.lock().unwrap(),
            vec!["# copy me".to_owned(), "<p># copy me</p>".to_owned()]
        );

        let start = tokio::time::Instant::now();
        assert_eq!(
            settle(&mut session).await,
            SessionUpdate::CopyFeedbackCleared(CopyTarget::Html)
        );
        assert!(start.elapsed() >= Duration::from_secs(2));
        assert_eq!(session.copy_feedback(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_denied_clipboard_shows_no_feedback() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "text");
        let clipboard = FakeClipboard {
            deny: true,
            ..FakeClipboard::default()
        };

        let err = session.copy_markdown(&clipboard).await.unwrap_err();
        assert!(matches!(err, EditorError::Clipboard(_)));
        assert_eq!(session.copy_feedback(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn test_markdown_export_uses_current_text() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "");
        session.set_text("# Exported");

        let artifact = session.export(ExportFormat::Markdown).unwrap();
        assert_eq!(artifact.file_name, "markdown-preview.md");
        assert_eq!(artifact.bytes, b"# Exported");
        assert!(session.export(ExportFormat::Pdf).is_err());
        assert_eq!(session.content(), "# Exported");
    }

    #[tokio::test(start_paused = true)]
    async fn test_theme_change_applies_to_next_request() {
        let renderer = FakeRenderer::new();
        let mut session = session(&renderer, "x");
        settle(&mut session).await;

        session.set_theme(Theme::Dark);
        session.set_text("y");
        settle(&mut session).await;

        let themes: Vec<Theme> = renderer.requests().iter().map(|r| r.theme).collect();
        assert_eq!(themes, vec![Theme::Light, Theme::Dark]);
    }
}
