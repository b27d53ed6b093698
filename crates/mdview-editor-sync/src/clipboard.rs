//! Clipboard access and the "copied" confirmation.

use std::error::Error;
use std::future::Future;

use tokio::task::AbortHandle;

/// What was copied.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CopyTarget {
    Markdown,
    Html,
}

/// Platform clipboard.
pub trait ClipboardPlatform {
    fn write_text(
        &self,
        text: &str,
    ) -> impl Future<Output = Result<(), Box<dyn Error + Send + Sync + 'static>>> + Send;
}

/// Which confirmation is showing, plus the timer that will hide it.
///
/// Each confirmation gets a generation number so an expiry that was already
/// queued when a newer copy happened cannot hide the newer confirmation.
#[derive(Debug, Default)]
pub struct CopyFeedback {
    showing: Option<(CopyTarget, u64)>,
    generation: u64,
    timer: Option<AbortHandle>,
}

impl CopyFeedback {
    /// Generation to tag the next confirmation's expiry with.
    pub fn next_generation(&mut self) -> u64 {
        self.generation += 1;
        self.generation
    }

    /// Show the confirmation for `target`, replacing any earlier one and
    /// aborting its timer.
    pub fn show(&mut self, target: CopyTarget, generation: u64, timer: AbortHandle) {
        if let Some(previous) = self.timer.replace(timer) {
            previous.abort();
        }
        self.showing = Some((target, generation));
    }

    /// Hide the confirmation if it is still the one tagged `generation`.
    pub fn expire(&mut self, generation: u64) -> Option<CopyTarget> {
        match self.showing {
            Some((target, current)) if current == generation => {
                self.showing = None;
                self.timer = None;
                Some(target)
            }
            _ => None,
        }
    }

    pub fn showing(&self) -> Option<CopyTarget> {
        self.showing.map(|(target, _)| target)
    }
}

impl Drop for CopyFeedback {
    fn drop(&mut self) {
        if let Some(timer) = self.timer.take() {
            timer.abort();
        }
    }
}
