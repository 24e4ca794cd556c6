use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Notifications the hosting page receives while content plays.
///
/// `on_complete` is not deduplicated. Completion and mastery are independent
/// triggers in SCORM 2004, and `LMSFinish`/`Terminate` re-announce a finished
/// session, so implementations must tolerate repeated calls.
pub trait HostCallbacks: Send + Sync {
    /// Learner progress as a whole percentage in `0..=100`.
    fn on_progress(&self, percent: u8);

    fn on_complete(&self);
}

/// Host that ignores every notification.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopCallbacks;

impl HostCallbacks for NoopCallbacks {
    fn on_progress(&self, _percent: u8) {}

    fn on_complete(&self) {}
}

/// Host double that records notifications for assertions.
#[derive(Debug, Default)]
pub struct RecordingCallbacks {
    progress: Mutex<Vec<u8>>,
    completions: AtomicUsize,
}

impl RecordingCallbacks {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Every percentage reported so far, oldest first.
    #[must_use]
    pub fn progress(&self) -> Vec<u8> {
        self.progress
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn last_progress(&self) -> Option<u8> {
        self.progress().last().copied()
    }

    #[must_use]
    pub fn completions(&self) -> usize {
        self.completions.load(Ordering::SeqCst)
    }
}

impl HostCallbacks for RecordingCallbacks {
    fn on_progress(&self, percent: u8) {
        if let Ok(mut guard) = self.progress.lock() {
            guard.push(percent);
        }
    }

    fn on_complete(&self) {
        self.completions.fetch_add(1, Ordering::SeqCst);
    }
}
