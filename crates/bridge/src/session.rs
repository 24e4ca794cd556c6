use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};

use scorm_core::ScormVersion;
use scorm_core::model::{ContentId, ProgressState, SessionState};
use tracing::{debug, info};

use crate::host::HostCallbacks;
use crate::scheduler::{SyncScheduler, lock};

/// Host notifications produced by one state mutation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct Effects {
    pub progress: Option<u8>,
    pub complete: bool,
}

impl Effects {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn progress(percent: u8) -> Self {
        Self {
            progress: Some(percent),
            complete: false,
        }
    }

    /// Content finished: progress jumps to 100 and the host hears about it.
    pub fn finished() -> Self {
        Self {
            progress: Some(100),
            complete: true,
        }
    }

    pub fn mastered() -> Self {
        Self {
            progress: None,
            complete: true,
        }
    }
}

/// State shared by the 1.2 and 2004 adapters of one mounted player.
///
/// Owns the lifecycle, the single `ProgressState`, and the sync scheduler.
/// Calls outside the `Active` state are accepted and ignored.
pub(crate) struct BridgeSession {
    content_id: ContentId,
    lifecycle: Mutex<SessionState>,
    initialized: AtomicBool,
    progress: Arc<Mutex<ProgressState>>,
    scheduler: SyncScheduler,
    callbacks: Arc<dyn HostCallbacks>,
}

impl BridgeSession {
    pub fn new(
        content_id: ContentId,
        progress: Arc<Mutex<ProgressState>>,
        scheduler: SyncScheduler,
        callbacks: Arc<dyn HostCallbacks>,
    ) -> Self {
        Self {
            content_id,
            lifecycle: Mutex::new(SessionState::Uninitialized),
            initialized: AtomicBool::new(false),
            progress,
            scheduler,
            callbacks,
        }
    }

    pub fn is_active(&self) -> bool {
        lock(&self.lifecycle).is_active()
    }

    pub fn lifecycle(&self) -> SessionState {
        *lock(&self.lifecycle)
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.load(Ordering::SeqCst)
    }

    pub fn snapshot(&self) -> ProgressState {
        lock(&self.progress).clone()
    }

    pub fn scheduler(&self) -> &SyncScheduler {
        &self.scheduler
    }

    pub fn initialize(&self, version: ScormVersion) {
        if lock(&self.lifecycle).initialize() {
            self.initialized.store(true, Ordering::SeqCst);
            info!(content_id = %self.content_id, %version, "SCORM session initialized");
        } else {
            debug!(content_id = %self.content_id, %version, "ignored initialize on a started session");
        }
    }

    /// End the session: force a write and re-announce completion if reached.
    pub fn terminate(&self, version: ScormVersion) {
        if !lock(&self.lifecycle).terminate() {
            debug!(content_id = %self.content_id, %version, "ignored terminate outside an active session");
            return;
        }
        self.scheduler.flush();
        let complete = lock(&self.progress).is_complete();
        info!(content_id = %self.content_id, %version, complete, "SCORM session terminated");
        if complete {
            self.callbacks.on_complete();
        }
    }

    pub fn commit(&self) {
        if self.is_active() {
            self.scheduler.schedule();
        } else {
            debug!(content_id = %self.content_id, "ignored commit outside an active session");
        }
    }

    /// Read from progress state; `""` when the session is not active.
    pub fn read(&self, key: &str, f: impl FnOnce(&ProgressState) -> String) -> String {
        if !self.is_active() {
            debug!(content_id = %self.content_id, key, "ignored GetValue outside an active session");
            return String::new();
        }
        f(&lock(&self.progress))
    }

    /// Mutate progress state, notify the host, and schedule a sync.
    pub fn write(&self, key: &str, f: impl FnOnce(&mut ProgressState) -> Effects) {
        if !self.is_active() {
            debug!(content_id = %self.content_id, key, "ignored SetValue outside an active session");
            return;
        }
        let effects = f(&mut lock(&self.progress));
        if let Some(percent) = effects.progress {
            self.callbacks.on_progress(percent);
        }
        if effects.complete {
            self.callbacks.on_complete();
        }
        self.scheduler.schedule();
    }

    /// Stop accepting package calls. Later calls take the no-effect path.
    pub fn detach(&self) {
        lock(&self.lifecycle).detach();
        debug!(content_id = %self.content_id, "SCORM session detached");
    }

    pub async fn shutdown(&self) {
        self.detach();
        self.scheduler.shutdown().await;
    }

    pub fn abandon(&self) {
        self.detach();
        self.scheduler.abandon();
    }
}
