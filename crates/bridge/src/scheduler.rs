use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use scorm_core::model::{ContentId, ProgressPayload, ProgressState};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, warn};
use tracking::ProgressSink;

pub(crate) fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Debounced writer of progress snapshots to the tracking sink.
///
/// `schedule` restarts a quiet-period timer; when it expires the latest state
/// is written once. `flush` cancels the timer and writes right away. Only the
/// timer is ever cancelled: a write that has started runs to completion and
/// `shutdown` waits for it. Writes never report failure to the caller; they
/// are logged instead.
pub struct SyncScheduler {
    runtime: Handle,
    sink: Arc<dyn ProgressSink>,
    content_id: ContentId,
    debounce: Duration,
    progress: Arc<Mutex<ProgressState>>,
    dirty: Arc<AtomicBool>,
    pending: Mutex<Option<JoinHandle<()>>>,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl SyncScheduler {
    #[must_use]
    pub fn new(
        runtime: Handle,
        sink: Arc<dyn ProgressSink>,
        content_id: ContentId,
        debounce: Duration,
        progress: Arc<Mutex<ProgressState>>,
    ) -> Self {
        Self {
            runtime,
            sink,
            content_id,
            debounce,
            progress,
            dirty: Arc::new(AtomicBool::new(false)),
            pending: Mutex::new(None),
            in_flight: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// True when state changed since the last write started.
    #[must_use]
    pub fn is_dirty(&self) -> bool {
        self.dirty.load(Ordering::SeqCst)
    }

    /// True while a debounced write is waiting for its quiet period.
    #[must_use]
    pub fn has_pending(&self) -> bool {
        lock(&self.pending)
            .as_ref()
            .is_some_and(|task| !task.is_finished())
    }

    /// Mark state dirty and (re)start the debounce window.
    pub fn schedule(&self) {
        self.dirty.store(true, Ordering::SeqCst);

        let writer = self.writer();
        let progress = Arc::clone(&self.progress);
        let dirty = Arc::clone(&self.dirty);
        let debounce = self.debounce;

        let mut pending = lock(&self.pending);
        if let Some(previous) = pending.take() {
            previous.abort();
        }
        *pending = Some(self.runtime.spawn(async move {
            tokio::time::sleep(debounce).await;
            // No await past this point, so an abort cannot split snapshot from write.
            let payload = lock(&progress).payload();
            dirty.store(false, Ordering::SeqCst);
            writer.start(payload);
        }));
    }

    /// Cancel any pending debounced write. Returns whether one was cancelled.
    pub fn cancel(&self) -> bool {
        match lock(&self.pending).take() {
            Some(task) => {
                let was_waiting = !task.is_finished();
                task.abort();
                was_waiting
            }
            None => false,
        }
    }

    /// Cancel the debounce window and start a write of the current state now.
    ///
    /// The snapshot is taken before this returns; the network write runs in
    /// the background.
    pub fn flush(&self) {
        self.cancel();
        let payload = self.take_snapshot();
        self.writer().start(payload);
    }

    /// Final teardown: cancel the debounce window, wait for every started
    /// write, and write once more if state changed since the last write.
    pub async fn shutdown(&self) {
        let pending = lock(&self.pending).take();
        if let Some(task) = pending {
            task.abort();
            // Resolves once the timer task has stopped, whether it was
            // cancelled or had already handed its write off.
            let _ = task.await;
        }

        let started: Vec<JoinHandle<()>> = lock(&self.in_flight).drain(..).collect();
        for task in started {
            if let Err(err) = task.await {
                debug!(content_id = %self.content_id, error = %err, "sync task did not finish");
            }
        }

        if self.is_dirty() {
            let payload = self.take_snapshot();
            write(self.sink.as_ref(), self.content_id, &payload).await;
        }
    }

    /// Teardown without awaiting: cancel the window and spawn the final write
    /// if one is owed. Writes already started keep running.
    pub fn abandon(&self) {
        self.cancel();
        if self.is_dirty() {
            self.flush();
        }
    }

    fn take_snapshot(&self) -> ProgressPayload {
        let payload = lock(&self.progress).payload();
        self.dirty.store(false, Ordering::SeqCst);
        payload
    }

    fn writer(&self) -> Writer {
        Writer {
            runtime: self.runtime.clone(),
            sink: Arc::clone(&self.sink),
            content_id: self.content_id,
            in_flight: Arc::clone(&self.in_flight),
        }
    }
}

impl Drop for SyncScheduler {
    fn drop(&mut self) {
        if let Some(task) = lock(&self.pending).take() {
            task.abort();
        }
    }
}

/// Starts detached writes and keeps their handles so shutdown can await them.
struct Writer {
    runtime: Handle,
    sink: Arc<dyn ProgressSink>,
    content_id: ContentId,
    in_flight: Arc<Mutex<Vec<JoinHandle<()>>>>,
}

impl Writer {
    fn start(self, payload: ProgressPayload) {
        let Writer {
            runtime,
            sink,
            content_id,
            in_flight,
        } = self;
        let task = runtime.spawn(async move {
            write(sink.as_ref(), content_id, &payload).await;
        });
        let mut started = lock(&in_flight);
        started.retain(|task| !task.is_finished());
        started.push(task);
    }
}

async fn write(sink: &dyn ProgressSink, content_id: ContentId, payload: &ProgressPayload) {
    match sink.write_progress(content_id, payload).await {
        Ok(()) => debug!(%content_id, "progress synced"),
        Err(err) => warn!(%content_id, error = %err, "progress sync failed"),
    }
}
