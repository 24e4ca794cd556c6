use async_trait::async_trait;
use scorm_core::model::{ContentId, ProgressPayload};
use std::sync::{Arc, Mutex};
use thiserror::Error;

/// Errors surfaced by tracking sinks.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SinkError {
    #[error("tracking service rejected the write with status {0}")]
    Rejected(u16),

    #[error("transport error: {0}")]
    Transport(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Contract for the remote service that records learner progress.
///
/// Callers treat a sink as fire-and-forget: an error is reported back only so
/// it can be logged.
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Persist the full progress snapshot for a content item.
    ///
    /// # Errors
    ///
    /// Returns `SinkError` if the write did not reach the service or was refused.
    async fn write_progress(
        &self,
        content_id: ContentId,
        payload: &ProgressPayload,
    ) -> Result<(), SinkError>;
}

/// One recorded write.
#[derive(Debug, Clone, PartialEq)]
pub struct ProgressWrite {
    pub content_id: ContentId,
    pub payload: ProgressPayload,
}

/// In-memory sink that records every write, for tests and dry runs.
#[derive(Clone, Default)]
pub struct InMemoryProgressSink {
    writes: Arc<Mutex<Vec<ProgressWrite>>>,
}

impl InMemoryProgressSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All writes received so far, oldest first.
    #[must_use]
    pub fn writes(&self) -> Vec<ProgressWrite> {
        self.writes
            .lock()
            .map(|guard| guard.clone())
            .unwrap_or_default()
    }

    #[must_use]
    pub fn write_count(&self) -> usize {
        self.writes.lock().map(|guard| guard.len()).unwrap_or(0)
    }

    #[must_use]
    pub fn last(&self) -> Option<ProgressWrite> {
        self.writes
            .lock()
            .ok()
            .and_then(|guard| guard.last().cloned())
    }
}

#[async_trait]
impl ProgressSink for InMemoryProgressSink {
    async fn write_progress(
        &self,
        content_id: ContentId,
        payload: &ProgressPayload,
    ) -> Result<(), SinkError> {
        let mut guard = self
            .writes
            .lock()
            .map_err(|e| SinkError::Transport(e.to_string()))?;
        guard.push(ProgressWrite {
            content_id,
            payload: payload.clone(),
        });
        Ok(())
    }
}

/// Sink that refuses every write while counting attempts.
#[derive(Clone, Default)]
pub struct FailingProgressSink {
    attempts: Arc<Mutex<usize>>,
}

impl FailingProgressSink {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn attempts(&self) -> usize {
        self.attempts.lock().map(|guard| *guard).unwrap_or(0)
    }
}

#[async_trait]
impl ProgressSink for FailingProgressSink {
    async fn write_progress(
        &self,
        _content_id: ContentId,
        _payload: &ProgressPayload,
    ) -> Result<(), SinkError> {
        if let Ok(mut guard) = self.attempts.lock() {
            *guard += 1;
        }
        Err(SinkError::Rejected(503))
    }
}
