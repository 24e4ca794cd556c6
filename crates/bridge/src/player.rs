use std::sync::{Arc, Mutex};

use scorm_core::model::{ContentId, ProgressState, SessionState};
use scorm_core::{ContentKind, ContentUrlError, rewrite_content_url};
use tokio::runtime::Handle;
use tracing::{info, warn};
use tracking::ProgressSink;

use crate::config::BridgeConfig;
use crate::error::BridgeError;
use crate::host::HostCallbacks;
use crate::registry::RuntimeRegistry;
use crate::runtime::ScormRuntime;
use crate::scheduler::SyncScheduler;
use crate::scorm12::Scorm12Api;
use crate::scorm2004::Scorm2004Api;
use crate::session::BridgeSession;

/// What the host wants to play.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentSource {
    pub content_id: ContentId,
    pub url: String,
    pub kind: ContentKind,
}

impl ContentSource {
    #[must_use]
    pub fn scorm(content_id: ContentId, url: impl Into<String>) -> Self {
        Self {
            content_id,
            url: url.into(),
            kind: ContentKind::Scorm,
        }
    }
}

struct Mounted {
    session: Arc<BridgeSession>,
    scorm12: Arc<Scorm12Api>,
    scorm2004: Arc<Scorm2004Api>,
}

/// One mounted SCORM content player.
///
/// Mounting registers both the 1.2 and 2004 APIs, since a package picks
/// whichever it finds. Only one player should be mounted per registry at a
/// time. `unmount` (or dropping the player) removes both and writes any
/// progress not yet sent.
pub struct ScormPlayer {
    player_url: Option<String>,
    error: Option<String>,
    registry: Arc<dyn RuntimeRegistry>,
    mounted: Option<Mounted>,
}

impl ScormPlayer {
    /// Mount a player, reporting failures through [`ScormPlayer::error`].
    ///
    /// Must be called from inside a tokio runtime.
    #[must_use]
    pub fn mount(
        config: &BridgeConfig,
        source: ContentSource,
        callbacks: Arc<dyn HostCallbacks>,
        registry: Arc<dyn RuntimeRegistry>,
        sink: Arc<dyn ProgressSink>,
    ) -> Self {
        match Self::try_mount(config, source, callbacks, Arc::clone(&registry), sink) {
            Ok(player) => player,
            Err(err) => {
                warn!(error = %err, "SCORM player not mounted");
                Self {
                    player_url: None,
                    error: Some(err.to_string()),
                    registry,
                    mounted: None,
                }
            }
        }
    }

    /// Mount a player.
    ///
    /// # Errors
    ///
    /// Returns `BridgeError::MissingContentUrl` for an empty URL and
    /// `BridgeError::NoRuntime` outside a tokio runtime. No API is registered
    /// in either case.
    pub fn try_mount(
        config: &BridgeConfig,
        source: ContentSource,
        callbacks: Arc<dyn HostCallbacks>,
        registry: Arc<dyn RuntimeRegistry>,
        sink: Arc<dyn ProgressSink>,
    ) -> Result<Self, BridgeError> {
        let player_url = match rewrite_content_url(&config.proxy_prefix, &source.url, source.kind)
        {
            Ok(url) => url,
            Err(ContentUrlError::Empty) => return Err(BridgeError::MissingContentUrl),
            Err(err) => {
                warn!(error = %err, url = %source.url, "playing content URL without rewriting");
                source.url.trim().to_string()
            }
        };
        let runtime = Handle::try_current().map_err(|_| BridgeError::NoRuntime)?;

        let progress = Arc::new(Mutex::new(ProgressState::new()));
        let scheduler = SyncScheduler::new(
            runtime,
            sink,
            source.content_id,
            config.debounce,
            Arc::clone(&progress),
        );
        let session = Arc::new(BridgeSession::new(
            source.content_id,
            progress,
            scheduler,
            callbacks,
        ));
        let scorm12 = Arc::new(Scorm12Api::new(Arc::clone(&session)));
        let scorm2004 = Arc::new(Scorm2004Api::new(Arc::clone(&session)));

        registry.register(scorm12.clone());
        registry.register(scorm2004.clone());
        info!(content_id = %source.content_id, %player_url, "SCORM player mounted");

        Ok(Self {
            player_url: Some(player_url),
            error: None,
            registry,
            mounted: Some(Mounted {
                session,
                scorm12,
                scorm2004,
            }),
        })
    }

    /// Same-origin URL for the embedding frame, absent when mounting failed.
    #[must_use]
    pub fn player_url(&self) -> Option<&str> {
        self.player_url.as_deref()
    }

    #[must_use]
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// True once the package has called `Initialize`/`LMSInitialize`.
    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|mounted| mounted.session.is_initialized())
    }

    #[must_use]
    pub fn session_state(&self) -> Option<SessionState> {
        self.mounted
            .as_ref()
            .map(|mounted| mounted.session.lifecycle())
    }

    /// Copy of the current learner progress.
    #[must_use]
    pub fn progress(&self) -> Option<ProgressState> {
        self.mounted.as_ref().map(|mounted| mounted.session.snapshot())
    }

    #[must_use]
    pub fn has_pending_sync(&self) -> bool {
        self.mounted
            .as_ref()
            .is_some_and(|mounted| mounted.session.scheduler().has_pending())
    }

    #[must_use]
    pub fn scorm12(&self) -> Option<Arc<Scorm12Api>> {
        self.mounted.as_ref().map(|mounted| Arc::clone(&mounted.scorm12))
    }

    #[must_use]
    pub fn scorm2004(&self) -> Option<Arc<Scorm2004Api>> {
        self.mounted
            .as_ref()
            .map(|mounted| Arc::clone(&mounted.scorm2004))
    }

    /// Remove both APIs, stop accepting package calls, and write any progress
    /// not yet sent.
    pub async fn unmount(mut self) {
        if let Some(mounted) = self.mounted.take() {
            self.unregister(&mounted);
            mounted.session.shutdown().await;
            info!("SCORM player unmounted");
        }
    }

    fn unregister(&self, mounted: &Mounted) {
        let scorm12: Arc<dyn ScormRuntime> = mounted.scorm12.clone();
        let scorm2004: Arc<dyn ScormRuntime> = mounted.scorm2004.clone();
        self.registry.unregister(&scorm12);
        self.registry.unregister(&scorm2004);
    }
}

impl Drop for ScormPlayer {
    fn drop(&mut self) {
        if let Some(mounted) = self.mounted.take() {
            self.unregister(&mounted);
            mounted.session.abandon();
        }
    }
}
