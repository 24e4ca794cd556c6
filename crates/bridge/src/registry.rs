use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};

use scorm_core::ScormVersion;
use tracing::{debug, warn};

use crate::runtime::ScormRuntime;

/// Where runtime APIs are published for the package to discover.
///
/// In a browser this is the window object. Embedders without shared globals
/// can back it with a lookup table or a registration hook.
pub trait RuntimeRegistry: Send + Sync {
    /// Publish `api` under its version's global name, replacing any previous entry.
    fn register(&self, api: Arc<dyn ScormRuntime>);

    /// Remove `api` from its global name, but only while it is still the
    /// registered instance. Removing an absent or replaced entry is a no-op.
    fn unregister(&self, api: &Arc<dyn ScormRuntime>);
}

/// Lookup-table registry keyed by global API name.
#[derive(Clone, Default)]
pub struct InMemoryRegistry {
    apis: Arc<Mutex<HashMap<&'static str, Arc<dyn ScormRuntime>>>>,
}

impl InMemoryRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a global name (`API`, `API_1484_11`) the way a package would.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<Arc<dyn ScormRuntime>> {
        self.apis
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    #[must_use]
    pub fn is_registered(&self, version: ScormVersion) -> bool {
        self.lookup(version.global_name()).is_some()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.apis
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_empty()
    }
}

impl RuntimeRegistry for InMemoryRegistry {
    fn register(&self, api: Arc<dyn ScormRuntime>) {
        let name = api.version().global_name();
        let mut guard = self.apis.lock().unwrap_or_else(PoisonError::into_inner);
        if guard.insert(name, api).is_some() {
            warn!(name, "replaced an already registered SCORM runtime API");
        } else {
            debug!(name, "registered SCORM runtime API");
        }
    }

    fn unregister(&self, api: &Arc<dyn ScormRuntime>) {
        let name = api.version().global_name();
        let mut guard = self.apis.lock().unwrap_or_else(PoisonError::into_inner);
        match guard.get(name) {
            Some(current) if same_instance(current, api) => {
                guard.remove(name);
                debug!(name, "unregistered SCORM runtime API");
            }
            Some(_) => debug!(name, "left a newer SCORM runtime API registered"),
            None => {}
        }
    }
}

/// Compare data pointers only; vtable pointers for one type may differ.
fn same_instance(a: &Arc<dyn ScormRuntime>, b: &Arc<dyn ScormRuntime>) -> bool {
    std::ptr::eq(Arc::as_ptr(a).cast::<()>(), Arc::as_ptr(b).cast::<()>())
}
