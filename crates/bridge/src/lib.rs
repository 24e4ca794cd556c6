#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod host;
pub mod player;
pub mod registry;
pub mod runtime;
pub mod scheduler;
pub mod scorm12;
pub mod scorm2004;
mod session;
pub mod tracking_client;

pub use config::BridgeConfig;
pub use error::{BridgeError, TrackingError};
pub use host::{HostCallbacks, NoopCallbacks, RecordingCallbacks};
pub use player::{ContentSource, ScormPlayer};
pub use registry::{InMemoryRegistry, RuntimeRegistry};
pub use runtime::ScormRuntime;
pub use scheduler::SyncScheduler;
pub use scorm12::Scorm12Api;
pub use scorm2004::Scorm2004Api;
pub use tracking_client::{HttpProgressSink, TrackingConfig};
