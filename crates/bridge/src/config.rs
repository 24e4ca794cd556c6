use std::env;
use std::time::Duration;

/// Quiet period before a burst of `SetValue`/`Commit` calls is written out.
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_secs(2);

/// Path prefix under which the host serves proxied content.
pub const DEFAULT_PROXY_PREFIX: &str = "/scorm-content";

/// Tunables for a mounted bridge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BridgeConfig {
    pub debounce: Duration,
    pub proxy_prefix: String,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            debounce: DEFAULT_DEBOUNCE,
            proxy_prefix: DEFAULT_PROXY_PREFIX.to_string(),
        }
    }
}

impl BridgeConfig {
    /// Read `SCORM_SYNC_DEBOUNCE_MS` and `SCORM_PROXY_PREFIX`, falling back to defaults.
    #[must_use]
    pub fn from_env() -> Self {
        let defaults = Self::default();
        let debounce = env::var("SCORM_SYNC_DEBOUNCE_MS")
            .ok()
            .and_then(|raw| raw.trim().parse::<u64>().ok())
            .map_or(defaults.debounce, Duration::from_millis);
        let proxy_prefix = env::var("SCORM_PROXY_PREFIX")
            .ok()
            .map(|raw| raw.trim().to_string())
            .filter(|raw| !raw.is_empty())
            .unwrap_or(defaults.proxy_prefix);
        Self {
            debounce,
            proxy_prefix,
        }
    }

    #[must_use]
    pub fn with_debounce(mut self, debounce: Duration) -> Self {
        self.debounce = debounce;
        self
    }

    #[must_use]
    pub fn with_proxy_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.proxy_prefix = prefix.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builders_override_defaults() {
        let config = BridgeConfig::default()
            .with_debounce(Duration::from_millis(250))
            .with_proxy_prefix("/proxy");
        assert_eq!(config.debounce, Duration::from_millis(250));
        assert_eq!(config.proxy_prefix, "/proxy");
        assert_eq!(BridgeConfig::default().debounce, DEFAULT_DEBOUNCE);
    }
}
