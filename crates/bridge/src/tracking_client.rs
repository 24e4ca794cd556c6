use std::env;

use async_trait::async_trait;
use reqwest::Client;
use scorm_core::model::{ContentId, ProgressPayload};
use tracking::{ProgressSink, SinkError};
use url::Url;

use crate::error::TrackingError;

/// Where progress is written and the credential used to write it.
#[derive(Clone, Debug)]
pub struct TrackingConfig {
    pub base_url: String,
    pub token: Option<String>,
}

impl TrackingConfig {
    /// Build a config, validating the base URL.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError::InvalidBaseUrl` if `base_url` does not parse.
    pub fn new(base_url: impl Into<String>, token: Option<String>) -> Result<Self, TrackingError> {
        let base_url = base_url.into().trim().to_string();
        if Url::parse(&base_url).is_err() {
            return Err(TrackingError::InvalidBaseUrl(base_url));
        }
        let token = token
            .map(|val| val.trim().to_string())
            .filter(|val| !val.is_empty());
        Ok(Self { base_url, token })
    }

    /// Read `SCORM_TRACKING_BASE_URL` and `SCORM_TRACKING_TOKEN`.
    ///
    /// Returns `None` when no valid base URL is configured.
    #[must_use]
    pub fn from_env() -> Option<Self> {
        let base_url = env::var("SCORM_TRACKING_BASE_URL").ok()?;
        if base_url.trim().is_empty() {
            return None;
        }
        Self::new(base_url, env::var("SCORM_TRACKING_TOKEN").ok()).ok()
    }

    /// Endpoint receiving progress for `content_id`.
    #[must_use]
    pub fn progress_url(&self, content_id: ContentId) -> String {
        format!(
            "{}/content/{}/scorm-progress",
            self.base_url.trim_end_matches('/'),
            content_id
        )
    }
}

/// Tracking sink backed by the LMS REST API.
#[derive(Clone)]
pub struct HttpProgressSink {
    client: Client,
    config: TrackingConfig,
}

impl HttpProgressSink {
    #[must_use]
    pub fn new(config: TrackingConfig) -> Self {
        Self {
            client: Client::new(),
            config,
        }
    }

    #[must_use]
    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    /// POST a progress snapshot.
    ///
    /// # Errors
    ///
    /// Returns `TrackingError` if the request fails or the service answers
    /// with a non-success status.
    pub async fn post_progress(
        &self,
        content_id: ContentId,
        payload: &ProgressPayload,
    ) -> Result<(), TrackingError> {
        let mut request = self
            .client
            .post(self.config.progress_url(content_id))
            .json(payload);
        if let Some(token) = self.config.token.as_deref() {
            request = request.bearer_auth(token);
        }

        let response = request.send().await?;
        if !response.status().is_success() {
            return Err(TrackingError::HttpStatus(response.status()));
        }
        Ok(())
    }
}

#[async_trait]
impl ProgressSink for HttpProgressSink {
    async fn write_progress(
        &self,
        content_id: ContentId,
        payload: &ProgressPayload,
    ) -> Result<(), SinkError> {
        self.post_progress(content_id, payload)
            .await
            .map_err(|err| match err {
                TrackingError::HttpStatus(status) => SinkError::Rejected(status.as_u16()),
                TrackingError::Http(err) if err.is_builder() => {
                    SinkError::Serialization(err.to_string())
                }
                other => SinkError::Transport(other.to_string()),
            })
    }
}
