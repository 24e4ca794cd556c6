use thiserror::Error;
use url::Url;

//
// ─── ERRORS ───────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum ContentUrlError {
    #[error("content URL cannot be empty")]
    Empty,

    #[error("content URL is not a valid URL: {0}")]
    Invalid(String),

    #[error("unsupported content URL scheme: {0}")]
    UnsupportedScheme(String),
}

//
// ─── CONTENT KIND ─────────────────────────────────────────────────────────────
//

/// What the player is about to embed. Each kind is served from its own
/// sub-tree under the local proxy prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentKind {
    #[default]
    Scorm,
    Video,
    Document,
}

impl ContentKind {
    #[must_use]
    pub fn path_segment(self) -> &'static str {
        match self {
            Self::Scorm => "scorm",
            Self::Video => "video",
            Self::Document => "document",
        }
    }
}

//
// ─── REWRITING ────────────────────────────────────────────────────────────────
//

/// Map a content URL to a path the host serves from its own origin.
///
/// Relative URLs are already same-origin and pass through unchanged. Absolute
/// `http(s)` URLs are routed through `{prefix}/{kind}/{host}{path}[?query]`
/// so the embedded package can reach the runtime API on the parent page.
///
/// # Errors
///
/// Returns `ContentUrlError` when the URL is empty, unparseable, or uses a
/// scheme other than `http`/`https`.
pub fn rewrite_content_url(
    prefix: &str,
    content_url: &str,
    kind: ContentKind,
) -> Result<String, ContentUrlError> {
    let raw = content_url.trim();
    if raw.is_empty() {
        return Err(ContentUrlError::Empty);
    }
    if raw.starts_with('/') && !raw.starts_with("//") {
        return Ok(raw.to_string());
    }

    let parsed = Url::parse(raw).map_err(|_| ContentUrlError::Invalid(raw.to_string()))?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(ContentUrlError::UnsupportedScheme(parsed.scheme().to_string()));
    }
    let host = parsed
        .host_str()
        .ok_or_else(|| ContentUrlError::Invalid(raw.to_string()))?;

    let mut rewritten = format!(
        "{}/{}/{}",
        prefix.trim_end_matches('/'),
        kind.path_segment(),
        host
    );
    if let Some(port) = parsed.port() {
        rewritten.push_str(&format!(":{port}"));
    }
    rewritten.push_str(parsed.path());
    if let Some(query) = parsed.query() {
        rewritten.push('?');
        rewritten.push_str(query);
    }
    Ok(rewritten)
}
